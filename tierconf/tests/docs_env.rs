//! Environment-source documentation rendering.

mod common;

use anyhow::{Result, ensure};
use rstest::rstest;
use tierconf::{Configurable, EnvSource, FieldMap, Registry, TagSource, tags};

use common::HttpConfig;

#[derive(Debug, Clone, Default)]
struct Service {
    name: String,
}

impl Configurable for Service {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .leaf(
                "Name",
                tags! { "env" => "SERVICE_NAME", "doc" => "service name" },
                |s: &Self| s.name.clone(),
                |s, v| s.name = v,
            )
            .build()
    }
}

#[derive(Debug, Clone, Default)]
struct Root {
    service: Service,
}

impl Configurable for Root {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .nested(
                "Service",
                tags! {},
                Service::field_map(),
                |r: &Self| &r.service,
                |r: &mut Self| &mut r.service,
            )
            .build()
    }
}

fn env_registry() -> Registry {
    Registry::builder()
        .source(EnvSource::from_snapshot(Vec::<(String, String)>::new()))
        .source(TagSource::new("default"))
        .build()
}

#[rstest]
fn unset_variable_documents_with_empty_value() -> Result<()> {
    let mut registry = env_registry();
    let mut root = Root::default();
    registry.register(&root)?;
    registry.parse(&mut root)?;
    ensure!(root.service.name.is_empty());

    let doc = registry.gen_doc("env");
    ensure!(doc == "#service name\n#SERVICE_NAME=\n\n", "got {doc:?}");
    Ok(())
}

#[rstest]
fn doc_reflects_last_parsed_values() -> Result<()> {
    let mut registry = Registry::builder()
        .source(EnvSource::from_snapshot([("HTTP_HOST", "localhost")]))
        .build();
    let mut http = HttpConfig::default();
    registry.register(&http)?;
    registry.parse(&mut http)?;

    let doc = registry.gen_doc("env");
    ensure!(
        doc == "#http host\n#HTTP_HOST=localhost\n#http port\n#HTTP_PORT=0\n#auth token\n#HTTP_TOKEN=\n\n",
        "got {doc:?}"
    );
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct ServiceA {
    http: HttpConfig,
}

impl Configurable for ServiceA {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .nested(
                "HTTP",
                tags! { "yaml" => "http" },
                HttpConfig::field_map(),
                |s: &Self| &s.http,
                |s: &mut Self| &mut s.http,
            )
            .build()
    }
}

#[derive(Debug, Clone, Default)]
struct ServiceB {
    http: HttpConfig,
}

impl Configurable for ServiceB {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .nested(
                "HTTP",
                tags! { "yaml" => "http" },
                HttpConfig::field_map(),
                |s: &Self| &s.http,
                |s: &mut Self| &mut s.http,
            )
            .build()
    }
}

#[rstest]
fn shared_block_documents_once() -> Result<()> {
    let mut registry = env_registry();
    registry.register(&ServiceA::default())?;
    registry.register(&ServiceB::default())?;

    let doc = registry.gen_doc("env");
    ensure!(doc.matches("#HTTP_HOST=").count() == 1, "got {doc:?}");
    ensure!(doc.matches("#HTTP_TOKEN=").count() == 1, "got {doc:?}");
    Ok(())
}

#[rstest]
fn unknown_source_name_yields_empty_doc() -> Result<()> {
    let mut registry = env_registry();
    registry.register(&Root::default())?;
    ensure!(registry.gen_doc("nope").is_empty());
    Ok(())
}

#[rstest]
fn tag_source_never_documents() -> Result<()> {
    let mut registry = env_registry();
    registry.register(&Root::default())?;
    ensure!(registry.gen_doc("tag").is_empty());
    Ok(())
}
