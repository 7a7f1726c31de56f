//! YAML-source documentation rendering.

#![cfg(feature = "yaml")]

mod common;

use anyhow::{Result, ensure};
use rstest::rstest;
use tierconf::{Configurable, Registry, YamlSource};

use common::AppConfig;

#[rstest]
fn nested_blocks_indent_under_their_root() -> Result<()> {
    let mut registry = Registry::builder()
        .source(YamlSource::new("missing.yaml"))
        .build();
    registry.register(&AppConfig::default())?;

    let doc = registry.gen_doc("yaml");
    ensure!(
        doc == "#http settings\nhttp:\n\
                \t#http host\n\thost:\n\
                \t#http port\n\tport:\n\
                \t#auth token\n\ttoken:\n\n",
        "got {doc:?}"
    );
    Ok(())
}

#[rstest]
fn untagged_fields_are_excluded() -> Result<()> {
    let mut registry = Registry::builder()
        .source(YamlSource::new("missing.yaml"))
        .build();
    registry.register(&AppConfig::default())?;

    // `Name` carries no yaml tag and must not appear.
    let doc = registry.gen_doc("yaml");
    ensure!(!doc.contains("Name"));
    ensure!(!doc.contains("SERVICE_NAME"));
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct GatewayA {
    http: common::HttpConfig,
}

impl Configurable for GatewayA {
    fn field_map() -> tierconf::FieldMap {
        tierconf::FieldMap::builder::<Self>()
            .nested(
                "HTTP",
                tierconf::tags! { "yaml" => "http", "doc" => "http settings" },
                common::HttpConfig::field_map(),
                |g: &Self| &g.http,
                |g: &mut Self| &mut g.http,
            )
            .build()
    }
}

#[derive(Debug, Clone, Default)]
struct GatewayB {
    http: common::HttpConfig,
}

impl Configurable for GatewayB {
    fn field_map() -> tierconf::FieldMap {
        tierconf::FieldMap::builder::<Self>()
            .nested(
                "HTTP",
                tierconf::tags! { "yaml" => "http", "doc" => "http settings" },
                common::HttpConfig::field_map(),
                |g: &Self| &g.http,
                |g: &mut Self| &mut g.http,
            )
            .build()
    }
}

#[rstest]
fn identically_embedded_block_renders_once() -> Result<()> {
    let mut registry = Registry::builder()
        .source(YamlSource::new("missing.yaml"))
        .build();
    registry.register(&GatewayA::default())?;
    registry.register(&GatewayB::default())?;

    let doc = registry.gen_doc("yaml");
    ensure!(doc.matches("http:").count() == 1, "got {doc:?}");
    ensure!(doc.matches("\thost:").count() == 1, "got {doc:?}");
    Ok(())
}
