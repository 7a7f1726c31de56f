//! End-to-end demo: a service configuration resolved from tag defaults, the
//! process environment (with `.env` overlay) and an optional YAML file.
//!
//! Run with `RUST_LOG=debug` to watch per-field resolution decisions.

use tierconf::{Configurable, EnvSource, FieldMap, Registry, TagSource, YamlSource, tags};
use tracing::info;

#[derive(Debug, Clone, Default)]
struct HttpConfig {
    host: String,
    port: u16,
    token: String,
}

impl Configurable for HttpConfig {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .leaf(
                "Host",
                tags! {
                    "default" => "127.0.0.1",
                    "env" => "HTTP_HOST",
                    "yaml" => "host",
                    "doc" => "listen host",
                },
                |c: &Self| c.host.clone(),
                |c, v| c.host = v,
            )
            .leaf(
                "Port",
                tags! {
                    "default" => "8080",
                    "env" => "HTTP_PORT",
                    "yaml" => "port",
                    "doc" => "listen port",
                },
                |c: &Self| c.port,
                |c, v| c.port = v,
            )
            .leaf(
                "Token",
                tags! {
                    "env" => "HTTP_TOKEN",
                    "yaml" => "token",
                    "doc" => "auth token",
                    "hidden" => "true",
                },
                |c: &Self| c.token.clone(),
                |c, v| c.token = v,
            )
            .build()
    }
}

#[derive(Debug, Clone, Default)]
struct ServiceConfig {
    name: String,
    http: HttpConfig,
}

impl Configurable for ServiceConfig {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .leaf(
                "Name",
                tags! {
                    "default" => "demo",
                    "env" => "SERVICE_NAME",
                    "doc" => "service name",
                },
                |c: &Self| c.name.clone(),
                |c, v| c.name = v,
            )
            .nested(
                "HTTP",
                tags! { "yaml" => "http", "doc" => "http settings" },
                HttpConfig::field_map(),
                |c: &Self| &c.http,
                |c: &mut Self| &mut c.http,
            )
            .build()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut registry = Registry::builder()
        .source(TagSource::new("default"))
        .source(EnvSource::from_process()?)
        .source(YamlSource::new("config.yaml"))
        .build();

    let mut config = ServiceConfig::default();
    registry.register(&config)?;
    registry.parse(&mut config)?;

    info!(
        name = %config.name,
        host = %config.http.host,
        port = config.http.port,
        "resolved service configuration"
    );
    info!(doc = %registry.gen_doc("env"), "environment reference");
    info!(doc = %registry.gen_doc("yaml"), "yaml reference");
    Ok(())
}
