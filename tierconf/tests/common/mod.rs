//! Shared fixtures: configuration types with hand-built field maps and a
//! scripted source keyed by field path.

use std::collections::BTreeMap;

use tierconf::{
    ConfigValue, Configurable, FieldMap, Resolved, Source, SourceError, tags,
};

/// Nested block reused by the application config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub token: String,
}

impl Configurable for HttpConfig {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .leaf(
                "Host",
                tags! {
                    "env" => "HTTP_HOST",
                    "yaml" => "host",
                    "doc" => "http host",
                },
                |c: &Self| c.host.clone(),
                |c, v| c.host = v,
            )
            .leaf(
                "Port",
                tags! {
                    "env" => "HTTP_PORT",
                    "yaml" => "port",
                    "doc" => "http port",
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

/// Top-level application config embedding [`HttpConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Configurable for AppConfig {
    fn field_map() -> FieldMap {
        FieldMap::builder::<Self>()
            .leaf(
                "Name",
                tags! { "env" => "SERVICE_NAME", "doc" => "service name" },
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

/// Scripted source resolving raw strings keyed by struct path.
pub struct MapSource {
    name: String,
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new(name: &str, values: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_owned(),
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }
}

impl Source for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(
        &self,
        field: &tierconf::FieldDescriptor,
    ) -> Result<Resolved, SourceError> {
        let Some(raw) = self.values.get(field.path()) else {
            return Err(SourceError::ValueNotFound(format!(
                "no scripted value for {}",
                field.path()
            )));
        };
        let Some(kind) = field.value_kind() else {
            return Err(SourceError::ValueNotFound(format!(
                "{} is not a leaf field",
                field.path()
            )));
        };
        let value = ConfigValue::coerce(raw, kind).map_err(SourceError::invalid)?;
        Ok(Resolved {
            source: self.name.clone(),
            value,
        })
    }
}
