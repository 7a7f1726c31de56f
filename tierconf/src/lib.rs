//! A layered configuration-resolution engine.
//!
//! `tierconf` populates the fields of registered structs from an ordered list
//! of pluggable value sources. Each struct describes itself with a
//! [`FieldMap`] built once at registration time; the [`Registry`] then
//! resolves every leaf field against the configured sources in precedence
//! order, where the last source to succeed wins. Sources that support it can
//! also render hierarchical documentation over everything registered.
//!
//! Three sources ship with the crate: [`TagSource`] (static defaults from a
//! tag literal), [`EnvSource`] (an injected environment snapshot with `.env`
//! overlay), and [`YamlSource`] (a memoized YAML document, behind the
//! default-on `yaml` feature).
//!
//! ```
//! use tierconf::{Configurable, FieldMap, Registry, TagSource, tags};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Http {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Configurable for Http {
//!     fn field_map() -> FieldMap {
//!         FieldMap::builder::<Self>()
//!             .leaf(
//!                 "Host",
//!                 tags! { "default" => "localhost", "doc" => "bind host" },
//!                 |c: &Self| c.host.clone(),
//!                 |c, v| c.host = v,
//!             )
//!             .leaf(
//!                 "Port",
//!                 tags! { "default" => "8080", "doc" => "bind port" },
//!                 |c: &Self| c.port,
//!                 |c, v| c.port = v,
//!             )
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<(), tierconf::ConfigError> {
//! let mut registry = Registry::builder()
//!     .source(TagSource::new("default"))
//!     .build();
//! let mut http = Http::default();
//! registry.register(&http)?;
//! registry.parse(&mut http)?;
//! assert_eq!(http.host, "localhost");
//! assert_eq!(http.port, 8080);
//! # Ok(())
//! # }
//! ```

pub mod docs;
mod error;
pub mod field;
pub mod registry;
pub mod source;
mod value;

pub use error::ConfigError;
pub use field::{FieldDescriptor, FieldKind, FieldMap, FieldMapBuilder, TagSet};
pub use registry::{Registration, Registry, RegistryBuilder};
#[cfg(feature = "yaml")]
pub use source::YamlSource;
pub use source::{EnvSource, Resolved, Source, SourceError, TagSource};
pub use value::{ConfigValue, FieldValue, ValueError, ValueKind};

/// Implemented by structs that can be registered for resolution.
///
/// `Default` supplies the zero-valued parent instance used by sub-structure
/// parsing; `Clone` lets the registry keep a snapshot of last-parsed values
/// for documentation rendering.
pub trait Configurable: Default + Clone + std::any::Any {
    /// Builds the field-descriptor table for this type.
    ///
    /// Called once per [`Registry::register`]; the result is reused by every
    /// subsequent parse of the same type.
    fn field_map() -> FieldMap;
}
