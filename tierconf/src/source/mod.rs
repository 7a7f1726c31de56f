//! The value-source contract consumed by the registry, plus the shipped
//! sources: static tag defaults, environment snapshot and YAML document.

mod env;
mod tag;
#[cfg(feature = "yaml")]
mod yaml;

pub use env::EnvSource;
pub use tag::TagSource;
#[cfg(feature = "yaml")]
pub use yaml::YamlSource;

use thiserror::Error;

use crate::field::FieldDescriptor;
use crate::registry::Registration;
use crate::value::ConfigValue;

/// Classified failure reported by a source for one field lookup.
///
/// The registry absorbs all three kinds; the classification only selects the
/// log severity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The field carries no usable tag for this source.
    #[error("tag not configured: {0}")]
    TagNotConfigured(String),

    /// The source holds no value for this field.
    #[error("value not found: {0}")]
    ValueNotFound(String),

    /// Any other failure, typically coercion or I/O.
    #[error("source failure: {0}")]
    Invalid(Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    /// Wraps an arbitrary error as the generic classification.
    #[must_use]
    pub fn invalid(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Invalid(Box::new(err))
    }
}

/// A successfully resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// What produced the value: a variable name, tag key or source name.
    pub source: String,
    /// The value, coerced to the field's declared kind.
    pub value: ConfigValue,
}

/// A named, ordered provider of field values and optional documentation.
///
/// Sources are queried per leaf field in configuration order; the last source
/// to succeed wins.
pub trait Source {
    /// Stable identifier used for precedence logging and for selecting the
    /// source in [`Registry::gen_doc`](crate::Registry::gen_doc).
    fn name(&self) -> &str;

    /// Resolves the value for one leaf field.
    ///
    /// # Errors
    ///
    /// Returns a classified [`SourceError`]; the registry logs and absorbs
    /// all of them.
    fn get_value(&self, field: &FieldDescriptor) -> Result<Resolved, SourceError>;

    /// Renders documentation over all current registrations.
    ///
    /// Sources without documentation support return an empty string.
    fn gen_doc(&self, registrations: &[Registration]) -> String {
        let _ = registrations;
        String::new()
    }
}

/// The declared kind of `field`, or `ValueNotFound` for branch containers.
fn leaf_kind(field: &FieldDescriptor) -> Result<crate::value::ValueKind, SourceError> {
    field.value_kind().ok_or_else(|| {
        SourceError::ValueNotFound(format!("{} is not a leaf field", field.path()))
    })
}
