//! Error types produced by the registry.

use thiserror::Error;

/// Errors that can occur while registering or parsing configuration.
///
/// Per-field, per-source failures during a parse are classified, logged and
/// absorbed; they never surface here. See [`SourceError`](crate::SourceError)
/// for that classification.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The parse target is neither registered nor embedded as a field of any
    /// registration.
    #[error("configuration type `{type_name}` is not registered")]
    NotRegistered {
        /// The offending target type.
        type_name: &'static str,
    },

    /// The type's field map was built for a different root type.
    #[error("cannot register `{type_name}`: its field map was built for `{map_type}`")]
    InvalidShape {
        /// The type passed to registration.
        type_name: &'static str,
        /// The root type the field map was actually built for.
        map_type: &'static str,
    },
}
