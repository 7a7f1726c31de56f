//! The registry: per-type registrations and the resolution engine.
//!
//! Registration builds a type's field map once; parsing then queries every
//! configured source per leaf field, in precedence order, committing the last
//! successful value. Types that are not registered directly can still be
//! parsed when they appear as a nested field of a registered parent.

use std::any::{Any, TypeId, type_name};
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::Configurable;
use crate::error::ConfigError;
use crate::field::{FieldDescriptor, FieldKind, FieldMap, strip_parent};
use crate::source::{Source, SourceError};
use crate::value::ConfigValue;

/// Fixed-length replacement logged for fields tagged `hidden = "true"`.
const REDACTED: &str = "********";

/// One registered structure type: its field map, a snapshot of its last
/// known values, and a factory for zero-valued instances.
pub struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    fields: Arc<FieldMap>,
    snapshot: Box<dyn Any>,
    fresh: fn() -> Box<dyn Any>,
}

impl Registration {
    fn new<T: Configurable>(seed: &T, fields: FieldMap) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            fields: Arc::new(fields),
            snapshot: Box::new(seed.clone()),
            fresh: fresh_instance::<T>,
        }
    }

    /// The field map, built once at registration time.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Name of the registered type, for logging and documentation.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Reads a field's current value from the registration snapshot, which
    /// reflects the last direct parse of this type.
    #[must_use]
    pub fn current(&self, field: &FieldDescriptor) -> Option<ConfigValue> {
        field.get(self.snapshot.as_ref())
    }
}

fn fresh_instance<T: Configurable>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Builds a [`Registry`] with sources in precedence order.
#[derive(Default)]
pub struct RegistryBuilder {
    sources: Vec<Box<dyn Source>>,
}

impl RegistryBuilder {
    /// Appends a source; later sources override earlier ones for the same
    /// field.
    #[must_use]
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Finalizes the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            sources: self.sources,
            registrations: Vec::new(),
        }
    }
}

/// Catalogue of registered configuration types plus the resolution engine.
///
/// Not internally synchronized; callers needing concurrent access must
/// serialize externally.
#[derive(Default)]
pub struct Registry {
    sources: Vec<Box<dyn Source>>,
    registrations: Vec<Registration>,
}

impl Registry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registers `seed`'s type, replacing any previous registration for it.
    ///
    /// The field map is built here, once, and reused by every subsequent
    /// [`parse`](Self::parse) of the same type. `seed`'s values become the
    /// initial snapshot used by documentation rendering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShape`] when the type's field map was
    /// built for a different root type.
    pub fn register<T: Configurable>(&mut self, seed: &T) -> Result<(), ConfigError> {
        let fields = T::field_map();
        if fields.type_id() != TypeId::of::<T>() {
            return Err(ConfigError::InvalidShape {
                type_name: type_name::<T>(),
                map_type: fields.type_name(),
            });
        }
        let registration = Registration::new(seed, fields);
        let slot = self
            .registrations
            .iter_mut()
            .find(|r| r.type_id == registration.type_id);
        let Some(existing) = slot else {
            self.registrations.push(registration);
            return Ok(());
        };
        *existing = registration;
        Ok(())
    }

    /// Resolves configuration into `target`'s leaf fields.
    ///
    /// For a directly registered type every leaf is queried against every
    /// source in precedence order; a resolved value is written only when it
    /// differs from the field's current value. Per-field, per-source failures
    /// are logged and absorbed. For an unregistered type, the first
    /// registration embedding `T` as a nested field is resolved in full into
    /// a fresh parent, and the touched values under the matched field are
    /// copied back; everything else in `target` is left as the caller set it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotRegistered`] when `target`'s type is neither
    /// registered nor embedded in any registration.
    pub fn parse<T: Configurable>(&mut self, target: &mut T) -> Result<(), ConfigError> {
        let target_type = TypeId::of::<T>();
        if let Some(idx) = self
            .registrations
            .iter()
            .position(|r| r.type_id == target_type)
        {
            if let Some(registration) = self.registrations.get(idx) {
                resolve_into(&self.sources, registration, target);
            }
            if let Some(registration) = self.registrations.get_mut(idx) {
                registration.snapshot = Box::new(target.clone());
            }
            return Ok(());
        }
        self.parse_embedded(target)
    }

    /// Renders documentation from the source named `name` over all current
    /// registrations. An unknown name yields an empty string, not an error.
    #[must_use]
    pub fn gen_doc(&self, name: &str) -> String {
        self.sources
            .iter()
            .find(|source| source.name() == name)
            .map(|source| source.gen_doc(&self.registrations))
            .unwrap_or_default()
    }

    fn parse_embedded<T: Configurable>(&self, target: &mut T) -> Result<(), ConfigError> {
        let Some((registration, branch_path)) = self.find_embedding(TypeId::of::<T>()) else {
            return Err(ConfigError::NotRegistered {
                type_name: type_name::<T>(),
            });
        };
        let mut parent = (registration.fresh)();
        let touched = resolve_into(&self.sources, registration, parent.as_mut());
        let own_fields = T::field_map();
        for path in &touched {
            let Some(local) = strip_parent(path, branch_path) else {
                continue;
            };
            let Some(parent_field) = registration.fields.find(path) else {
                continue;
            };
            let Some(own_field) = own_fields.find(local) else {
                continue;
            };
            let Some(value) = parent_field.get(parent.as_ref()) else {
                continue;
            };
            if let Err(err) = own_field.set(target, value) {
                error!(
                    config = type_name::<T>(),
                    field = local,
                    details = %err,
                    "failed"
                );
            }
        }
        Ok(())
    }

    /// First registration, in insertion order, embedding a field of the given
    /// type, along with that field's path.
    fn find_embedding(&self, target_type: TypeId) -> Option<(&Registration, &str)> {
        for registration in &self.registrations {
            for field in registration.fields.iter() {
                if field.kind() == FieldKind::Branch(target_type) {
                    return Some((registration, field.path()));
                }
            }
        }
        None
    }
}

/// Runs the full per-leaf, per-source resolution pass, returning the paths
/// whose values were written.
fn resolve_into(
    sources: &[Box<dyn Source>],
    registration: &Registration,
    target: &mut dyn Any,
) -> BTreeSet<String> {
    let mut touched = BTreeSet::new();
    for field in registration.fields.leaves() {
        for source in sources {
            apply_source(registration, source.as_ref(), field, target, &mut touched);
        }
    }
    touched
}

fn apply_source(
    registration: &Registration,
    source: &dyn Source,
    field: &FieldDescriptor,
    target: &mut dyn Any,
    touched: &mut BTreeSet<String>,
) {
    let config = registration.type_name;
    let name = source.name();
    let path = field.path();
    match source.get_value(field) {
        Err(SourceError::TagNotConfigured(details)) => {
            warn!(config, source = name, field = path, details = %details, "ignore");
        }
        Err(SourceError::ValueNotFound(details)) => {
            debug!(config, source = name, field = path, details = %details, "skip");
        }
        Err(err) => {
            error!(config, source = name, field = path, details = %err, "failed");
        }
        Ok(resolved) => {
            let current = field.get(&*target);
            if current.as_ref() == Some(&resolved.value) {
                return;
            }
            debug!(
                config,
                source = name,
                field = path,
                origin = %resolved.source,
                value = %logged_value(field, &resolved.value),
                "override"
            );
            match field.set(target, resolved.value) {
                Ok(()) => {
                    touched.insert(path.to_owned());
                }
                Err(err) => {
                    error!(config, source = name, field = path, details = %err, "failed");
                }
            }
        }
    }
}

/// Value rendering for logs; hidden fields are redacted.
fn logged_value(field: &FieldDescriptor, value: &ConfigValue) -> String {
    if field.tag("hidden") == Some("true") {
        REDACTED.to_owned()
    } else {
        value.to_string()
    }
}
