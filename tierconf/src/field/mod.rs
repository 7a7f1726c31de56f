//! Field maps: registration-time descriptor tables for configuration structs.
//!
//! A [`FieldMap`] is an explicit, typed table of every dotted path reachable
//! from one struct type, built once via [`FieldMapBuilder`] and reused for
//! every parse of that type. Descriptors carry tag metadata and accessor
//! closures, so the resolution engine never inspects types at runtime.

mod builder;
mod path;
mod tags;

pub use builder::FieldMapBuilder;
pub use tags::TagSet;

pub(crate) use path::{root_segment, strip_parent};

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::{ConfigValue, ValueError, ValueKind};

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Option<ConfigValue> + Send + Sync>;
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, ConfigValue) -> Result<(), ValueError> + Send + Sync>;

/// Shape of a single field within a [`FieldMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar field; the only unit a source may resolve or write.
    Leaf(ValueKind),
    /// Nested structure container, identified by its concrete type. Never
    /// written directly.
    Branch(TypeId),
}

/// Describes one addressable field of a registered structure type.
///
/// Descriptors are immutable once built and are only handed out by
/// reference from their owning [`FieldMap`].
pub struct FieldDescriptor {
    pub(crate) path: String,
    pub(crate) kind: FieldKind,
    pub(crate) tags: TagSet,
    pub(crate) tag_paths: BTreeMap<String, String>,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

impl FieldDescriptor {
    /// Dotted struct path of this field, e.g. `HTTP.Auth.Issuer`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dot-segment depth of the struct path; 0 is top level.
    #[must_use]
    pub fn depth(&self) -> usize {
        path::depth(&self.path)
    }

    /// Leaf or branch shape.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether this field is a scalar leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldKind::Leaf(_))
    }

    /// Declared scalar kind, `None` for branches.
    #[must_use]
    pub const fn value_kind(&self) -> Option<ValueKind> {
        match self.kind {
            FieldKind::Leaf(kind) => Some(kind),
            FieldKind::Branch(_) => None,
        }
    }

    /// Tag metadata attached to this field.
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// The value of one tag, `None` when absent.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.lookup(key)
    }

    /// The dotted tag path for `key`: the field's own tag value prefixed by
    /// every ancestor's value for the same key (ancestors without the tag are
    /// skipped). E.g. a `yaml` tag path of `http.host` for `HTTP.Host`.
    #[must_use]
    pub fn tag_path(&self, key: &str) -> Option<&str> {
        self.tag_paths.get(key).map(String::as_str)
    }

    /// Reads the field's current value from `instance`.
    ///
    /// Returns `None` for branches and for instances of a foreign type.
    #[must_use]
    pub fn get(&self, instance: &dyn Any) -> Option<ConfigValue> {
        self.getter.as_ref().and_then(|getter| getter(instance))
    }

    /// Writes `value` into the field on `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotWritable`] for branches,
    /// [`ValueError::ForeignInstance`] when `instance` is not of the owning
    /// type, and a conversion error when `value` does not fit the field.
    pub fn set(&self, instance: &mut dyn Any, value: ConfigValue) -> Result<(), ValueError> {
        let Some(setter) = self.setter.as_ref() else {
            return Err(ValueError::NotWritable {
                path: self.path.clone(),
            });
        };
        setter(instance, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Ordered descriptor table for one structure type.
pub struct FieldMap {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) index: BTreeMap<String, usize>,
}

impl FieldMap {
    /// Starts building a map rooted at `T`.
    #[must_use]
    pub const fn builder<T: 'static>() -> FieldMapBuilder<T> {
        FieldMapBuilder::new()
    }

    /// `TypeId` of the root structure type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the root structure type, for logging.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolves a dotted path to its descriptor.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FieldDescriptor> {
        self.index.get(path).and_then(|i| self.fields.get(*i))
    }

    /// Iterates descriptors in declaration order, parents before children.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Iterates only leaf descriptors, in declaration order.
    pub fn leaves(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_leaf())
    }

    /// Number of descriptors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map has no descriptors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMap")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
