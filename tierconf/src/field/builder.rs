//! Typed construction of field maps.

use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::value::{FieldValue, ValueError};

use super::{FieldDescriptor, FieldKind, FieldMap, Getter, Setter, TagSet};

/// Builds the descriptor table for one structure type `T`.
///
/// Leaves are registered with typed accessor functions; nested structures
/// embed a child map under a path prefix, with accessors rebased through a
/// projection. Declaration order is preserved and drives resolution order.
pub struct FieldMapBuilder<T: 'static> {
    fields: Vec<FieldDescriptor>,
    _marker: PhantomData<fn(T)>,
}

impl<T: 'static> FieldMapBuilder<T> {
    pub(super) const fn new() -> Self {
        Self {
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Registers a scalar leaf field named `name` at the top level of `T`.
    #[must_use]
    pub fn leaf<V: FieldValue + 'static>(
        mut self,
        name: &str,
        tags: TagSet,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        let getter: Getter = Arc::new(move |instance: &dyn Any| {
            instance.downcast_ref::<T>().map(|t| get(t).into_value())
        });
        let setter: Setter = Arc::new(move |instance: &mut dyn Any, value| {
            let Some(target) = instance.downcast_mut::<T>() else {
                return Err(ValueError::ForeignInstance);
            };
            set(target, V::from_value(value)?);
            Ok(())
        });
        let tag_paths = own_tag_paths(&tags);
        self.fields.push(FieldDescriptor {
            path: name.to_owned(),
            kind: FieldKind::Leaf(V::KIND),
            tags,
            tag_paths,
            getter: Some(getter),
            setter: Some(setter),
        });
        self
    }

    /// Embeds a nested structure `C` under `name`, producing a container
    /// descriptor plus one rebased descriptor per child field. The child's
    /// tag paths are extended with this field's tag values key-by-key.
    #[must_use]
    pub fn nested<C: 'static>(
        mut self,
        name: &str,
        tags: TagSet,
        child: FieldMap,
        project: fn(&T) -> &C,
        project_mut: fn(&mut T) -> &mut C,
    ) -> Self {
        let mut rebased = Vec::with_capacity(child.fields.len());
        for field in child.fields {
            let tag_paths = nest_tag_paths(&tags, &field.tag_paths);
            let getter = field.getter.map(|inner| -> Getter {
                Arc::new(move |instance: &dyn Any| {
                    let outer = instance.downcast_ref::<T>()?;
                    inner(project(outer) as &dyn Any)
                })
            });
            let setter = field.setter.map(|inner| -> Setter {
                Arc::new(move |instance: &mut dyn Any, value| {
                    let Some(outer) = instance.downcast_mut::<T>() else {
                        return Err(ValueError::ForeignInstance);
                    };
                    inner(project_mut(outer) as &mut dyn Any, value)
                })
            });
            rebased.push(FieldDescriptor {
                path: format!("{name}.{}", field.path),
                kind: field.kind,
                tags: field.tags,
                tag_paths,
                getter,
                setter,
            });
        }
        self.fields.push(FieldDescriptor {
            path: name.to_owned(),
            kind: FieldKind::Branch(TypeId::of::<C>()),
            tag_paths: own_tag_paths(&tags),
            tags,
            getter: None,
            setter: None,
        });
        self.fields.extend(rebased);
        self
    }

    /// Finalizes the map.
    #[must_use]
    pub fn build(self) -> FieldMap {
        let index: BTreeMap<String, usize> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.path.clone(), i))
            .collect();
        FieldMap {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            fields: self.fields,
            index,
        }
    }
}

fn own_tag_paths(tags: &TagSet) -> BTreeMap<String, String> {
    tags.iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

fn nest_tag_paths(
    parent: &TagSet,
    child: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    child
        .iter()
        .map(|(key, value)| {
            let nested = parent
                .lookup(key)
                .filter(|prefix| !prefix.is_empty())
                .map_or_else(|| value.clone(), |prefix| format!("{prefix}.{value}"));
            (key.clone(), nested)
        })
        .collect()
}
