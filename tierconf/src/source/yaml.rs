//! YAML document source: resolves by walking a memoized parsed document.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use serde_json::Value as DocValue;

use crate::docs::{DocRecord, RootStyle, assemble};
use crate::field::{FieldDescriptor, root_segment};
use crate::registry::Registration;
use crate::value::{ConfigValue, ValueError, ValueKind};

use super::{Resolved, Source, SourceError, leaf_kind};

/// Resolves field values from a YAML document, addressed by the dot-segments
/// of each field's nested `yaml` tag path.
///
/// The file is read and parsed once, on first access, and the result is
/// memoized for the lifetime of the source: the first failed load reports the
/// real error, every later lookup reports value-not-found. Documentation
/// renders a `#doc` / `key:` skeleton, tab-indented by struct-path depth and
/// grouped under the top-level field.
#[derive(Debug)]
pub struct YamlSource {
    name: String,
    path: PathBuf,
    document: OnceCell<Option<DocValue>>,
}

impl YamlSource {
    /// A source reading the document at `path` lazily on first lookup.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "yaml".to_owned(),
            path: path.into(),
            document: OnceCell::new(),
        }
    }

    fn document(&self) -> Result<&DocValue, SourceError> {
        let mut load_error = None;
        let document = self.document.get_or_init(|| match load_document(&self.path) {
            Ok(doc) => Some(doc),
            Err(err) => {
                load_error = Some(err);
                None
            }
        });
        document.as_ref().ok_or_else(|| {
            load_error.unwrap_or_else(|| {
                SourceError::ValueNotFound(format!(
                    "no document loaded from {}",
                    self.path.display()
                ))
            })
        })
    }
}

impl Source for YamlSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(&self, field: &FieldDescriptor) -> Result<Resolved, SourceError> {
        let Some(tag_path) = field.tag_path(&self.name).filter(|p| !p.is_empty()) else {
            return Err(SourceError::TagNotConfigured(format!(
                "'{}' tag is not set for {} config field",
                self.name,
                field.path()
            )));
        };
        let document = self.document()?;
        let node = lookup(document, tag_path).ok_or_else(|| {
            SourceError::ValueNotFound(format!(
                "no value at `{tag_path}` in {}",
                self.path.display()
            ))
        })?;
        let value = convert(node, leaf_kind(field)?).map_err(SourceError::invalid)?;
        Ok(Resolved {
            source: self.name.clone(),
            value,
        })
    }

    fn gen_doc(&self, registrations: &[Registration]) -> String {
        let mut records = Vec::new();
        for registration in registrations {
            for field in registration.fields().iter() {
                let Some(tag) = field.tag(&self.name) else {
                    continue;
                };
                let depth = field.depth();
                let doc = field.tags().get("doc");
                let dedup = field.tag_path(&self.name).unwrap_or(tag).to_owned();
                let (header, line) = if depth == 0 {
                    (Some(format!("#{doc}\n{tag}:\n")), String::new())
                } else {
                    let indent = "\t".repeat(depth);
                    (None, format!("{indent}#{doc}\n{indent}{tag}:\n"))
                };
                records.push(DocRecord {
                    group: root_segment(field.path()).to_owned(),
                    dedup,
                    depth,
                    header,
                    line,
                });
            }
        }
        assemble(&records, RootStyle::Headed)
    }
}

fn load_document(path: &Path) -> Result<DocValue, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(SourceError::invalid)?;
    serde_saphyr::from_str(&contents).map_err(SourceError::invalid)
}

/// Walks the document along dot-segments; every intermediate segment must be
/// a mapping containing the next segment.
fn lookup<'doc>(document: &'doc DocValue, tag_path: &str) -> Option<&'doc DocValue> {
    let mut node = document;
    for segment in tag_path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    if node.is_null() { None } else { Some(node) }
}

/// A decoded scalar already matching the declared kind is taken as-is;
/// anything else falls back to string coercion of its rendering.
fn convert(node: &DocValue, kind: ValueKind) -> Result<ConfigValue, ValueError> {
    let direct = match kind {
        ValueKind::String => node.as_str().map(|s| ConfigValue::String(s.to_owned())),
        ValueKind::Bool => node.as_bool().map(ConfigValue::Bool),
        ValueKind::I64 => node.as_i64().map(ConfigValue::I64),
        ValueKind::U64 => node.as_u64().map(ConfigValue::U64),
        ValueKind::F64 => node.as_f64().map(ConfigValue::F64),
    };
    if let Some(value) = direct {
        return Ok(value);
    }
    let raw = node
        .as_str()
        .map_or_else(|| node.to_string(), str::to_owned);
    ConfigValue::coerce(&raw, kind)
}
