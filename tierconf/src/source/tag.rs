//! Static defaults resolved from a tag literal on the field itself.

use crate::field::FieldDescriptor;
use crate::value::ConfigValue;

use super::{Resolved, Source, SourceError, leaf_kind};

/// Resolves a field's value from a literal carried by one of its own tags,
/// conventionally `default`. Never reports documentation.
#[derive(Debug, Clone)]
pub struct TagSource {
    tag: String,
    name: String,
}

impl TagSource {
    /// A source reading literals from the tag key `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            name: "tag".to_owned(),
        }
    }
}

impl Source for TagSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(&self, field: &FieldDescriptor) -> Result<Resolved, SourceError> {
        let Some(raw) = field.tag(&self.tag) else {
            return Err(SourceError::TagNotConfigured(format!(
                "{} tag is not set for {} config field",
                self.tag,
                field.path()
            )));
        };
        if raw.is_empty() {
            return Err(SourceError::TagNotConfigured(format!(
                "{} tag is set, but has empty value for {} config field",
                self.tag,
                field.path()
            )));
        }
        let value = ConfigValue::coerce(raw, leaf_kind(field)?).map_err(SourceError::invalid)?;
        Ok(Resolved {
            source: self.tag.clone(),
            value,
        })
    }
}
