//! Environment source: resolves from an injected key-value snapshot.
//!
//! The snapshot is captured at construction, so resolution never touches the
//! process environment and tests can script it. [`EnvSource::from_process`]
//! captures the real environment and overlays `.env` files found next to the
//! executable and in the working directory; file entries never override keys
//! already present.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::docs::{DocRecord, RootStyle, assemble};
use crate::field::FieldDescriptor;
use crate::registry::Registration;
use crate::value::ConfigValue;

use super::{Resolved, Source, SourceError, leaf_kind};

/// Resolves field values from an environment snapshot keyed by the `env` tag.
///
/// Documentation renders as flat `#doc` / `#KEY=value` line pairs, grouped by
/// the first underscore segment of the variable name; depth is the variable
/// name's underscore count.
#[derive(Debug, Clone)]
pub struct EnvSource {
    name: String,
    vars: BTreeMap<String, String>,
}

impl EnvSource {
    /// A source over an explicit snapshot.
    #[must_use]
    pub fn from_snapshot<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: "env".to_owned(),
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A source over the process environment, overlaid with `.env` files from
    /// the executable's directory and the current working directory. Existing
    /// environment keys win over file contents; missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when an existing `.env` file cannot be read or
    /// when the working directory is unavailable.
    pub fn from_process() -> io::Result<Self> {
        let mut vars: BTreeMap<String, String> = std::env::vars().collect();
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                overlay_env_file(&mut vars, &dir.join(".env"))?;
            }
        }
        let cwd = std::env::current_dir()?;
        overlay_env_file(&mut vars, &cwd.join(".env"))?;
        Ok(Self {
            name: "env".to_owned(),
            vars,
        })
    }
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_value(&self, field: &FieldDescriptor) -> Result<Resolved, SourceError> {
        let Some(key) = field.tag(&self.name).filter(|k| !k.is_empty()) else {
            return Err(SourceError::TagNotConfigured(format!(
                "env tag is not set for {} config field",
                field.path()
            )));
        };
        let Some(raw) = self.vars.get(key) else {
            return Err(SourceError::ValueNotFound(format!(
                "{key} is not defined in env for {} config field",
                field.path()
            )));
        };
        let value = ConfigValue::coerce(raw, leaf_kind(field)?).map_err(SourceError::invalid)?;
        Ok(Resolved {
            source: key.to_owned(),
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
                let current = registration
                    .current(field)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let doc = field.tags().get("doc");
                records.push(DocRecord {
                    group: tag.split('_').next().unwrap_or(tag).to_owned(),
                    dedup: tag.to_owned(),
                    depth: tag.matches('_').count(),
                    header: None,
                    line: format!("#{doc}\n#{tag}={current}\n"),
                });
            }
        }
        assemble(&records, RootStyle::Inline)
    }
}

/// Merges `KEY=VALUE` lines from `path` into `vars`, keeping existing keys.
fn overlay_env_file(vars: &mut BTreeMap<String, String>, path: &Path) -> io::Result<()> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    for (key, value) in parse_env_lines(&contents) {
        vars.entry(key).or_insert(value);
    }
    Ok(())
}

/// Parses `.env` contents: blank lines and `#` comments are skipped, a line
/// without `=` yields an empty value.
fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
            Some((key.to_owned(), value.to_owned()))
        })
        .collect()
}
