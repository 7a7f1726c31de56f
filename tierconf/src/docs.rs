//! Shared documentation assembler.
//!
//! Every documentation-capable source follows the same shape: collect tagged
//! fields into flat records, deduplicate blocks shared between registrations,
//! then rebuild nested documentation text grouped under top-level roots. The
//! sources differ only in how they compute depth and format lines, so those
//! stay with the source; the grouping and emission live here.

use std::collections::{HashMap, HashSet};

/// One documentable field, pre-formatted by its source.
#[derive(Debug, Clone)]
pub struct DocRecord {
    /// Root-grouping key; records sharing a key render as one block.
    pub group: String,
    /// Identity used to collapse a block embedded identically in several
    /// registrations; first occurrence wins.
    pub dedup: String,
    /// Source-specific nesting depth; 0 marks a root.
    pub depth: usize,
    /// Header emitted once before the block, for styles where roots render
    /// their own line outside the accumulated body.
    pub header: Option<String>,
    /// Formatted body line, newline-terminated, accumulated into the block.
    pub line: String,
}

/// How root blocks are selected during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStyle {
    /// Every group is emitted at its first member; the root's own line, when
    /// present, lives inside the accumulated body.
    Inline,
    /// Only groups whose depth-0 record supplies a header are emitted; the
    /// body hangs under that header.
    Headed,
}

/// Rebuilds nested documentation text from a flat record list.
///
/// Records are deduplicated, stably sorted deepest-first so child lines are
/// in place before their parents, accumulated per group, and emitted in the
/// original encountered order with a blank line between root blocks.
#[must_use]
pub fn assemble(records: &[DocRecord], style: RootStyle) -> String {
    let deduped = dedup(records);

    let mut sorted: Vec<&DocRecord> = deduped.clone();
    sorted.sort_by(|a, b| b.depth.cmp(&a.depth));

    let mut groups: HashMap<&str, String> = HashMap::new();
    for record in &sorted {
        groups
            .entry(record.group.as_str())
            .or_default()
            .push_str(&record.line);
    }

    emit(&deduped, &groups, style)
}

fn dedup(records: &[DocRecord]) -> Vec<&DocRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.dedup.as_str()))
        .collect()
}

fn emit(records: &[&DocRecord], groups: &HashMap<&str, String>, style: RootStyle) -> String {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut out = String::new();
    for record in records {
        let header = match style {
            RootStyle::Inline => "",
            RootStyle::Headed => {
                let Some(header) = record.header.as_deref() else {
                    continue;
                };
                header
            }
        };
        if !emitted.insert(record.group.as_str()) {
            continue;
        }
        out.push_str(header);
        out.push_str(groups.get(record.group.as_str()).map_or("", String::as_str));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};

    use super::{DocRecord, RootStyle, assemble};

    fn record(group: &str, dedup: &str, depth: usize, line: &str) -> DocRecord {
        DocRecord {
            group: group.to_owned(),
            dedup: dedup.to_owned(),
            depth,
            header: None,
            line: line.to_owned(),
        }
    }

    #[test]
    fn inline_groups_deepest_first() -> Result<()> {
        let records = vec![
            record("DB", "DB_HOST", 1, "#DB_HOST=\n"),
            record("DB", "DB_POOL_SIZE", 2, "#DB_POOL_SIZE=\n"),
        ];
        let out = assemble(&records, RootStyle::Inline);
        ensure!(out == "#DB_POOL_SIZE=\n#DB_HOST=\n\n", "got {out:?}");
        Ok(())
    }

    #[test]
    fn duplicate_blocks_collapse_to_first() -> Result<()> {
        let records = vec![
            record("DB", "DB_HOST", 1, "#DB_HOST=a\n"),
            record("DB", "DB_HOST", 1, "#DB_HOST=b\n"),
        ];
        let out = assemble(&records, RootStyle::Inline);
        ensure!(out == "#DB_HOST=a\n\n", "got {out:?}");
        Ok(())
    }

    #[test]
    fn headed_skips_groups_without_a_root() -> Result<()> {
        let mut root = record("HTTP", "http", 0, "");
        root.header = Some("#http\nhttp:\n".to_owned());
        let records = vec![
            root,
            record("HTTP", "http.host", 1, "\t#host\n\thost:\n"),
            record("GRPC", "grpc.port", 1, "\t#port\n\tport:\n"),
        ];
        let out = assemble(&records, RootStyle::Headed);
        ensure!(out == "#http\nhttp:\n\t#host\n\thost:\n\n", "got {out:?}");
        Ok(())
    }

    #[test]
    fn blocks_separate_with_blank_lines() -> Result<()> {
        let records = vec![
            record("A", "A_X", 1, "#A_X=\n"),
            record("B", "B_Y", 1, "#B_Y=\n"),
        ];
        let out = assemble(&records, RootStyle::Inline);
        ensure!(out == "#A_X=\n\n#B_Y=\n\n", "got {out:?}");
        Ok(())
    }
}
