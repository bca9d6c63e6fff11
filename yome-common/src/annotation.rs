//! Keyword-driven annotation quality labels
//!
//! Rows of a table carry an `annotation_quality` label: `high`, `low`,
//! `tbd` or unset (Null). [`apply_keyword`] labels rows whose text field
//! mentions a keyword, and flags rows whose existing label disagrees as `tbd`.

use crate::db::value::Value;
use crate::table::Table;
use crate::{Error, Result};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Column holding the quality label
pub const QUALITY_COLUMN: &str = "annotation_quality";

/// Columns used to name conflicting rows in log output
const LOCUS_COLUMNS: &[&str] = &["locus_tag", "locus_id"];

/// Confidence in a knowledgebase annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationQuality {
    High,
    Low,
    /// Conflicting evidence; needs review
    Tbd,
}

impl AnnotationQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationQuality::High => "high",
            AnnotationQuality::Low => "low",
            AnnotationQuality::Tbd => "tbd",
        }
    }
}

impl fmt::Display for AnnotationQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationQuality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "high" => Ok(AnnotationQuality::High),
            "low" => Ok(AnnotationQuality::Low),
            "tbd" => Ok(AnnotationQuality::Tbd),
            other => Err(Error::InvalidInput(format!(
                "Unknown annotation quality '{}'",
                other
            ))),
        }
    }
}

impl From<AnnotationQuality> for Value {
    fn from(quality: AnnotationQuality) -> Self {
        Value::Text(quality.as_str().to_string())
    }
}

/// Rows touched by one [`apply_keyword`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordOutcome {
    /// Rows given the keyword's label
    pub labeled: usize,
    /// Row indices relabeled `tbd` because they held the opposite label
    pub conflicts: Vec<usize>,
}

/// Label rows whose `field` contains `keyword` (case-insensitive literal).
///
/// With `is_high` the label is `high` and the opposite label is `low`;
/// otherwise the reverse. A matching row holding the opposite label becomes
/// `tbd`, any other matching row (unset, same label, or `tbd`) gets the
/// label. Rows whose `field` is not text never match.
///
/// Conflicts are decided on the labels as they were before this call.
pub fn apply_keyword(
    table: &mut Table,
    keyword: &str,
    field: &str,
    is_high: bool,
) -> Result<KeywordOutcome> {
    let (add, other) = if is_high {
        (AnnotationQuality::High, AnnotationQuality::Low)
    } else {
        (AnnotationQuality::Low, AnnotationQuality::High)
    };

    let field_col = table.require_column(field)?;
    let quality_col = table.require_column(QUALITY_COLUMN)?;
    let pattern = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidInput(format!("Bad keyword '{}': {}", keyword, e)))?;

    // (row, held the opposite label) for every match, read before any write
    let matches: Vec<(usize, bool)> = table
        .rows()
        .enumerate()
        .filter_map(|(i, row)| {
            let values = row.values();
            let text = values[field_col].as_text()?;
            if !pattern.is_match(text) {
                return None;
            }
            Some((i, values[quality_col].as_text() == Some(other.as_str())))
        })
        .collect();

    let mut outcome = KeywordOutcome::default();
    for (row, conflict) in matches {
        let label = if conflict {
            outcome.conflicts.push(row);
            AnnotationQuality::Tbd
        } else {
            outcome.labeled += 1;
            add
        };
        table.set_at(row, quality_col, label.into());
    }

    if !outcome.conflicts.is_empty() {
        warn!(
            keyword,
            field,
            loci = ?conflicting_loci(table, &outcome.conflicts),
            "Keyword conflicts with existing {} label; marked tbd",
            other
        );
    }
    debug!(keyword, field, labeled = outcome.labeled, label = %add, "Applied keyword");

    Ok(outcome)
}

fn conflicting_loci(table: &Table, rows: &[usize]) -> Vec<String> {
    let Some(col) = LOCUS_COLUMNS.iter().find_map(|c| table.column_index(c)) else {
        return rows.iter().map(|r| format!("row {}", r)).collect();
    };
    rows.iter()
        .filter_map(|&r| table.row(r))
        .map(|row| row.values()[col].to_string())
        .collect()
}
