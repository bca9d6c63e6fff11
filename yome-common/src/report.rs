//! Per-gene knowledgebase report
//!
//! Collects every knowledgebase feature recorded for one locus tag and
//! renders them grouped by knowledgebase and feature type.

use crate::annotation::QUALITY_COLUMN;
use crate::db::session::Session;
use crate::db::value::Value;
use crate::render::{HtmlDocument, Styler};
use crate::table::{to_table, IndexedTable, Query};
use crate::{Error, Result};
use tracing::info;

const REPORT_SQL: &str = r#"
    SELECT genes.locus_id AS locus_id,
           knowledgebase_genes.primary_name AS primary_name,
           knowledgebase_genes.annotation_quality AS annotation_quality,
           knowledgebases.name AS knowledgebase_name,
           knowledgebase_features.feature_type AS feature_type,
           knowledgebase_features.feature AS feature
    FROM genes
    JOIN knowledgebase_genes ON knowledgebase_genes.gene_id = genes.id
    JOIN knowledgebases ON knowledgebases.id = knowledgebase_genes.knowledgebase_id
    JOIN knowledgebase_features
        ON knowledgebase_features.knowledgebase_gene_id = knowledgebase_genes.id
    WHERE genes.locus_id = ?
    ORDER BY knowledgebase_features.id
"#;

/// Index levels of the rendered report
pub const REPORT_INDEX: &[&str] = &["knowledgebase_name", "feature_type"];

/// Label shown for knowledgebase entries without a quality label
const UNSET_QUALITY: &str = "unset";

/// Features of one gene, indexed by `(knowledgebase (quality), feature_type)`
#[derive(Debug, Clone)]
pub struct GeneReport {
    pub locus_id: String,
    /// Primary name from the first matching knowledgebase entry
    pub primary_name: Option<String>,
    pub features: IndexedTable,
}

impl GeneReport {
    /// Render as a left-aligned HTML table
    pub fn render(&self) -> HtmlDocument {
        Styler::new(&self.features)
            .set_property("text-align", "left")
            .render()
    }
}

/// Query and shape the report for `locus_tag`.
///
/// Fails with [`Error::EmptyResult`] when the locus has no knowledgebase
/// features. Entries without a quality label show as `<name> (unset)`
/// rather than a bare null marker.
pub async fn build_report(session: &mut Session, locus_tag: &str) -> Result<GeneReport> {
    let query = Query::new(REPORT_SQL).bind(locus_tag);
    let conn = session.connection().await?;
    let mut table = to_table(&mut *conn, &query, None).await?;

    let Some(first) = table.row(0) else {
        return Err(Error::EmptyResult(locus_tag.to_string()));
    };
    let locus_id = first
        .get("locus_id")
        .map(ToString::to_string)
        .unwrap_or_default();
    let primary_name = first
        .get("primary_name")
        .and_then(Value::as_text)
        .map(str::to_string);

    info!(
        locus_id = %locus_id,
        primary_name = primary_name.as_deref().unwrap_or(""),
        rows = table.len(),
        "Building gene report"
    );

    table.update_column("knowledgebase_name", |row| {
        let name = row
            .get("knowledgebase_name")
            .map(ToString::to_string)
            .unwrap_or_default();
        let quality = match row.get(QUALITY_COLUMN) {
            None | Some(Value::Null) => UNSET_QUALITY.to_string(),
            Some(value) => value.to_string(),
        };
        Value::from(format!("{} ({})", name, quality))
    })?;
    table.drop_columns(&["locus_id", "primary_name", QUALITY_COLUMN])?;
    let features = table.set_index(REPORT_INDEX)?;

    Ok(GeneReport {
        locus_id,
        primary_name,
        features,
    })
}

/// Render the report for `locus_tag` as an embeddable HTML document
pub async fn report(session: &mut Session, locus_tag: &str) -> Result<HtmlDocument> {
    Ok(build_report(session, locus_tag).await?.render())
}
