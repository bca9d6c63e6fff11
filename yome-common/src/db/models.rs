//! Database models

use crate::annotation::AnnotationQuality;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

/// A persisted record type with a statically known field set
///
/// `FIELDS` lists the columns a caller may set or filter on; the `id`
/// primary key is assigned by the database and is not part of it.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Table holding records of this type
    const TABLE: &'static str;
    /// Settable / filterable columns
    const FIELDS: &'static [&'static str];

    /// Primary key of this record
    fn id(&self) -> i64;
}

/// A gene, identified by its locus tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Gene {
    pub id: i64,
    pub locus_id: String,
}

impl Entity for Gene {
    const TABLE: &'static str = "genes";
    const FIELDS: &'static [&'static str] = &["locus_id"];

    fn id(&self) -> i64 {
        self.id
    }
}

/// An annotation source (EcoCyc, RefSeq, UniProt, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Knowledgebase {
    pub id: i64,
    pub name: String,
}

impl Entity for Knowledgebase {
    const TABLE: &'static str = "knowledgebases";
    const FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> i64 {
        self.id
    }
}

/// One knowledgebase's entry for a gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KnowledgebaseGene {
    pub id: i64,
    pub gene_id: i64,
    pub knowledgebase_id: i64,
    pub primary_name: Option<String>,
    pub annotation_quality: Option<String>,
}

impl KnowledgebaseGene {
    /// Parsed annotation quality; unknown labels read as unset
    pub fn quality(&self) -> Option<AnnotationQuality> {
        self.annotation_quality
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

impl Entity for KnowledgebaseGene {
    const TABLE: &'static str = "knowledgebase_genes";
    const FIELDS: &'static [&'static str] = &[
        "gene_id",
        "knowledgebase_id",
        "primary_name",
        "annotation_quality",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

/// A typed feature (function, pathway, location, ...) of a knowledgebase gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KnowledgebaseFeature {
    pub id: i64,
    pub knowledgebase_gene_id: i64,
    pub feature_type: String,
    pub feature: Option<String>,
}

impl Entity for KnowledgebaseFeature {
    const TABLE: &'static str = "knowledgebase_features";
    const FIELDS: &'static [&'static str] = &["knowledgebase_gene_id", "feature_type", "feature"];

    fn id(&self) -> i64 {
        self.id
    }
}
