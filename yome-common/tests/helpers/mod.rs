//! Shared fixtures for yome-common integration tests

#![allow(dead_code)]

use yome_common::db::{
    get_or_create, Entity, Fields, Gene, Knowledgebase, KnowledgebaseFeature, KnowledgebaseGene,
    Session,
};

/// One knowledgebase's view of a gene
pub struct Entry<'a> {
    pub knowledgebase: &'a str,
    pub primary_name: Option<&'a str>,
    pub quality: Option<&'a str>,
    pub features: &'a [(&'a str, &'a str)],
}

/// Insert a gene with its knowledgebase entries and features (flushed, not committed)
pub async fn seed_gene(session: &mut Session, locus_id: &str, entries: &[Entry<'_>]) -> Gene {
    let (gene, _) = get_or_create::<Gene>(session, false, Fields::new().with("locus_id", locus_id))
        .await
        .unwrap();

    for entry in entries {
        let (kb, _) = get_or_create::<Knowledgebase>(
            session,
            false,
            Fields::new().with("name", entry.knowledgebase),
        )
        .await
        .unwrap();

        let (kb_gene, _) = get_or_create::<KnowledgebaseGene>(
            session,
            false,
            Fields::new()
                .with("gene_id", gene.id())
                .with("knowledgebase_id", kb.id())
                .with("primary_name", entry.primary_name)
                .with("annotation_quality", entry.quality),
        )
        .await
        .unwrap();

        for (feature_type, feature) in entry.features {
            get_or_create::<KnowledgebaseFeature>(
                session,
                false,
                Fields::new()
                    .with("knowledgebase_gene_id", kb_gene.id())
                    .with("feature_type", *feature_type)
                    .with("feature", *feature),
            )
            .await
            .unwrap();
        }
    }

    gene
}

/// Two knowledgebases describing thrL (b0001)
pub async fn seed_thrl(session: &mut Session) -> Gene {
    seed_gene(
        session,
        "b0001",
        &[
            Entry {
                knowledgebase: "EcoCyc",
                primary_name: Some("thrL"),
                quality: Some("high"),
                features: &[
                    ("product", "thr operon leader peptide"),
                    ("product", "leader peptide"),
                    ("location", "cytosol"),
                ],
            },
            Entry {
                knowledgebase: "RefSeq",
                primary_name: Some("thrL"),
                quality: None,
                features: &[("product", "<i>thr</i> operon leader peptide")],
            },
        ],
    )
    .await
}
