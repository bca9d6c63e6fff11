//! Integration tests for yome-report rendering against an on-disk database

use std::path::Path;
use yome_common::db::{
    get_or_create, init_database, Entity, Fields, Gene, Knowledgebase, KnowledgebaseFeature,
    KnowledgebaseGene, Session,
};
use yome_report::{db::connect_readonly, render_report, OutputFormat};

/// Test helper: create a database holding one gene with two features
async fn setup_test_db(db_path: &Path) {
    let pool = init_database(db_path).await.unwrap();
    let mut session = Session::new(pool.clone());

    let (gene, _) =
        get_or_create::<Gene>(&mut session, false, Fields::new().with("locus_id", "b0003"))
            .await
            .unwrap();
    let (kb, _) =
        get_or_create::<Knowledgebase>(&mut session, false, Fields::new().with("name", "EcoCyc"))
            .await
            .unwrap();
    let (kb_gene, _) = get_or_create::<KnowledgebaseGene>(
        &mut session,
        false,
        Fields::new()
            .with("gene_id", gene.id())
            .with("knowledgebase_id", kb.id())
            .with("primary_name", "thrB")
            .with("annotation_quality", "high"),
    )
    .await
    .unwrap();
    let features = [
        ("product", "homoserine kinase"),
        ("pathway", "threonine biosynthesis"),
    ];
    for (feature_type, feature) in features {
        get_or_create::<KnowledgebaseFeature>(
            &mut session,
            false,
            Fields::new()
                .with("knowledgebase_gene_id", kb_gene.id())
                .with("feature_type", feature_type)
                .with("feature", feature),
        )
        .await
        .unwrap();
    }

    session.commit().await.unwrap();
    drop(session);
    pool.close().await;
}

#[tokio::test]
async fn test_render_html_from_readonly_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("yome.db");
    setup_test_db(&db_path).await;

    let pool = connect_readonly(&db_path).await.unwrap();
    let mut session = Session::new(pool);
    let html = render_report(&mut session, "b0003", OutputFormat::Html)
        .await
        .unwrap();

    assert!(html.contains("<table id=\"T_yome\">"));
    assert!(html.contains("rowspan=\"2\">EcoCyc (high)</th>"));
    assert!(html.contains(">homoserine kinase</td>"));
    assert!(html.contains(">threonine biosynthesis</td>"));
}

#[tokio::test]
async fn test_render_json() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("yome.db");
    setup_test_db(&db_path).await;

    let pool = connect_readonly(&db_path).await.unwrap();
    let mut session = Session::new(pool);
    let json = render_report(&mut session, "b0003", OutputFormat::Json)
        .await
        .unwrap();

    let body: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(body["locus_id"], "b0003");
    assert_eq!(body["primary_name"], "thrB");
    assert_eq!(body["features"]["index_names"][0], "knowledgebase_name");
    assert_eq!(body["features"]["index"][0][0], "EcoCyc (high)");
    assert_eq!(body["features"]["rows"][1][0], "threonine biosynthesis");
}

#[tokio::test]
async fn test_unknown_locus_reports_context() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("yome.db");
    setup_test_db(&db_path).await;

    let pool = connect_readonly(&db_path).await.unwrap();
    let mut session = Session::new(pool);
    let err = render_report(&mut session, "b4242", OutputFormat::Html)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("b4242"));
    assert!(matches!(
        err.downcast_ref::<yome_common::Error>(),
        Some(yome_common::Error::EmptyResult(_))
    ));
}
