//! Integration tests for create / get-or-create over a session

use yome_common::db::{
    create, get_or_create, init_database, init_in_memory, Fields, Gene, Knowledgebase,
    KnowledgebaseGene, Session,
};
use yome_common::{AnnotationQuality, Error};

#[tokio::test]
async fn test_get_or_create_creates_then_finds() {
    let pool = init_in_memory().await.unwrap();
    let mut session = Session::new(pool);
    let fields = Fields::new().with("locus_id", "b0002");

    let (created, found) = get_or_create::<Gene>(&mut session, false, fields.clone())
        .await
        .unwrap();
    assert!(!found);
    assert_eq!(created.locus_id, "b0002");

    let (existing, found) = get_or_create::<Gene>(&mut session, false, fields)
        .await
        .unwrap();
    assert!(found);
    assert_eq!(existing, created);
}

#[tokio::test]
async fn test_get_or_create_matches_every_field() {
    let pool = init_in_memory().await.unwrap();
    let mut session = Session::new(pool);

    let gene = create::<Gene>(&mut session, false, Fields::new().with("locus_id", "b0003"))
        .await
        .unwrap();
    let kb = create::<Knowledgebase>(&mut session, false, Fields::new().with("name", "EcoCyc"))
        .await
        .unwrap();

    let base = Fields::new()
        .with("gene_id", gene.id)
        .with("knowledgebase_id", kb.id);

    let (unset, found) = get_or_create::<KnowledgebaseGene>(
        &mut session,
        false,
        base.clone().with("annotation_quality", None::<String>),
    )
    .await
    .unwrap();
    assert!(!found);
    assert_eq!(unset.quality(), None);

    // Null filter values match NULL columns
    let (again, found) = get_or_create::<KnowledgebaseGene>(
        &mut session,
        false,
        base.clone().with("annotation_quality", None::<String>),
    )
    .await
    .unwrap();
    assert!(found);
    assert_eq!(again.id, unset.id);

    // A differing field creates a separate row
    let (high, found) = get_or_create::<KnowledgebaseGene>(
        &mut session,
        false,
        base.with("annotation_quality", "high"),
    )
    .await
    .unwrap();
    assert!(!found);
    assert_ne!(high.id, unset.id);
    assert_eq!(high.quality(), Some(AnnotationQuality::High));
}

#[tokio::test]
async fn test_unknown_field_rejected() {
    let pool = init_in_memory().await.unwrap();
    let mut session = Session::new(pool);

    let err = get_or_create::<Gene>(&mut session, false, Fields::new().with("gene_name", "thrL"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(session.pending(), 0);
}

#[tokio::test]
async fn test_constraint_violation_propagates() {
    let pool = init_in_memory().await.unwrap();
    let mut session = Session::new(pool);
    let fields = Fields::new().with("locus_id", "b0004");

    create::<Gene>(&mut session, false, fields.clone()).await.unwrap();
    let err = create::<Gene>(&mut session, false, fields).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_flush_is_private_until_commit() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("yome.db")).await.unwrap();
    let filter = Fields::new().with("locus_id", "b0005");

    let mut writer = Session::new(pool.clone());
    let mut reader = Session::new(pool);

    create::<Gene>(&mut writer, false, filter.clone()).await.unwrap();
    assert!(writer.in_transaction());

    assert!(reader.find_first::<Gene>(&filter).await.unwrap().is_none());
    reader.rollback().await.unwrap();

    writer.commit().await.unwrap();
    assert!(!writer.in_transaction());

    let seen = reader.find_first::<Gene>(&filter).await.unwrap();
    assert_eq!(seen.map(|g| g.locus_id), Some("b0005".to_string()));
}

#[tokio::test]
async fn test_create_with_commit_persists() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("yome.db");
    let filter = Fields::new().with("name", "UniProt");

    {
        let pool = init_database(&db_path).await.unwrap();
        let mut session = Session::new(pool.clone());
        create::<Knowledgebase>(&mut session, true, filter.clone())
            .await
            .unwrap();
        drop(session);
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let mut session = Session::new(pool);
    let (kb, found) = get_or_create::<Knowledgebase>(&mut session, false, filter)
        .await
        .unwrap();
    assert!(found);
    assert_eq!(kb.name, "UniProt");
}

#[tokio::test]
async fn test_uncommitted_rows_roll_back_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("yome.db")).await.unwrap();
    let filter = Fields::new().with("locus_id", "b0006");

    {
        let mut session = Session::new(pool.clone());
        create::<Gene>(&mut session, false, filter.clone()).await.unwrap();
    }

    let mut session = Session::new(pool);
    assert!(session.find_first::<Gene>(&filter).await.unwrap().is_none());
}
