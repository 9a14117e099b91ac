mod common;

use authoring_core::db::migrations::{apply_migrations, latest_version};
use authoring_core::db::{open_db, open_db_in_memory, DbError};
use authoring_core::{
    Acceptance, ContentStore, ContentVersion, Document, RepoError, RoleKind,
    SqliteContentRepository, Tree, TreeNode,
};
use common::{fixed_now, pending};
use rusqlite::Connection;

#[test]
fn stored_draft_reads_back_with_roles_and_provenance() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::new(&conn);
    let mut document = Document::new("Round trip");
    let mut authors = pending(&["me", "you"]);
    authors[0].has_accepted = Acceptance::Accepted;
    authors[0].assignment_date = Some(fixed_now());
    authors[0].requester = Some("me".to_string());
    authors[1]
        .profile
        .insert("fullname".to_string(), serde_json::json!("You Person"));
    document.metadata = document.metadata.with(RoleKind::Author, authors);

    repo.put_draft(&document).unwrap();
    let loaded = repo
        .get_content(document.id, &ContentVersion::Draft)
        .unwrap()
        .unwrap();

    assert_eq!(loaded, document);
}

#[test]
fn versions_are_stored_side_by_side() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::new(&conn);
    let mut document = Document::binder(
        "Book",
        Tree::new(vec![TreeNode::subcollection("Unit", Vec::new())]),
    );
    repo.put_content(&document, &ContentVersion::Published("1.1".to_string()))
        .unwrap();
    document.title = "Book, revised".to_string();
    repo.put_draft(&document).unwrap();
    repo.put_draft(&document).unwrap();

    assert_eq!(
        repo.list_versions(document.id).unwrap(),
        vec![
            ContentVersion::Published("1.1".to_string()),
            ContentVersion::Draft
        ]
    );
    let published = repo
        .get_content(document.id, &ContentVersion::Published("1.1".to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(published.title, "Book");
    assert!(published.is_binder());
}

#[test]
fn unknown_content_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::new(&conn);
    let document = Document::new("Unsaved");

    assert!(repo
        .get_content(document.id, &ContentVersion::Draft)
        .unwrap()
        .is_none());
    assert!(repo.list_versions(document.id).unwrap().is_empty());
}

#[test]
fn corrupt_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let document = Document::new("Corrupt");
    conn.execute(
        "INSERT INTO contents (id, version, media_type, title, document)
         VALUES (?1, 'draft', 'application/vnd.org.cnx.module', 'Corrupt', '{broken');",
        [document.id.to_string()],
    )
    .unwrap();
    let repo = SqliteContentRepository::new(&conn);

    assert!(matches!(
        repo.get_content(document.id, &ContentVersion::Draft),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("authoring.db");
    let document = Document::new("Persistent");

    {
        let conn = open_db(&path).unwrap();
        SqliteContentRepository::new(&conn)
            .put_draft(&document)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let loaded = SqliteContentRepository::new(&conn)
        .get_content(document.id, &ContentVersion::Draft)
        .unwrap();
    assert_eq!(loaded, Some(document));
}

#[test]
fn fresh_connection_migrates_once_then_accepts_documents() {
    let mut conn = Connection::open_in_memory().unwrap();

    assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version() as usize);
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);

    let user_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(user_version, latest_version());

    let document = Document::new("After migration");
    let repo = SqliteContentRepository::new(&conn);
    repo.put_draft(&document).unwrap();
    let media_type: String = conn
        .query_row(
            "SELECT media_type FROM contents WHERE id = ?1 AND version = 'draft';",
            [document.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(media_type, "application/vnd.org.cnx.module");
}

#[test]
fn store_written_by_newer_binary_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.db");
    let future = latest_version() + 1;
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", future)
        .unwrap();

    let err = open_db(&path).unwrap_err();

    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version, latest_supported }
            if db_version == future && latest_supported == latest_version()
    ));
    assert_eq!(
        err.to_string(),
        format!(
            "content store schema {future} is newer than supported {}",
            latest_version()
        )
    );
}
