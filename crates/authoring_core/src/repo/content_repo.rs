//! Content store contract and SQLite implementation.

use crate::db::DbError;
use crate::model::content::{ContentId, ContentVersion, Document};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Content store errors.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted content: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lookup-by-id collaborator.
pub trait ContentStore {
    fn get_content(&self, id: ContentId, version: &ContentVersion) -> RepoResult<Option<Document>>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn get_content(&self, id: ContentId, version: &ContentVersion) -> RepoResult<Option<Document>> {
        (**self).get_content(id, version)
    }
}

/// SQLite-backed content store; one row per `(id, version)`.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts or replaces one version of a content item.
    pub fn put_content(&self, document: &Document, version: &ContentVersion) -> RepoResult<()> {
        let encoded = serde_json::to_string(document)
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        self.conn.execute(
            "INSERT INTO contents (id, version, media_type, title, document)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id, version) DO UPDATE SET
                media_type = excluded.media_type,
                title = excluded.title,
                document = excluded.document;",
            params![
                document.id.to_string(),
                version.as_str(),
                document.media_type.as_str(),
                document.title.as_str(),
                encoded,
            ],
        )?;
        debug!(
            "event=content_put module=repo status=ok content_id={} version={}",
            document.id, version
        );
        Ok(())
    }

    /// Stores `document` as the working draft.
    pub fn put_draft(&self, document: &Document) -> RepoResult<()> {
        self.put_content(document, &ContentVersion::Draft)
    }

    /// Lists stored versions of one item in lexical order.
    pub fn list_versions(&self, id: ContentId) -> RepoResult<Vec<ContentVersion>> {
        let mut stmt = self
            .conn
            .prepare("SELECT version FROM contents WHERE id = ?1 ORDER BY version ASC;")?;
        let rows = stmt.query_map([id.to_string()], |row| row.get::<_, String>(0))?;
        let mut versions = Vec::new();
        for row in rows {
            versions.push(version_from_db(row?));
        }
        Ok(versions)
    }
}

impl ContentStore for SqliteContentRepository<'_> {
    fn get_content(&self, id: ContentId, version: &ContentVersion) -> RepoResult<Option<Document>> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM contents WHERE id = ?1 AND version = ?2;",
                params![id.to_string(), version.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(encoded) = encoded else {
            return Ok(None);
        };
        let document: Document = serde_json::from_str(&encoded)
            .map_err(|err| RepoError::InvalidData(format!("{id}@{version}: {err}")))?;
        if document.id != id {
            return Err(RepoError::InvalidData(format!(
                "row {id}@{version} holds document {}",
                document.id
            )));
        }
        Ok(Some(document))
    }
}

fn version_from_db(value: String) -> ContentVersion {
    if value == ContentVersion::Draft.as_str() {
        ContentVersion::Draft
    } else {
        ContentVersion::Published(value)
    }
}
