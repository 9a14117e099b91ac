//! Content item model (documents and binders).
//!
//! # Responsibility
//! - Define the authoring-side record synchronized with publishing.
//! - Parse tree child references (`<uuid>` or `<uuid>@<version>`).
//!
//! # Invariants
//! - `id` is stable across drafts and published versions.
//! - Only binders carry a meaningful `tree`; documents ignore it.
//! - `licensor_acceptance` ids are unique.

use crate::model::acceptance::Acceptance;
use crate::model::role::RoleMetadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier shared by every version of one content item.
pub type ContentId = Uuid;

/// Media type string of a simple document.
pub const DOCUMENT_MEDIATYPE: &str = "application/vnd.org.cnx.module";
/// Media type string of a composite binder.
pub const BINDER_MEDIATYPE: &str = "application/vnd.org.cnx.collection";
/// License applied when a caller provides none.
pub const DEFAULT_LICENSE_URL: &str = "http://creativecommons.org/licenses/by/4.0/";

const DRAFT_VERSION: &str = "draft";

static CONTENT_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<id>[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})(?:@(?P<version>[^@\s]+))?$",
    )
    .expect("valid content ref regex")
});

/// Kind of content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    #[default]
    Document,
    Binder,
    /// Anything else; rejected by publish validation.
    Unrecognized(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => DOCUMENT_MEDIATYPE,
            Self::Binder => BINDER_MEDIATYPE,
            Self::Unrecognized(value) => value.as_str(),
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            DOCUMENT_MEDIATYPE => Self::Document,
            BINDER_MEDIATYPE => Self::Binder,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

/// License attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub url: String,
}

impl Default for License {
    fn default() -> Self {
        Self {
            url: DEFAULT_LICENSE_URL.to_string(),
        }
    }
}

/// One licensor's response to the content license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensorAcceptance {
    pub id: String,
    #[serde(default)]
    pub has_accepted: Acceptance,
}

impl LicensorAcceptance {
    pub fn new(id: impl Into<String>, has_accepted: Acceptance) -> Self {
        Self {
            id: id.into(),
            has_accepted,
        }
    }
}

/// Binder table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub contents: Vec<TreeNode>,
}

impl Tree {
    pub fn new(contents: Vec<TreeNode>) -> Self {
        Self {
            id: None,
            title: None,
            contents,
        }
    }
}

/// Entry in a binder tree.
///
/// A node with `contents` is a subcollection and only groups its
/// children; a node without is a reference to another content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Reference node pointing at the draft of `id`.
    pub fn reference(id: ContentId) -> Self {
        Self {
            id: Some(format!("{id}@{DRAFT_VERSION}")),
            title: None,
            contents: None,
        }
    }

    pub fn subcollection(title: impl Into<String>, contents: Vec<TreeNode>) -> Self {
        Self {
            id: Some("subcol".to_string()),
            title: Some(title.into()),
            contents: Some(contents),
        }
    }

    pub fn is_subcollection(&self) -> bool {
        self.contents.is_some()
    }
}

/// Version selector for a content lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentVersion {
    Draft,
    Published(String),
}

impl ContentVersion {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => DRAFT_VERSION,
            Self::Published(version) => version.as_str(),
        }
    }
}

impl Display for ContentVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed child reference from a binder tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef {
    pub id: ContentId,
    pub version: ContentVersion,
}

/// Child reference parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRefError(pub String);

impl Display for ContentRefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid content reference: `{}`", self.0)
    }
}

impl Error for ContentRefError {}

impl ContentRef {
    /// Parses `<uuid>` or `<uuid>@<version>`. Missing or `draft` version
    /// selects the draft.
    pub fn parse(value: &str) -> Result<Self, ContentRefError> {
        let trimmed = value.trim();
        let captures = CONTENT_REF_RE
            .captures(trimmed)
            .ok_or_else(|| ContentRefError(value.to_string()))?;
        let id = Uuid::parse_str(&captures["id"]).map_err(|_| ContentRefError(value.to_string()))?;
        let version = match captures.name("version").map(|m| m.as_str()) {
            None | Some(DRAFT_VERSION) => ContentVersion::Draft,
            Some(version) => ContentVersion::Published(version.to_string()),
        };
        Ok(Self { id, version })
    }
}

impl Display for ContentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// Authoring-side content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: ContentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media_type: MediaType,
    /// Role containers keyed by kind.
    #[serde(default)]
    pub metadata: RoleMetadata,
    #[serde(default)]
    pub licensor_acceptance: Vec<LicensorAcceptance>,
    /// Body markup; may be empty while drafting.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub license: License,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Tree>,
}

impl Document {
    /// Creates an empty simple document with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an empty simple document with a caller-provided id.
    pub fn with_id(id: ContentId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            media_type: MediaType::Document,
            metadata: RoleMetadata::default(),
            licensor_acceptance: Vec::new(),
            content: String::new(),
            license: License::default(),
            tree: None,
        }
    }

    /// Creates an empty binder over `tree`.
    pub fn binder(title: impl Into<String>, tree: Tree) -> Self {
        let mut binder = Self::new(title);
        binder.media_type = MediaType::Binder;
        binder.tree = Some(tree);
        binder
    }

    pub fn is_binder(&self) -> bool {
        self.media_type == MediaType::Binder
    }
}
