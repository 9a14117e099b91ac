//! Publish-readiness validation.
//!
//! # Responsibility
//! - Derive violation codes for a document or a binder tree.
//! - Resolve binder children through the content store, draft by default.
//!
//! # Invariants
//! - Output order is `RolesPending`, `RolesRejected`; `NoContent` is only
//!   reported alone, when no role code applies at any level.
//! - Only the validated item's own body counts toward `NoContent`.
//! - Traversal uses an explicit worklist; a reference back to one of its
//!   own ancestors is a fatal `CyclicTree` error.

use crate::model::content::{ContentId, ContentRef, ContentRefError, Document, MediaType, TreeNode};
use crate::repo::content_repo::{ContentStore, RepoError};
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Violation code gating publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    NoContent,
    RolesPending,
    RolesRejected,
}

impl ValidationCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoContent => "NO_CONTENT",
            Self::RolesPending => "ROLES_PENDING",
            Self::RolesRejected => "ROLES_REJECTED",
        }
    }
}

impl Display for ValidationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural or contract failures; distinct from violation codes.
#[derive(Debug)]
pub enum ValidationError {
    /// Input is neither a simple document nor a binder.
    UnsupportedContent { id: ContentId, media_type: String },
    /// A tree reference node carries no id.
    MissingReference { parent: ContentId },
    InvalidReference(ContentRefError),
    /// A referenced child does not exist in the store.
    ContentNotFound(ContentRef),
    /// A child references one of its own ancestors.
    CyclicTree(ContentId),
    Store(RepoError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedContent { id, media_type } => {
                write!(f, "cannot validate {id}: unsupported media type `{media_type}`")
            }
            Self::MissingReference { parent } => {
                write!(f, "tree of {parent} has a reference without id")
            }
            Self::InvalidReference(err) => write!(f, "{err}"),
            Self::ContentNotFound(content_ref) => write!(f, "content not found: {content_ref}"),
            Self::CyclicTree(id) => write!(f, "binder tree cycles back to {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReference(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ValidationError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<ContentRefError> for ValidationError {
    fn from(value: ContentRefError) -> Self {
        Self::InvalidReference(value)
    }
}

#[derive(Debug, Default)]
struct RoleFlags {
    pending: bool,
    rejected: bool,
}

impl RoleFlags {
    fn absorb(&mut self, document: &Document) {
        let role_states = document
            .metadata
            .iter()
            .map(|(_, assignment)| assignment.has_accepted);
        let licensor_states = document
            .licensor_acceptance
            .iter()
            .map(|entry| entry.has_accepted);
        for state in role_states.chain(licensor_states) {
            self.pending |= state.is_pending();
            self.rejected |= state.is_rejected();
        }
    }
}

/// Tree node awaiting evaluation, with the binder ids above it.
struct Pending {
    node: TreeNode,
    ancestors: Rc<Vec<ContentId>>,
}

/// Publish validator facade.
pub struct PublishValidator<S: ContentStore> {
    store: S,
}

impl<S: ContentStore> PublishValidator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns violation codes for `content`; empty when publishable.
    pub fn validate_for_publish(&self, content: &Document) -> Result<Vec<ValidationCode>, ValidationError> {
        ensure_supported(content)?;

        let no_content = content.content.is_empty();
        let mut flags = RoleFlags::default();
        flags.absorb(content);

        let mut visited_children = 0usize;
        if content.is_binder() {
            visited_children = self.fold_tree(content, &mut flags)?;
        }

        let mut codes = Vec::new();
        if flags.pending {
            codes.push(ValidationCode::RolesPending);
        }
        if flags.rejected {
            codes.push(ValidationCode::RolesRejected);
        }
        if codes.is_empty() && no_content {
            codes.push(ValidationCode::NoContent);
        }

        info!(
            "event=publish_validate module=service status=ok content_id={} binder={} children={visited_children} codes={}",
            content.id,
            content.is_binder(),
            codes
                .iter()
                .map(|code| code.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(codes)
    }

    /// Folds child role states into `flags`; returns children evaluated.
    fn fold_tree(&self, binder: &Document, flags: &mut RoleFlags) -> Result<usize, ValidationError> {
        let mut worklist: Vec<Pending> = Vec::new();
        push_children(&mut worklist, binder, Rc::new(vec![binder.id]));

        let mut evaluated: HashSet<ContentRef> = HashSet::new();
        while let Some(Pending { node, ancestors }) = worklist.pop() {
            if let Some(children) = node.contents {
                for child in children.into_iter().rev() {
                    worklist.push(Pending {
                        node: child,
                        ancestors: Rc::clone(&ancestors),
                    });
                }
                continue;
            }

            let parent = ancestors.last().copied().unwrap_or(binder.id);
            let raw_ref = node
                .id
                .as_deref()
                .ok_or(ValidationError::MissingReference { parent })?;
            let content_ref = ContentRef::parse(raw_ref)?;
            if ancestors.contains(&content_ref.id) {
                return Err(ValidationError::CyclicTree(content_ref.id));
            }
            if evaluated.contains(&content_ref) {
                continue;
            }

            let child = self
                .store
                .get_content(content_ref.id, &content_ref.version)?
                .ok_or_else(|| ValidationError::ContentNotFound(content_ref.clone()))?;
            ensure_supported(&child)?;
            flags.absorb(&child);

            if child.is_binder() {
                let mut path = Vec::with_capacity(ancestors.len() + 1);
                path.extend(ancestors.iter().copied());
                path.push(child.id);
                push_children(&mut worklist, &child, Rc::new(path));
            }
            evaluated.insert(content_ref);
        }
        Ok(evaluated.len())
    }
}

fn push_children(worklist: &mut Vec<Pending>, binder: &Document, ancestors: Rc<Vec<ContentId>>) {
    let Some(tree) = &binder.tree else {
        return;
    };
    for node in tree.contents.iter().rev() {
        worklist.push(Pending {
            node: node.clone(),
            ancestors: Rc::clone(&ancestors),
        });
    }
}

fn ensure_supported(content: &Document) -> Result<(), ValidationError> {
    match &content.media_type {
        MediaType::Document | MediaType::Binder => Ok(()),
        MediaType::Unrecognized(media_type) => Err(ValidationError::UnsupportedContent {
            id: content.id,
            media_type: media_type.clone(),
        }),
    }
}
