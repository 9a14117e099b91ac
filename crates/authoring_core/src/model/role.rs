//! Role assignment model.
//!
//! # Responsibility
//! - Define the closed set of role kinds recognized by publishing.
//! - Hold one explicitly named, ordered assignment list per kind.
//! - Preserve unrecognized kinds locally without exposing them to sync.
//!
//! # Invariants
//! - Assignment ids are non-blank and unique within one kind's list.
//! - `assignment_date` / `requester` are only written by acceptance or sync.
//! - Iteration order over kinds is fixed by `RoleKind::ALL`.

use crate::model::acceptance::Acceptance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Relationship type between a user and a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleKind {
    Author,
    Editor,
    Publisher,
    Translator,
    Illustrator,
    Maintainer,
    Licensor,
}

impl RoleKind {
    /// Every recognized kind, in local iteration order.
    pub const ALL: [RoleKind; 7] = [
        RoleKind::Author,
        RoleKind::Editor,
        RoleKind::Publisher,
        RoleKind::Translator,
        RoleKind::Illustrator,
        RoleKind::Maintainer,
        RoleKind::Licensor,
    ];

    /// Plural metadata field name (`authors`, `editors`, ...).
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Author => "authors",
            Self::Editor => "editors",
            Self::Publisher => "publishers",
            Self::Translator => "translators",
            Self::Illustrator => "illustrators",
            Self::Maintainer => "maintainers",
            Self::Licensor => "licensors",
        }
    }

    /// Capitalized singular name sent to the publishing service.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Editor => "Editor",
            Self::Publisher => "Publisher",
            Self::Translator => "Translator",
            Self::Illustrator => "Illustrator",
            Self::Maintainer => "Maintainer",
            Self::Licensor => "Licensor",
        }
    }

    /// Resolves a plural metadata field name. Unknown names return `None`.
    pub fn from_field_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.field_name() == value)
    }

    /// Resolves a wire role name. Unknown names return `None`.
    pub fn from_wire_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.wire_name() == value)
    }
}

/// One user's assignment to one role kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Assignee user id.
    pub id: String,
    #[serde(default)]
    pub has_accepted: Acceptance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_date: Option<DateTime<Utc>>,
    /// User id of whoever requested (or self-accepted) the assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    /// Opaque profile fields (names, titles) carried through untouched.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl RoleAssignment {
    /// Creates a pending assignment with no provenance.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_accepted: Acceptance::Pending,
            assignment_date: None,
            requester: None,
            profile: Map::new(),
        }
    }

    pub fn with_acceptance(mut self, has_accepted: Acceptance) -> Self {
        self.has_accepted = has_accepted;
        self
    }

    /// Whether provenance has been recorded by a previous pass.
    pub fn has_provenance(&self) -> bool {
        self.assignment_date.is_some()
    }
}

/// Role validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValidationError {
    BlankId { kind: String },
    DuplicateAssignee { kind: String, id: String },
}

impl Display for RoleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId { kind } => write!(f, "blank assignee id in `{kind}`"),
            Self::DuplicateAssignee { kind, id } => {
                write!(f, "assignee `{id}` listed more than once in `{kind}`")
            }
        }
    }
}

impl Error for RoleValidationError {}

/// Typed role containers of a document.
///
/// Recognized kinds live in named fields; anything else lands in `other`
/// and round-trips through serialization without being synchronized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleMetadata {
    #[serde(default)]
    pub authors: Vec<RoleAssignment>,
    #[serde(default)]
    pub editors: Vec<RoleAssignment>,
    #[serde(default)]
    pub publishers: Vec<RoleAssignment>,
    #[serde(default)]
    pub translators: Vec<RoleAssignment>,
    #[serde(default)]
    pub illustrators: Vec<RoleAssignment>,
    #[serde(default)]
    pub maintainers: Vec<RoleAssignment>,
    #[serde(default)]
    pub licensors: Vec<RoleAssignment>,
    /// Unrecognized kinds keyed by their local field name.
    #[serde(flatten)]
    pub other: BTreeMap<String, Vec<RoleAssignment>>,
}

impl RoleMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds typed containers from a kind-keyed map and validates them.
    pub fn from_map(
        map: BTreeMap<String, Vec<RoleAssignment>>,
    ) -> Result<Self, RoleValidationError> {
        let mut metadata = Self::default();
        for (field, assignments) in map {
            match RoleKind::from_field_name(field.as_str()) {
                Some(kind) => *metadata.get_mut(kind) = assignments,
                None => {
                    metadata.other.insert(field, assignments);
                }
            }
        }
        metadata.validate()?;
        Ok(metadata)
    }

    /// Builder-style setter used by construction paths and tests.
    pub fn with(mut self, kind: RoleKind, assignments: Vec<RoleAssignment>) -> Self {
        *self.get_mut(kind) = assignments;
        self
    }

    pub fn get(&self, kind: RoleKind) -> &[RoleAssignment] {
        match kind {
            RoleKind::Author => &self.authors,
            RoleKind::Editor => &self.editors,
            RoleKind::Publisher => &self.publishers,
            RoleKind::Translator => &self.translators,
            RoleKind::Illustrator => &self.illustrators,
            RoleKind::Maintainer => &self.maintainers,
            RoleKind::Licensor => &self.licensors,
        }
    }

    pub fn get_mut(&mut self, kind: RoleKind) -> &mut Vec<RoleAssignment> {
        match kind {
            RoleKind::Author => &mut self.authors,
            RoleKind::Editor => &mut self.editors,
            RoleKind::Publisher => &mut self.publishers,
            RoleKind::Translator => &mut self.translators,
            RoleKind::Illustrator => &mut self.illustrators,
            RoleKind::Maintainer => &mut self.maintainers,
            RoleKind::Licensor => &mut self.licensors,
        }
    }

    /// Recognized assignments in kind order, then list order.
    pub fn iter(&self) -> impl Iterator<Item = (RoleKind, &RoleAssignment)> + '_ {
        RoleKind::ALL.into_iter().flat_map(move |kind| {
            self.get(kind)
                .iter()
                .map(move |assignment| (kind, assignment))
        })
    }

    /// Mutable recognized assignments in kind order, then list order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RoleKind, &mut RoleAssignment)> + '_ {
        let Self {
            authors,
            editors,
            publishers,
            translators,
            illustrators,
            maintainers,
            licensors,
            other: _,
        } = self;
        [
            (RoleKind::Author, authors),
            (RoleKind::Editor, editors),
            (RoleKind::Publisher, publishers),
            (RoleKind::Translator, translators),
            (RoleKind::Illustrator, illustrators),
            (RoleKind::Maintainer, maintainers),
            (RoleKind::Licensor, licensors),
        ]
        .into_iter()
        .flat_map(|(kind, list)| list.iter_mut().map(move |assignment| (kind, assignment)))
    }

    /// Number of recognized assignments.
    pub fn len(&self) -> usize {
        RoleKind::ALL
            .into_iter()
            .map(|kind| self.get(kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks id invariants for recognized and unrecognized kinds alike.
    pub fn validate(&self) -> Result<(), RoleValidationError> {
        for kind in RoleKind::ALL {
            validate_list(kind.field_name(), self.get(kind))?;
        }
        for (field, assignments) in &self.other {
            validate_list(field.as_str(), assignments)?;
        }
        Ok(())
    }
}

fn validate_list(kind: &str, assignments: &[RoleAssignment]) -> Result<(), RoleValidationError> {
    let mut seen = HashSet::new();
    for assignment in assignments {
        if assignment.id.trim().is_empty() {
            return Err(RoleValidationError::BlankId {
                kind: kind.to_string(),
            });
        }
        if !seen.insert(assignment.id.as_str()) {
            return Err(RoleValidationError::DuplicateAssignee {
                kind: kind.to_string(),
                id: assignment.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RoleAssignment, RoleKind, RoleMetadata, RoleValidationError};
    use std::collections::BTreeMap;

    #[test]
    fn wire_name_is_capitalized_singular_of_field_name() {
        for kind in RoleKind::ALL {
            let field = kind.field_name();
            let singular = field.strip_suffix('s').unwrap();
            let mut chars = singular.chars();
            let first = chars.next().unwrap().to_ascii_uppercase();
            let expected = format!("{first}{}", chars.as_str());
            assert_eq!(kind.wire_name(), expected);
            assert_eq!(RoleKind::from_wire_name(kind.wire_name()), Some(kind));
        }
    }

    #[test]
    fn from_map_keeps_unknown_kinds_aside() {
        let mut map = BTreeMap::new();
        map.insert("authors".to_string(), vec![RoleAssignment::new("me")]);
        map.insert("copyeditors".to_string(), vec![RoleAssignment::new("you")]);

        let metadata = RoleMetadata::from_map(map).unwrap();
        assert_eq!(metadata.authors.len(), 1);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.other["copyeditors"][0].id, "you");
    }

    #[test]
    fn from_map_rejects_duplicate_assignee() {
        let mut map = BTreeMap::new();
        map.insert(
            "editors".to_string(),
            vec![RoleAssignment::new("me"), RoleAssignment::new("me")],
        );

        let err = RoleMetadata::from_map(map).unwrap_err();
        assert_eq!(
            err,
            RoleValidationError::DuplicateAssignee {
                kind: "editors".to_string(),
                id: "me".to_string(),
            }
        );
    }

    #[test]
    fn serde_round_trip_preserves_profile_and_unknown_kinds() {
        let raw = r#"{
            "authors": [{"id": "me", "fullname": "Me Myself", "has_accepted": true}],
            "copyeditors": [{"id": "you"}]
        }"#;
        let metadata: RoleMetadata = serde_json::from_str(raw).unwrap();
        assert!(metadata.authors[0].has_accepted.is_accepted());
        assert_eq!(metadata.authors[0].profile["fullname"], "Me Myself");
        assert!(metadata.editors.is_empty());

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["copyeditors"][0]["id"], "you");
        assert_eq!(value["copyeditors"][0]["has_accepted"], serde_json::Value::Null);
        assert_eq!(value["authors"][0]["fullname"], "Me Myself");
    }

    #[test]
    fn iter_mut_visits_kinds_in_fixed_order() {
        let mut metadata = RoleMetadata::new()
            .with(RoleKind::Licensor, vec![RoleAssignment::new("c")])
            .with(RoleKind::Author, vec![RoleAssignment::new("a")])
            .with(RoleKind::Editor, vec![RoleAssignment::new("b")]);
        let order: Vec<_> = metadata
            .iter_mut()
            .map(|(kind, assignment)| (kind, assignment.id.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (RoleKind::Author, "a".to_string()),
                (RoleKind::Editor, "b".to_string()),
                (RoleKind::Licensor, "c".to_string()),
            ]
        );
    }
}
