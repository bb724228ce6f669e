//! # Entity Abstraction
//!
//! The list and table machinery never looks inside a record. All it needs is
//! an identifier (to select, patch and delete the right row) and a display
//! name (for confirmation prompts and accessible labels).
//!
//! ## Identifiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend record              EntityId           Used for                │
//! │  ──────────────              ────────           ────────                │
//! │  { "id": 42, ... }      ──►  Num(42)       ──►  selection set          │
//! │  { "id": "T-0007" }     ──►  Text("T-0007")     cache patching          │
//! │  { "name": "..." }      ──►  None          ──►  row skipped (malformed) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::render::RenderContext;

/// Externally unique identifier of an entity: numeric or string.
///
/// Serialized untagged, so it is a plain JSON number or string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Text(String),
}

impl EntityId {
    /// Parses a path or CLI argument: digits become `Num`, anything else `Text`.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(EntityId::Num)
            .unwrap_or_else(|_| EntityId::Text(raw.trim().to_string()))
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Num(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

/// A business record managed by one CRUD module.
///
/// ## Implementing
/// ```rust
/// use workforce_core::{Entity, EntityId, RenderContext};
///
/// #[derive(Clone)]
/// struct Shift { id: Option<i64>, label: String }
///
/// impl Entity for Shift {
///     const KIND: &'static str = "Shift";
///
///     fn id(&self) -> Option<EntityId> {
///         self.id.map(EntityId::Num)
///     }
///
///     fn display_name(&self, _ctx: &RenderContext) -> String {
///         self.label.clone()
///     }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human label of the entity type ("Region", "Holiday", ...).
    const KIND: &'static str;

    /// The identifier, or `None` for a malformed record.
    fn id(&self) -> Option<EntityId>;

    /// Name shown to the user in the given locale.
    fn display_name(&self, ctx: &RenderContext) -> String;

    /// Whether this record matches a free-text search.
    ///
    /// Default: case-insensitive substring match against the display name in
    /// both writing directions.
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [RenderContext::ltr("en"), RenderContext::rtl("ar")]
            .iter()
            .any(|ctx| self.display_name(ctx).to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Named(Option<i64>, &'static str);

    impl Entity for Named {
        const KIND: &'static str = "Named";

        fn id(&self) -> Option<EntityId> {
            self.0.map(EntityId::Num)
        }

        fn display_name(&self, _ctx: &RenderContext) -> String {
            self.1.to_string()
        }
    }

    #[test]
    fn test_entity_id_parse() {
        assert_eq!(EntityId::parse("42"), EntityId::Num(42));
        assert_eq!(EntityId::parse(" T-7 "), EntityId::Text("T-7".to_string()));
    }

    #[test]
    fn test_entity_id_json_is_untagged() {
        assert_eq!(serde_json::to_string(&EntityId::Num(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&EntityId::from("abc")).unwrap(),
            "\"abc\""
        );
        let parsed: EntityId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, EntityId::Num(7));
    }

    #[test]
    fn test_default_search_match() {
        let item = Named(Some(1), "Eastern Province");
        assert!(item.matches_search("eastern"));
        assert!(item.matches_search("  "));
        assert!(!item.matches_search("west"));
    }
}
