//! core::metadata::schema
//!
//! On-disk formats for ordering metadata.
//!
//! # Index
//!
//! A precomputed index is a single TOML document:
//! - Self-describing with `kind` and `schema_version`
//! - One `[units."<id>"]` table per processed unit
//! - Strictly parsed (unknown fields rejected)
//!
//! An empty table still marks the unit as processed: the indexer looked at
//! it and found nothing declared.
//!
//! # Declaration
//!
//! A declaration is the same per-unit table stored on its own, with no
//! envelope.
//!
//! # Example
//!
//! ```
//! use precedence::core::metadata::schema::parse_index;
//!
//! let doc = parse_index(r#"
//! kind = "precedence.index"
//! schema_version = 1
//!
//! [units."com.example.WebConfig"]
//! order = 10
//! after = ["com.example.ServletConfig"]
//! "#).unwrap();
//!
//! assert_eq!(doc.units.len(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Order, UnitId, UnitMetadata};

/// The kind identifier for index documents.
pub const INDEX_KIND: &str = "precedence.index";

/// Current index schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from parsing metadata documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("failed to parse: {0}")]
    ParseError(String),

    #[error("invalid kind '{found}', expected '{}'", INDEX_KIND)]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),
}

/// Ordering metadata as written by hand or by an indexer.
///
/// Unlike [`UnitMetadata`], the order is optional here: an absent order
/// means lowest precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclaredMetadata {
    /// Declared priority, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    /// Units that must run after this one
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub before: BTreeSet<UnitId>,

    /// Units that must run before this one
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub after: BTreeSet<UnitId>,
}

impl From<DeclaredMetadata> for UnitMetadata {
    fn from(declared: DeclaredMetadata) -> Self {
        UnitMetadata {
            order: declared.order.unwrap_or_default(),
            before: declared.before,
            after: declared.after,
        }
    }
}

impl From<UnitMetadata> for DeclaredMetadata {
    fn from(meta: UnitMetadata) -> Self {
        DeclaredMetadata {
            order: (meta.order != Order::default()).then_some(meta.order),
            before: meta.before,
            after: meta.after,
        }
    }
}

/// A precomputed index of unit metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDocument {
    /// Always [`INDEX_KIND`]
    pub kind: String,

    /// Always [`SCHEMA_VERSION`] when written by this crate
    pub schema_version: u32,

    /// Metadata per processed unit
    #[serde(default)]
    pub units: BTreeMap<UnitId, DeclaredMetadata>,
}

impl IndexDocument {
    /// Create a current-version index document.
    pub fn new(units: BTreeMap<UnitId, DeclaredMetadata>) -> Self {
        Self {
            kind: INDEX_KIND.to_string(),
            schema_version: SCHEMA_VERSION,
            units,
        }
    }
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct IndexEnvelope {
    kind: String,
    schema_version: u32,
}

/// Parse an index document with version dispatch.
///
/// # Errors
///
/// Returns an error if:
/// - The TOML is malformed
/// - The `kind` field doesn't match [`INDEX_KIND`]
/// - The `schema_version` is not supported
/// - Any unit id is invalid or an entry has unknown fields
pub fn parse_index(toml: &str) -> Result<IndexDocument, SchemaError> {
    let envelope: IndexEnvelope =
        toml::from_str(toml).map_err(|e| SchemaError::ParseError(e.to_string()))?;

    if envelope.kind != INDEX_KIND {
        return Err(SchemaError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        SCHEMA_VERSION => {
            toml::from_str(toml).map_err(|e| SchemaError::ParseError(e.to_string()))
        }
        other => Err(SchemaError::UnsupportedVersion(other)),
    }
}

/// Parse a single unit declaration.
///
/// An empty document is valid and declares nothing.
pub fn parse_declaration(toml: &str) -> Result<DeclaredMetadata, SchemaError> {
    toml::from_str(toml).map_err(|e| SchemaError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> UnitId {
        UnitId::new(s).unwrap()
    }

    mod index {
        use super::*;

        #[test]
        fn parses_entries() {
            let doc = parse_index(
                r#"
                kind = "precedence.index"
                schema_version = 1

                [units."com.example.Web"]
                order = -10
                before = ["com.example.Jackson"]

                [units."com.example.Empty"]
                "#,
            )
            .unwrap();

            let web = &doc.units[&id("com.example.Web")];
            assert_eq!(web.order, Some(Order::new(-10)));
            assert!(web.before.contains(&id("com.example.Jackson")));
            assert!(web.after.is_empty());

            assert_eq!(doc.units[&id("com.example.Empty")], DeclaredMetadata::default());
        }

        #[test]
        fn rejects_wrong_kind() {
            let err = parse_index("kind = \"other\"\nschema_version = 1\n").unwrap_err();
            assert!(matches!(err, SchemaError::InvalidKind { found } if found == "other"));
        }

        #[test]
        fn rejects_future_version() {
            let err =
                parse_index("kind = \"precedence.index\"\nschema_version = 2\n").unwrap_err();
            assert_eq!(err, SchemaError::UnsupportedVersion(2));
        }

        #[test]
        fn rejects_unknown_fields() {
            let err = parse_index(
                r#"
                kind = "precedence.index"
                schema_version = 1

                [units.a]
                priority = 3
                "#,
            )
            .unwrap_err();
            assert!(matches!(err, SchemaError::ParseError(_)));
        }

        #[test]
        fn rejects_invalid_references() {
            let err = parse_index(
                r#"
                kind = "precedence.index"
                schema_version = 1

                [units.a]
                after = [""]
                "#,
            )
            .unwrap_err();
            assert!(matches!(err, SchemaError::ParseError(_)));
        }

        #[test]
        fn missing_envelope_is_parse_error() {
            let err = parse_index("[units.a]\norder = 1\n").unwrap_err();
            assert!(matches!(err, SchemaError::ParseError(_)));
        }

        #[test]
        fn roundtrip() {
            let mut units = BTreeMap::new();
            units.insert(
                id("com.example.Web"),
                DeclaredMetadata {
                    order: Some(Order::new(3)),
                    before: [id("b")].into_iter().collect(),
                    after: [id("a")].into_iter().collect(),
                },
            );
            units.insert(id("plain"), DeclaredMetadata::default());
            let doc = IndexDocument::new(units);

            let text = toml::to_string_pretty(&doc).unwrap();
            assert_eq!(parse_index(&text).unwrap(), doc);
        }
    }

    mod declaration {
        use super::*;

        #[test]
        fn empty_declares_nothing() {
            let declared = parse_declaration("").unwrap();
            let meta = UnitMetadata::from(declared);
            assert_eq!(meta.order, Order::LOWEST_PRECEDENCE);
            assert!(meta.before.is_empty());
            assert!(meta.after.is_empty());
        }

        #[test]
        fn full_declaration() {
            let declared =
                parse_declaration("order = 7\nbefore = [\"x\"]\nafter = [\"y\", \"z\"]\n")
                    .unwrap();
            let meta = UnitMetadata::from(declared);
            assert_eq!(meta.order, Order::new(7));
            assert_eq!(meta.before.len(), 1);
            assert_eq!(meta.after.len(), 2);
        }

        #[test]
        fn malformed_is_error() {
            assert!(parse_declaration("order = \"high\"").is_err());
            assert!(parse_declaration("order = ").is_err());
        }
    }

    #[test]
    fn default_order_is_omitted_when_converting_back() {
        let declared = DeclaredMetadata::from(UnitMetadata::default());
        assert_eq!(declared.order, None);

        let declared = DeclaredMetadata::from(UnitMetadata::with_order(0));
        assert_eq!(declared.order, Some(Order::new(0)));
    }
}
