//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`UnitId`] - Validated configuration unit identifier
//! - [`Order`] - Numeric activation priority (lower runs earlier)
//! - [`UnitMetadata`] - Declared order and before/after relations of a unit
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use precedence::core::types::{Order, UnitId};
//!
//! let unit = UnitId::new("com.example.WebConfig").unwrap();
//! assert_eq!(unit.as_str(), "com.example.WebConfig");
//!
//! // Invalid constructions fail at creation time
//! assert!(UnitId::new("").is_err());
//!
//! assert_eq!(Order::default(), Order::LOWEST_PRECEDENCE);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid unit id: {0}")]
    InvalidUnitId(String),
}

/// A validated configuration unit identifier.
///
/// Identifiers are opaque: the sorter only compares them for equality and
/// orders them by their byte representation. The only requirement is that
/// they are non-empty; surfaces with their own constraints (unit list files,
/// declaration file names) check those where ids enter through them.
///
/// # Example
///
/// ```
/// use precedence::core::types::UnitId;
///
/// let a = UnitId::new("Alpha").unwrap();
/// let b = UnitId::new("Bravo").unwrap();
/// assert!(a < b);
///
/// assert!(UnitId::new("Web Config").is_ok());
/// assert!(UnitId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitId(String);

impl UnitId {
    /// Create a new validated unit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidUnitId` if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidUnitId("unit id cannot be empty".into()));
        }

        Ok(())
    }

    /// Get the unit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UnitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for UnitId {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UnitId> for String {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric activation priority of a unit.
///
/// Lower values run earlier. Units that declare no order get
/// [`Order::LOWEST_PRECEDENCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(i32);

impl Order {
    /// Runs before everything else.
    pub const HIGHEST_PRECEDENCE: Order = Order(i32::MIN);

    /// Runs after everything else. The default.
    pub const LOWEST_PRECEDENCE: Order = Order(i32::MAX);

    /// Create an order from its raw value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::LOWEST_PRECEDENCE
    }
}

impl From<i32> for Order {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared ordering metadata of a single unit.
///
/// `before` names units that must run after this one; `after` names units
/// that must run before it. Either set may name units that are not part
/// of a given sort; such references are ignored by the sorter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Numeric priority.
    pub order: Order,
    /// Units this one must precede.
    pub before: BTreeSet<UnitId>,
    /// Units this one must follow.
    pub after: BTreeSet<UnitId>,
}

impl UnitMetadata {
    /// Metadata with the given order and no relations.
    pub fn with_order(order: impl Into<Order>) -> Self {
        Self {
            order: order.into(),
            ..Self::default()
        }
    }

    /// Add a unit this one must precede.
    pub fn before(mut self, unit: UnitId) -> Self {
        self.before.insert(unit);
        self
    }

    /// Add a unit this one must follow.
    pub fn after(mut self, unit: UnitId) -> Self {
        self.after.insert(unit);
        self
    }
}
