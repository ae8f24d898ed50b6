//! Error types.
//!
//! The deep traversals never fail. Errors only come from the serde bridges
//! ([`to_value`](crate::to_value), [`from_value`](crate::from_value) and
//! `Serialize for Value`) and from typed extraction via `TryFrom<Value>`.
//!
//! ## Examples
//!
//! ```rust
//! use deep_value::{from_value, value, Error};
//!
//! let node = value!({ "a": 1 });
//! node.set_field("self", node.clone());
//!
//! let result: Result<std::collections::HashMap<String, i64>, Error> = from_value(&node);
//! assert!(matches!(result, Err(Error::Circular { .. })));
//! ```

use crate::shared::NodeId;
use std::fmt;
use thiserror::Error;

/// Everything that can go wrong converting between value graphs and Rust data.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A reference cycle was found where a tree was required
    #[error("converting circular structure: node {node} refers back to itself")]
    Circular { node: NodeId },

    /// A value of the wrong kind was found
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A Rust type with no value-graph representation
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a cycle error naming the node that was re-entered.
    pub fn circular(node: NodeId) -> Self {
        Error::Circular { node }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::Error;
    ///
    /// let err = Error::type_mismatch("integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
