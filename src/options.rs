//! Options for [`clean`](crate::clean).
//!
//! [`CleanOptions`] selects which leaf values count as "empty" and get
//! stripped from records, arrays, maps and sets.
//!
//! ## Examples
//!
//! ```rust
//! use deep_value::{clean, value, CleanOptions};
//!
//! let data = value!({ "a": 1, "b": null, "c": "", "d": undefined });
//!
//! // Strip everything considered empty
//! let cleaned = clean(&data, &CleanOptions::new());
//! assert_eq!(cleaned, value!({ "a": 1 }));
//!
//! // Strip only nulls
//! let options = CleanOptions::none().with_null(true);
//! let cleaned = clean(&data, &options);
//! assert_eq!(cleaned, value!({ "a": 1, "c": "", "d": undefined }));
//! ```

use crate::Value;

/// Which leaf values [`clean`](crate::clean) removes.
///
/// The default strips undefined, null, NaN and the empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanOptions {
    pub undefined: bool,
    pub null: bool,
    pub nan: bool,
    pub empty_string: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            undefined: true,
            null: true,
            nan: true,
            empty_string: true,
        }
    }
}

impl CleanOptions {
    /// Strips undefined, null, NaN and the empty string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deep_value::CleanOptions;
    ///
    /// let options = CleanOptions::new();
    /// assert!(options.undefined && options.null && options.nan && options.empty_string);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strips nothing. `clean` with these options returns a shallow copy.
    #[must_use]
    pub fn none() -> Self {
        CleanOptions {
            undefined: false,
            null: false,
            nan: false,
            empty_string: false,
        }
    }

    #[must_use]
    pub fn with_undefined(mut self, strip: bool) -> Self {
        self.undefined = strip;
        self
    }

    #[must_use]
    pub fn with_null(mut self, strip: bool) -> Self {
        self.null = strip;
        self
    }

    #[must_use]
    pub fn with_nan(mut self, strip: bool) -> Self {
        self.nan = strip;
        self
    }

    #[must_use]
    pub fn with_empty_string(mut self, strip: bool) -> Self {
        self.empty_string = strip;
        self
    }

    /// Returns `true` if no kind of value is stripped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.undefined || self.null || self.nan || self.empty_string)
    }

    /// Returns `true` if `value` is one of the selected empty values.
    ///
    /// Composite values are never stripped, even when empty.
    #[must_use]
    pub fn strips(&self, value: &Value) -> bool {
        match value {
            Value::Undefined => self.undefined,
            Value::Null => self.null,
            Value::Number(n) if n.is_nan() => self.nan,
            Value::String(s) if s.is_empty() => self.empty_string,
            _ => false,
        }
    }
}
