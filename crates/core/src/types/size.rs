//! Product size tag type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Size`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The input string is empty (or only whitespace).
    #[error("size cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("size must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace inside the tag.
    #[error("size cannot contain whitespace")]
    ContainsWhitespace,
}

/// A garment size tag such as `P`, `M`, `G` or `GG`.
///
/// Parsing trims surrounding whitespace and upper-cases the tag, so `" m "`
/// and `"M"` compare equal. Deserialization goes through the same rules.
///
/// ## Examples
///
/// ```
/// use streetstyle_core::Size;
///
/// assert_eq!(Size::parse("gg").unwrap().as_str(), "GG");
/// assert!(Size::parse("").is_err());
/// assert!(Size::parse("extra large").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Size(String);

impl Size {
    /// Maximum length of a size tag.
    pub const MAX_LENGTH: usize = 8;

    /// Parse a `Size` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Size::MAX_LENGTH`], or contains inner whitespace.
    pub fn parse(s: &str) -> Result<Self, SizeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SizeError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(SizeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(SizeError::ContainsWhitespace);
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the size tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Size {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Size {
    type Error = SizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.0
    }
}

impl AsRef<str> for Size {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
