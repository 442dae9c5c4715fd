//! Model name newtype for archive identifiers.
//!
//! A model name seeds the output filename and, for `tgz` archives, the root
//! directory of every entry. Names must start with an ASCII alphanumeric
//! character followed by any number of ASCII alphanumerics, `_`, `-`, or `.`
//! (the policy `^[A-Za-z0-9][A-Za-z0-9_\-.]*$`).

use super::error::{ArchiveError, Result};
use std::fmt;

/// A validated archive identifier.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::model_name::ModelName;
///
/// let name = ModelName::try_from("resnet-18_v1.0").expect("valid model name");
/// assert_eq!(name.as_str(), "resnet-18_v1.0");
///
/// assert!(ModelName::try_from("-leading-dash").is_err());
/// assert!(ModelName::try_from("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelName(String);

impl ModelName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for ModelName {
    type Error = ArchiveError;

    fn try_from(value: &str) -> Result<Self> {
        validate_model_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ModelName {
    type Error = ArchiveError;

    fn try_from(value: String) -> Result<Self> {
        validate_model_name(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate `value` against the naming policy.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidName`] if the name is empty, starts with a
/// non-alphanumeric character, or contains a character outside the allowed
/// set.
pub fn validate_model_name(value: &str) -> Result<()> {
    let mut chars = value.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(is_allowed_tail_char);
    if valid {
        Ok(())
    } else {
        Err(ArchiveError::InvalidName {
            name: value.to_owned(),
        })
    }
}

fn is_allowed_tail_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}
