//! Prefixed identifiers for boards, columns, cards and users

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh id: prefix, underscore, lowercase ULID
            pub fn new() -> Self {
                Self(format!("{}_{}", $prefix, ulid::Ulid::new().to_string().to_lowercase()))
            }

            /// Wrap an existing id string without validation
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// `{prefix}_` followed by lowercase ASCII letters and digits
            pub fn is_well_formed(&self) -> bool {
                has_prefixed_form(&self.0, $prefix)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Whether `id` is `{prefix}_` followed by one or more `[0-9a-z]`
pub(crate) fn has_prefixed_form(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|rest| {
            !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        })
}

/// Whether `id` can name a file inside one of the store's directories
pub(crate) fn is_path_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

define_id!(
    /// Board id (`brd_…`)
    BoardId,
    "brd"
);
define_id!(
    /// Column id (`col_…`)
    ColumnId,
    "col"
);
define_id!(
    /// Card id (`itm_…`)
    CardId,
    "itm"
);
define_id!(
    /// Authenticated user id, supplied by the caller's session
    UserId,
    "usr"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_carry_prefix() {
        assert!(BoardId::new().as_str().starts_with("brd_"));
        assert!(ColumnId::new().as_str().starts_with("col_"));
        assert!(CardId::new().as_str().starts_with("itm_"));
    }

    #[test]
    fn test_new_ids_are_lowercase_and_unique() {
        let a = CardId::new();
        let b = CardId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), a.as_str().to_lowercase());
    }

    #[test]
    fn test_well_formed_ids() {
        assert!(CardId::new().is_well_formed());
        assert!(CardId::from_string("itm_local1").is_well_formed());
        assert!(!CardId::from_string("itm_").is_well_formed());
        assert!(!CardId::from_string("col_abc").is_well_formed());
        assert!(!CardId::from_string("itm_Upper").is_well_formed());
        assert!(!CardId::from_string("itm_x/../../boards/brd_1").is_well_formed());
    }

    #[test]
    fn test_path_safety() {
        assert!(is_path_safe("brd_01j0abc"));
        assert!(is_path_safe("a"));
        assert!(!is_path_safe(""));
        assert!(!is_path_safe(".."));
        assert!(!is_path_safe("itm_x/../../boards/brd_1"));
        assert!(!is_path_safe("col_a\\b"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ColumnId::from_string("col_todo");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"col_todo\"");
        let back: ColumnId = serde_json::from_str("\"col_todo\"").unwrap();
        assert_eq!(back, id);
    }
}
