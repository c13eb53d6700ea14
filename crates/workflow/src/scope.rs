//! Role-based row scoping.
//!
//! Managers read every row; agents read only their own. Listings apply the
//! scope as a user-id predicate rather than branching into separate queries.

use serde::{Deserialize, Serialize};

/// Which users' rows a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    All,
    Own(i64),
}

/// Effective user predicate after combining a scope with a requested filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    /// No restriction on user.
    Everyone,
    /// Only this user's rows.
    Only(i64),
    /// The request asks for rows outside the scope; the result is empty.
    Nobody,
}

impl UserFilter {
    /// The bind value for a `(? IS NULL OR user_id = ?)` predicate, or `None`
    /// when no row can match.
    pub fn as_bind(&self) -> Option<Option<i64>> {
        match self {
            UserFilter::Everyone => Some(None),
            UserFilter::Only(id) => Some(Some(*id)),
            UserFilter::Nobody => None,
        }
    }
}

impl Scope {
    /// Narrow an optional requested user to what this scope allows.
    pub fn narrow(&self, requested: Option<i64>) -> UserFilter {
        match (self, requested) {
            (Scope::All, None) => UserFilter::Everyone,
            (Scope::All, Some(id)) => UserFilter::Only(id),
            (Scope::Own(own), None) => UserFilter::Only(*own),
            (Scope::Own(own), Some(id)) if id == *own => UserFilter::Only(id),
            (Scope::Own(_), Some(_)) => UserFilter::Nobody,
        }
    }

    /// Whether a row owned by `user_id` is visible.
    pub fn permits(&self, user_id: i64) -> bool {
        match self {
            Scope::All => true,
            Scope::Own(own) => *own == user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow() {
        assert_eq!(Scope::All.narrow(None), UserFilter::Everyone);
        assert_eq!(Scope::All.narrow(Some(3)), UserFilter::Only(3));
        assert_eq!(Scope::Own(7).narrow(None), UserFilter::Only(7));
        assert_eq!(Scope::Own(7).narrow(Some(7)), UserFilter::Only(7));
        assert_eq!(Scope::Own(7).narrow(Some(3)), UserFilter::Nobody);
        assert_eq!(UserFilter::Nobody.as_bind(), None);
    }

    #[test]
    fn test_permits() {
        assert!(Scope::All.permits(1));
        assert!(Scope::Own(1).permits(1));
        assert!(!Scope::Own(1).permits(2));
    }
}
