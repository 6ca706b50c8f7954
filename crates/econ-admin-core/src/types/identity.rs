//! User identity and role sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role granting system management.
pub const ADMIN_ROLE: &str = "admin";

/// Role granting content editing.
pub const DEVELOPER_ROLE: &str = "developer";

/// A normalized set of role names.
///
/// Deserializes from either a single string or a list of strings, so route
/// metadata written as `"admin"` and `["admin"]` produce the same set.
///
/// # Example
///
/// ```
/// use econ_admin_core::RoleSet;
///
/// let required = RoleSet::from_iter(["admin", "developer"]);
/// let held = RoleSet::from_iter(["developer"]);
/// assert!(held.intersects(&required));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Create an empty role set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check membership of a single role.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// True when at least one role is shared with `other`.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.iter().collect::<Vec<_>>().join(", ");
        write!(f, "[{}]", joined)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleSetRepr {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RoleSetRepr::deserialize(deserializer)? {
            RoleSetRepr::One(role) => RoleSet::from_iter([role]),
            RoleSetRepr::Many(roles) => RoleSet::from_iter(roles),
        })
    }
}

/// The user a session belongs to, as confirmed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub roles: RoleSet,
}

impl Identity {
    pub fn new(username: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(ADMIN_ROLE)
    }

    pub fn is_developer(&self) -> bool {
        self.roles.contains(DEVELOPER_ROLE)
    }

    /// Admins may manage system configuration.
    pub fn can_manage_system(&self) -> bool {
        self.is_admin()
    }

    /// Admins and developers may edit skills, recipes and bonuses.
    pub fn can_edit_content(&self) -> bool {
        self.is_admin() || self.is_developer()
    }
}
