//! Route declarations and the admin route table.

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;
use crate::types::{ADMIN_ROLE, DEVELOPER_ROLE, RoleSet};
use crate::Result;

use super::route_guard::{LANDING_PATH, LOGIN_PATH};

/// What a route demands of the session.
///
/// `requiresRole` may be written as a single string or a list; it is
/// normalized into a [`RoleSet`] when the route is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequirements {
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub requires_guest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_role: Option<RoleSet>,
}

impl RouteRequirements {
    /// Open to everyone.
    pub fn public() -> Self {
        Self::default()
    }

    /// Only for authenticated users.
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    /// Only for users who are not logged in.
    pub fn guest() -> Self {
        Self {
            requires_guest: true,
            ..Self::default()
        }
    }

    /// Additionally require any one of `roles`.
    pub fn with_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.requires_role = Some(RoleSet::from_iter(roles));
        self
    }

    fn validate(&self, path: &str) -> Result<()> {
        let reason = if self.requires_guest && self.requires_role.is_some() {
            Some("a guest-only route cannot require roles")
        } else if self.requires_guest && self.requires_auth {
            Some("a route cannot require both guest and authenticated sessions")
        } else if self.requires_role.as_ref().is_some_and(RoleSet::is_empty) {
            Some("requiresRole must name at least one role")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidInputError::Route {
                path: path.to_string(),
                reason: reason.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

/// A navigable destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub meta: RouteRequirements,
}

impl Route {
    pub fn new(name: impl Into<String>, path: impl Into<String>, meta: RouteRequirements) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            meta,
        }
    }
}

/// Result of looking a path up in a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The path names a registered route.
    Route(&'a Route),
    /// Unknown path; go here instead.
    Redirect(String),
}

#[derive(Deserialize)]
struct RouteTableFile {
    #[serde(default = "default_base")]
    base: String,
    routes: Vec<Route>,
}

fn default_base() -> String {
    "/".to_string()
}

/// The set of routes an application exposes, mounted under a base path.
///
/// Unknown paths resolve to a redirect to the landing page.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base: String,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table mounted at `base` (e.g. `/admin/`).
    pub fn new(base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        Self {
            base: base.to_string(),
            routes: Vec::new(),
        }
    }

    /// The economy admin panel's routes.
    pub fn admin() -> Self {
        let editors = [ADMIN_ROLE, DEVELOPER_ROLE];
        let mut table = Self::new("/admin/");
        let routes = [
            Route::new("login", LOGIN_PATH, RouteRequirements::guest()),
            Route::new("dashboard", LANDING_PATH, RouteRequirements::authenticated()),
            Route::new(
                "skills",
                "/skills",
                RouteRequirements::authenticated().with_roles(editors),
            ),
            Route::new(
                "recipes",
                "/recipes",
                RouteRequirements::authenticated().with_roles(editors),
            ),
            Route::new(
                "bonuses",
                "/bonuses",
                RouteRequirements::authenticated().with_roles(editors),
            ),
        ];
        for route in routes {
            let registered = table.register(route);
            debug_assert!(registered.is_ok(), "built-in route rejected: {registered:?}");
        }
        table
    }

    /// Parse a table from JSON of the form
    /// `{"base": "/admin/", "routes": [{"name", "path", "meta"}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RouteTableFile =
            serde_json::from_str(json).map_err(|e| InvalidInputError::Other {
                message: format!("route table: {}", e),
            })?;

        let mut table = Self::new(&file.base);
        for route in file.routes {
            table.register(route)?;
        }
        Ok(table)
    }

    /// Add a route, rejecting contradictory requirements and duplicates.
    pub fn register(&mut self, mut route: Route) -> Result<()> {
        if !route.path.starts_with('/') {
            return Err(InvalidInputError::Route {
                path: route.path,
                reason: "path must start with '/'".to_string(),
            }
            .into());
        }
        route.path = normalize(&route.path);
        route.meta.validate(&route.path)?;

        if self
            .routes
            .iter()
            .any(|r| r.path == route.path || r.name == route.name)
        {
            return Err(InvalidInputError::Route {
                path: route.path,
                reason: format!("duplicate route '{}'", route.name),
            }
            .into());
        }

        self.routes.push(route);
        Ok(())
    }

    pub fn base(&self) -> &str {
        if self.base.is_empty() { "/" } else { &self.base }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Look up a path, with or without the base prefix, query or fragment.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = self.strip_base(path);
        let path = normalize(path);

        match self.routes.iter().find(|r| r.path == path) {
            Some(route) => Resolution::Route(route),
            None => Resolution::Redirect(LANDING_PATH.to_string()),
        }
    }

    fn strip_base<'p>(&self, path: &'p str) -> &'p str {
        if self.base.is_empty() {
            return path;
        }
        match path.strip_prefix(self.base.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
