//! Following guard redirects to a final page.

use tracing::{debug, instrument};

use crate::Result;
use crate::error::InvalidInputError;

use super::route::{Resolution, Route, RouteTable};
use super::route_guard::{Navigation, RouteGuard};

/// Redirect hops allowed before a navigation is declared a loop.
const MAX_REDIRECTS: usize = 8;

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// The route finally entered.
    pub route: Route,
    /// Every path visited, starting with the one requested.
    pub hops: Vec<String>,
}

impl NavigationOutcome {
    pub fn was_redirected(&self) -> bool {
        self.hops.len() > 1
    }
}

/// A route table paired with the guard that protects it.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self { table, guard }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Navigate to `path`, following catch-all and guard redirects.
    ///
    /// # Errors
    ///
    /// Fails if redirects do not settle within a bounded number of hops,
    /// which only a misconfigured route table can cause.
    #[instrument(skip(self))]
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome> {
        let mut hops = vec![path.to_string()];
        let mut current = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let route = match self.table.resolve(&current) {
                Resolution::Route(route) => route,
                Resolution::Redirect(to) => {
                    debug!(from = %current, %to, "No such route");
                    current = to;
                    hops.push(current.clone());
                    continue;
                }
            };

            match self.guard.before_each(&route.meta).await {
                Navigation::Allow => {
                    return Ok(NavigationOutcome {
                        route: route.clone(),
                        hops,
                    });
                }
                Navigation::Redirect { to, reason } => {
                    debug!(from = %current, %to, ?reason, "Navigation redirected");
                    current = to;
                    hops.push(current.clone());
                }
            }
        }

        Err(InvalidInputError::Other {
            message: format!("redirect loop navigating to '{}': {}", path, hops.join(" -> ")),
        }
        .into())
    }
}
