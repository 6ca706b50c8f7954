//! The before-navigation decision.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::AuthService;
use crate::session::SessionSnapshot;

use super::route::RouteRequirements;

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where users go when a page is not for them, and where unknown paths lead.
pub const LANDING_PATH: &str = "/";

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The route needs a session and there is none.
    NotAuthenticated,
    /// The route is for guests and the user is logged in.
    AlreadyAuthenticated,
    /// The user holds none of the route's roles.
    InsufficientRole,
}

/// The guard's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect { to: String, reason: RedirectReason },
}

impl Navigation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Navigation::Allow)
    }
}

/// Decides, before each navigation, whether the session may enter a route.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    auth: Arc<AuthService>,
}

impl RouteGuard {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    /// Evaluate `to` against the session, first reconciling a restored token
    /// with the backend if that has not happened yet.
    pub async fn before_each(&self, to: &RouteRequirements) -> Navigation {
        if self.auth.session().snapshot().needs_init() {
            debug!("Session not yet confirmed, running init before navigation");
            self.auth.init().await;
        }

        let snapshot = self.auth.session().snapshot();
        let decision = self.decide(&snapshot, to);
        if let Navigation::Redirect {
            reason: RedirectReason::InsufficientRole,
            ..
        } = decision
        {
            warn!("Access denied: insufficient permissions");
        }
        decision
    }

    /// The decision itself, over an already-settled snapshot.
    ///
    /// Guest and authentication checks come before role checks.
    pub fn decide(&self, session: &SessionSnapshot, to: &RouteRequirements) -> Navigation {
        let authenticated = session.is_authenticated();

        if to.requires_auth && !authenticated {
            return redirect(LOGIN_PATH, RedirectReason::NotAuthenticated);
        }

        if to.requires_guest && authenticated {
            return redirect(LANDING_PATH, RedirectReason::AlreadyAuthenticated);
        }

        if let (Some(required), Some(identity)) = (&to.requires_role, &session.identity) {
            if !identity.roles.intersects(required) {
                return redirect(LANDING_PATH, RedirectReason::InsufficientRole);
            }
        }

        Navigation::Allow
    }
}

fn redirect(to: &str, reason: RedirectReason) -> Navigation {
    Navigation::Redirect {
        to: to.to_string(),
        reason,
    }
}
