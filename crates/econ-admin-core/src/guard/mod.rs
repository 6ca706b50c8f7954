//! Navigation gating.
//!
//! Routes declare what they require of the session; the [`RouteGuard`]
//! decides before every navigation whether to allow it or redirect, and the
//! [`Navigator`] follows redirects through a [`RouteTable`] to the page a
//! user actually lands on.

mod navigator;
mod route;
mod route_guard;

pub use navigator::{NavigationOutcome, Navigator};
pub use route::{Resolution, Route, RouteRequirements, RouteTable};
pub use route_guard::{LANDING_PATH, LOGIN_PATH, Navigation, RedirectReason, RouteGuard};
