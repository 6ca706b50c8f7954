//! Validated value types.
//!
//! These types enforce their invariants at construction time.

mod api_url;
mod identity;

pub use api_url::ApiUrl;
pub use identity::{ADMIN_ROLE, DEVELOPER_ROLE, Identity, RoleSet};
