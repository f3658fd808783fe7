//! Request handlers.

pub mod audit;
pub mod collector_sync;
pub mod effective;
pub mod fix;
pub mod fix_all;
pub mod validate;

pub use audit::audit_trail_handler;
pub use collector_sync::fix_all_collectors_handler;
pub use effective::effective_role_handler;
pub use fix::fix_role_error_handler;
pub use fix_all::fix_all_role_issues_handler;
pub use validate::validate_user_roles_handler;
