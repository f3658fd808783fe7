//! Role reconciliation API.
//!
//! HTTP surface over the reconciliation engine, consumed by the
//! association's admin UI:
//!
//! - `GET  /roles/validate` - run the validation scanner
//! - `POST /roles/fix` - repair one issue with an explicit fix
//! - `POST /roles/fix-all` - bulk repair pass over all detected issues
//! - `POST /roles/collectors/sync` - collector-role sync pass
//! - `GET  /roles/audit` - query the append-only audit trail
//! - `GET  /roles/effective/{identity}` - per-identity consistency report
//!
//! All routes require the `admin` role. Authentication itself is owned by
//! the deployment's gateway, which inserts [`AdminClaims`] into request
//! extensions before this router runs.

pub mod claims;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;

pub use claims::AdminClaims;
pub use error::ApiRolesError;
pub use router::{roles_router, RolesState};
