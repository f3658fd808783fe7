//! Request and response models.

pub mod requests;
pub mod responses;

pub use requests::{AuditTrailParams, FixRoleRequest};
pub use responses::{
    AuditEntryResponse, BulkFailureResponse, BulkFixResponse, IdentityReportResponse,
    RepairOutcomeResponse, ValidationIssueResponse,
};
