//! Domain value objects
//!
//! Immutable values without identity, compared by their attributes.
//!
//! | Value object | Description |
//! |--------------|-------------|
//! | [`RequestContext`] | Client metadata carried explicitly into audit calls |
//! | [`TokenClaims`] | Decoded bearer-token payload |
//! | [`IssuedToken`] | Encoded token plus its claims |
//! | [`PageRequest`] / [`Page`] | Pagination input and output |
//! | [`AuditFilter`] | Audit search criteria |
//! | [`AuditStatistics`] | Aggregate counts over the audit trail |

/// Audit search and aggregation contracts
pub mod audit_filter;
/// Bearer-token claims
pub mod claims;
/// Pagination input and output
pub mod page;
/// Client request metadata
pub mod request_context;

pub use audit_filter::{AuditFilter, AuditStatistics, CountBucket};
pub use claims::{IssuedToken, TokenClaims};
pub use page::{Page, PageRequest};
pub use request_context::RequestContext;
