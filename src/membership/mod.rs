// Public API
pub use handlers::{approve_membership, list_pending, reject_membership, submit_membership};
pub use models::{MembershipRequestModel, RequestStatus, FOUNDING_YEAR, MEMBERSHIP_FEE_YEN};
pub use repository::{
    InMemoryMembershipRepository, MembershipRepository, PostgresMembershipRepository,
};
pub use service::MembershipService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
