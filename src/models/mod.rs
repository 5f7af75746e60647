pub mod profile;
pub mod visit_request;

pub use profile::{Document, Profile, ProfileUpdate, UserType, VerificationStatus};
pub use visit_request::{
    Pagination, PropertySummary, TenantSummary, VisitAction, VisitRequest, VisitRequestPage,
    VisitRequestView, VisitStatus,
};
