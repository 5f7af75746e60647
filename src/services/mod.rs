pub mod profile_service;
pub mod visit_service;

pub use profile_service::ProfileService;
pub use visit_service::VisitRequestService;
