//! Candidate accounts, applications, and the admin review surface.
//!
//! Candidates sign up, fill in their profile over several steps, and submit once the
//! declaration is accepted. Submitting snapshots the live exam window into the record.
//! Admins filter and page through complete records, change status, send remarks over a
//! WhatsApp link, export CSV, and download the rendered document bundle.

pub mod domain;
pub mod repository;
pub mod review;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, ApplyRequest, BankDetails, CandidateId, CandidateProfile, CandidateRecord,
    CandidateStatus, CandidateView, ExamPreferences, ExamSnapshot, HealthDeclaration,
    LoginRequest, MediaReferences, PersonalDetails, ProfileUpdate, SignupRequest,
};
pub use repository::CandidateRepository;
pub use review::{Dashboard, RemarkLink, RemarkRequest, ReviewPage, ReviewQuery, StatusUpdate};
pub use router::{candidate_router, CandidateRouterState};
pub use service::{CandidateError, CandidateService};
pub use validation::CandidateViolation;
