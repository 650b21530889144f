//! Exam window configuration published by administrators.
//!
//! Only the newest window is live: candidates copy it into their application when they
//! submit, and the generated documents quote its name, held date, and date range.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    format_exam_date, parse_exam_date, ExamCountInput, ExamForm, ExamFormId, ExamFormViolation,
    HeldDate, NewExamForm, MONTH_NAMES,
};
pub use repository::ExamFormRepository;
pub use router::{exam_form_router, ExamRouterState};
pub use service::{ExamFormError, ExamFormService};
