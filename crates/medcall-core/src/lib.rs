//! Medcall Core Library
//!
//! Clinic call-center backend: patient identity resolution, bulk import
//! reconciliation, call/rating/complaint writes and summary reporting.
//!
//! # Architecture
//!
//! ```text
//! Spreadsheet grid                 Operator actions
//!       │                    (call / rating / complaint)
//!       ▼                                │
//!  Import Pipeline                       ▼
//!  header → rows →               ┌───────────────────┐
//!  dedup → batch NEW ──────────▶ │ Identity Resolver │ ◀── phone normalizer
//!                                │  (one tx, one     │     branch matcher
//!                                │   patient/phone)  │
//!                                └─────────┬─────────┘
//!                                          │
//!                        ┌─────────────────┼─────────────────┐
//!                        ▼                 ▼                 ▼
//!                   CallRecord          Ratings       Feedback + claimed
//!                                                       messages
//!                                                          │ (same tx)
//!                                                          ▼
//!                                                     card_outbox
//!                                                          │ post-commit
//!                                                          ▼
//!                                                    OutboxWorker ──▶ CardBoard
//! ```
//!
//! # Core Principle
//!
//! **At most one canonical patient per phone number.** Every write path goes
//! through the resolver inside its own transaction; the partial unique index
//! on (phone, REGULAR) backstops concurrent first contacts.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, CallRecord, Rating, Feedback, etc.)
//! - [`resolver`]: Phone normalizer, branch matcher and identity resolver
//! - [`import`]: Spreadsheet import pipeline
//! - [`ops`]: Transactional write coordinators and the outbox worker
//! - [`board`]: Card-board contract and card rendering
//! - [`export`]: Per-branch summary reports

pub mod board;
pub mod db;
pub mod export;
pub mod import;
pub mod models;
pub mod ops;
pub mod resolver;

// Re-export commonly used types
pub use board::{BoardError, CardBoard, CardRequest, CreatedCard};
pub use db::Database;
pub use export::{SummaryExporter, SummaryReport};
pub use import::{import_grid, ImportError, ImportReport, SheetGrid};
pub use models::{
    Branch, CallOutcome, CallRecord, Feedback, FeedbackCategory, Message, Operator, Patient,
    PatientStatus, Rating, RatingCategory, Score,
};
pub use ops::{
    create_call_record, create_feedback, create_rating, create_rating_batch, NewCallRecord,
    NewFeedback, NewRating, OpsError, OutboxWorker,
};
pub use resolver::{normalize_phone, resolve_patient, BranchMatcher, ResolveError};
