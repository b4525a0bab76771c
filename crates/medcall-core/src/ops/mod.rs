//! Write coordinators.
//!
//! One function per business write (call status, rating, complaint), each a
//! single transaction that validates the operator, resolves the patient
//! identity and persists its own record. Nothing here talks to the network;
//! the complaint path only queues a card for the outbox worker.

mod calls;
mod feedbacks;
mod outbox;
mod ratings;

pub use calls::{create_call_record, NewCallRecord};
pub use feedbacks::{create_feedback, NewFeedback};
pub use outbox::{DrainStats, OutboxWorker};
pub use ratings::{create_rating, create_rating_batch, NewRating};

use rusqlite::Connection;
use thiserror::Error;

use crate::db::{self, find_operator};
use crate::models::Operator;
use crate::resolver::ResolveError;

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("operator not found: {0}")]
    OperatorNotFound(String),

    #[error("a complaint requires at least one claimed message")]
    NoMessages,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Db(#[from] db::DbError),
}

pub type OpsResult<T> = Result<T, OpsError>;

/// Load the acting operator or fail the whole write.
fn require_operator(conn: &Connection, operator_id: &str) -> OpsResult<Operator> {
    find_operator(conn, operator_id)?
        .ok_or_else(|| OpsError::OperatorNotFound(operator_id.to_string()))
}
