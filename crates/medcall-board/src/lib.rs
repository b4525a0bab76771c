//! Card-board collaborator for medcall complaints.
//!
//! Implements the core's `CardBoard` trait against a Trello-style REST API.
//! The HTTP transport sits behind the `http` feature so the core test suite
//! never needs network dependencies.

pub mod config;

#[cfg(feature = "http")]
pub mod client;

pub use config::BoardConfig;

#[cfg(feature = "http")]
pub use client::TrelloClient;
