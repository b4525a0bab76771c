//! Domain models for the medcall system.

mod branch;
mod call;
mod feedback;
mod message;
mod operator;
mod patient;
mod rating;

pub use branch::*;
pub use call::*;
pub use feedback::*;
pub use message::*;
pub use operator::*;
pub use patient::*;
pub use rating::*;
