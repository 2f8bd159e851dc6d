//! Domain models for the MediConnect core.

mod catalog;
mod chat;
mod order;
mod prescription;

pub use catalog::*;
pub use chat::*;
pub use order::*;
pub use prescription::*;
