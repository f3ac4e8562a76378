//! trivia-core: Quiz session state machine, data model, and scoring.
//!
//! This crate defines the data model, the traits that sources and stores
//! implement, and the engine that runs a timed quiz against them.

pub mod countdown;
pub mod engine;
pub mod error;
pub mod model;
pub mod session;
pub mod statistics;
pub mod text;
pub mod traits;
