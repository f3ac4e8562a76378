//! trivia-providers: Question sources and the cached fetcher.
//!
//! Implements `QuestionProvider` for Open Trivia DB and a mock, and
//! `QuestionBank` for the cached fetcher with its fallback chain.

pub mod categories;
pub mod config;
pub mod defaults;
pub mod fetcher;
pub mod mock;
pub mod opentdb;

pub use config::{create_fetcher, create_source, load_config_from, TriviaConfig};
pub use fetcher::{BatchOrigin, QuestionFetcher};
pub use trivia_core::error::SourceError;
