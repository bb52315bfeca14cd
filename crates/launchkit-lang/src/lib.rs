//! # launchkit-lang
//!
//! Phrase interpretation for the LaunchKit CLI:
//! - Normalizer: case folding, punctuation stripping, synonym rewriting
//! - Grammar table: declarative phrase patterns loaded once at startup
//! - Intent matcher: ranked candidate intents with typed slots

pub mod error;
pub mod grammar;
pub mod matcher;
pub mod normalize;

pub use error::{Error, Result};
pub use grammar::{builtin_table, GrammarRule, GrammarTable, SlotKind, SlotSpec};
pub use matcher::{match_input, CandidateMatch, SlotValue, SlotValues};
pub use normalize::Normalizer;
