//! First-order Markov chain training and generation library.
//!
//! This crate builds a Markov chain over a sequence of discrete tokens
//! (typically words) and generates new sequences from the learned
//! transition statistics. It provides:
//! - A deduplicated state registry with per-state transition tallies
//! - Frequency-weighted transition sampling with an injectable random source
//! - Lazy generation walks driven by a caller-supplied stop predicate
//!
//! The core is I/O-free: tokens come in through iterators and go out through
//! iterators, so the same chain works against files, sockets, or a test
//! harness. Reading words and formatting output belong to the calling layer.

/// Chain, state and generation walk types.
pub mod model;

/// Typed errors raised by training and generation.
pub mod error;

pub use error::ChainError;
pub use model::chain::{Chain, StateRef};
pub use model::state::State;
pub use model::walk::Walk;
