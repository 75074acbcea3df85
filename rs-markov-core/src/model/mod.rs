//! Top-level module for the Markov chain system.
//!
//! This crate provides a first-order, token-level Markov chain, including:
//! - The chain registry and training/generation entry points (`Chain`)
//! - Internal state management (`State`)
//! - The lazy generation iterator (`Walk`)

/// The chain registry and its training/generation interface.
///
/// Exposes sample recording, sequence training, weighted transition
/// sampling and generation walks.
pub mod chain;

/// Per-token state: value plus outgoing transition tally.
///
/// Tracks observed transitions and supports weighted random sampling.
pub mod state;

/// Lazy generation walk returned by `Chain::generate`.
pub mod walk;
