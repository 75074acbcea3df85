//! Error types for chain training and generation.

use thiserror::Error;

/// Errors raised by [`Chain`](crate::model::chain::Chain) operations.
///
/// The taxonomy separates caller mistakes from internal bugs:
/// - [`InvalidReference`](ChainError::InvalidReference) and
///   [`UnknownState`](ChainError::UnknownState) are contract violations at
///   the call boundary and are recoverable by the caller.
/// - [`InternalInvariant`](ChainError::InternalInvariant) indicates a bug in
///   the sampler itself and should abort the run.
///
/// A state with no outgoing transitions is not an error; training and
/// generation model it as normal termination.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError<T> {
	/// A previous-state reference does not belong to this chain's registry.
	///
	/// Raised by `record_sample` before any mutation, so the offending call
	/// leaves the chain untouched.
	#[error("previous-state reference #{0} is not in the registry")]
	InvalidReference(usize),

	/// A token was used as a generation seed (or resolved mid-walk) without
	/// ever having been observed during training.
	///
	/// Carries the offending token so the caller can report or skip it.
	#[error("no state recorded for token {0:?}")]
	UnknownState(T),

	/// The weighted draw exhausted all transition weights without selecting
	/// one. Provably impossible while tally counts stay >= 1; reaching it
	/// means the sampler is broken.
	#[error("weighted draw selected no transition out of {candidates} candidates")]
	InternalInvariant {
		/// Number of distinct next-token candidates at the time of the draw.
		candidates: usize,
	},
}
