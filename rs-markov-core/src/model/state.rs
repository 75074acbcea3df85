use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

use crate::error::ChainError;

/// Represents one distinct token value observed during training.
///
/// A `State` pairs its token (`value`) with a tally of every transition
/// observed out of it. Conceptually this is a node in a first-order Markov
/// chain where outgoing edges are weighted by their number of observations.
///
/// ## Responsibilities
/// - Accumulate transition occurrences during training
/// - Pick a next token using weighted random sampling
///
/// ## Invariants
/// - `value` is set at creation and never mutated
/// - Tally keys are token values, not state references
/// - Each tally count is strictly positive
#[derive(Clone, Debug)]
pub struct State<T> {
	/// The token this state represents.
	value: T,
	/// Outgoing transitions indexed by next-token value.
	/// The count records how many times this transition was observed.
	/// Example: { "World." => 2, "there," => 1 }
	transition_tally: HashMap<T, u64>,
}

impl<T: Clone + Eq + Hash> State<T> {
	/// Creates a new state with an empty tally.
	pub(crate) fn new(value: T) -> Self {
		Self {
			value,
			transition_tally: HashMap::new(),
		}
	}

	/// Returns the token this state represents.
	pub fn value(&self) -> &T {
		&self.value
	}

	/// Records one observed transition toward `next`.
	///
	/// - If the transition already exists, its count is increased.
	/// - Otherwise, a new tally entry is created with a count of 1.
	pub(crate) fn record_transition(&mut self, next: T) {
		*self.transition_tally.entry(next).or_insert(0) += 1;
	}

	/// Returns how many times the transition toward `next` was observed.
	pub fn tally_count(&self, next: &T) -> u64 {
		self.transition_tally.get(next).copied().unwrap_or(0)
	}

	/// Returns the number of distinct next-token values observed.
	pub fn tally_len(&self) -> usize {
		self.transition_tally.len()
	}

	/// Whether this state has no outgoing transitions.
	///
	/// Reaching a terminal state ends a generation walk silently.
	pub fn is_terminal(&self) -> bool {
		self.transition_tally.is_empty()
	}

	/// Picks a next token using weighted random sampling.
	///
	/// Each distinct next-token value is one category with weight equal to
	/// its tally count; a value with weight `w` out of total `t` is chosen
	/// with probability `w/t`.
	///
	/// Returns `Ok(None)` if the state has no transitions. That is a normal
	/// terminal condition, not an error.
	///
	/// # Errors
	/// Returns [`ChainError::InternalInvariant`] if the draw exhausts the
	/// weights without selecting a category, which cannot happen while every
	/// tally count is >= 1.
	pub fn sample_next<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<&T>, ChainError<T>> {
		if self.transition_tally.is_empty() {
			return Ok(None);
		}

		// Total weight is >= 1 since every entry has a count >= 1
		let total: u64 = self.transition_tally.values().sum();

		// Cumulative subtraction to select a bucket
		let mut r = rng.random_range(0..total);
		for (next, occurrence) in &self.transition_tally {
			if r < *occurrence {
				return Ok(Some(next));
			}
			r -= occurrence;
		}

		Err(ChainError::InternalInvariant {
			candidates: self.transition_tally.len(),
		})
	}
}
