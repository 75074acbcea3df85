use std::hash::Hash;

use rand::Rng;

use super::chain::Chain;
use crate::error::ChainError;

/// A lazy generation walk over a trained [`Chain`].
///
/// Created by [`Chain::generate`] or [`Chain::generate_with_rng`]. Yields
/// one `Result<T, ChainError<T>>` per emitted token and terminates under
/// exactly one of these conditions:
/// - the stop predicate accepted the token just emitted (the accepting token
///   is included in the output);
/// - the current state has no outgoing transitions (silent termination);
/// - the current token has no state in the registry, yielding
///   `Err(UnknownState)` as the final item;
/// - the optional [`max_steps`](Walk::max_steps) bound was reached.
///
/// The iterator is fused: after an error or any terminal condition it keeps
/// returning `None`. Walks do not mutate the chain; each walk owns its
/// random source.
pub struct Walk<'a, T, F, R> {
	chain: &'a Chain<T>,
	/// Token to emit on the next step; `None` once the walk has ended.
	current: Option<T>,
	stop: F,
	rng: R,
	/// Emission cap; `None` means unbounded.
	max_steps: Option<usize>,
	emitted: usize,
}

impl<'a, T, F, R> Walk<'a, T, F, R>
where
	T: Clone + Eq + Hash,
	F: FnMut(&T) -> bool,
	R: Rng,
{
	pub(crate) fn new(chain: &'a Chain<T>, seed: T, stop: F, rng: R) -> Self {
		Self {
			chain,
			current: Some(seed),
			stop,
			rng,
			max_steps: None,
			emitted: 0,
		}
	}

	/// Caps the number of emitted tokens.
	///
	/// A defensive bound for chains where a cycle and a never-satisfied stop
	/// predicate could otherwise walk forever. Reaching the cap ends the
	/// walk silently, like a dead-end state.
	pub fn max_steps(mut self, max_steps: usize) -> Self {
		self.max_steps = Some(max_steps);
		self
	}
}

impl<'a, T, F, R> Iterator for Walk<'a, T, F, R>
where
	T: Clone + Eq + Hash,
	F: FnMut(&T) -> bool,
	R: Rng,
{
	type Item = Result<T, ChainError<T>>;

	fn next(&mut self) -> Option<Self::Item> {
		let token = self.current.take()?;

		if let Some(max) = self.max_steps {
			if self.emitted >= max {
				return None;
			}
		}

		let state = match self.chain.state(&token) {
			Some(state) => state,
			None => return Some(Err(ChainError::UnknownState(token))),
		};

		self.emitted += 1;

		if (self.stop)(&token) {
			// Terminate after emission; `current` stays empty
			return Some(Ok(token));
		}

		match state.sample_next(&mut self.rng) {
			Ok(Some(next)) => self.current = Some(next.clone()),
			Ok(None) => (),
			Err(err) => return Some(Err(err)),
		}

		Some(Ok(token))
	}
}
