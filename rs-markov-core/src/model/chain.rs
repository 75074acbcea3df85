use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;
use rand::rngs::ThreadRng;

use super::state::State;
use super::walk::Walk;
use crate::error::ChainError;

/// Opaque identifier of a state inside one [`Chain`].
///
/// Returned by [`Chain::record_sample`] so the caller can thread it back in
/// as the "previous" argument on the next call, linking consecutive samples
/// into one continuous training sequence. References are only meaningful for
/// the chain that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRef(pub(crate) usize);

/// A first-order Markov chain over an arbitrary token type.
///
/// The chain owns a registry of [`State`]s, one per distinct token value
/// observed during training. States are deduplicated by value equality and
/// never destroyed. There is no notion of a current position: training and
/// generation both take explicit token values and resolve them by lookup.
///
/// # Responsibilities
/// - Materialize states and transition tallies from observed samples
/// - Resolve token values to states in O(1) amortized time
/// - Generate fresh token sequences by walking the learned transitions
///
/// # Invariants
/// - At most one state exists per distinct token value
/// - Every tally target also has a state of its own (training creates the
///   target's state in the same call that records the transition)
///
/// Training mutates the registry and requires exclusive ownership. A trained
/// chain is read-only during generation, so independent walks may run
/// concurrently as long as each one gets its own random source.
#[derive(Clone, Debug)]
pub struct Chain<T> {
	/// Registry of states; a `StateRef` is an index into this vector.
	states: Vec<State<T>>,
	/// Token value to registry index, for O(1) lookup-or-create.
	index: HashMap<T, usize>,
}

impl<T> Default for Chain<T> {
	fn default() -> Self {
		Self {
			states: Vec::new(),
			index: HashMap::new(),
		}
	}
}

impl<T: Clone + Eq + Hash> Chain<T> {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self {
			states: Vec::new(),
			index: HashMap::new(),
		}
	}

	/// Returns the number of distinct states in the registry.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// Whether no token has been observed yet.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Returns the state representing `token`, if it was ever observed.
	pub fn state(&self, token: &T) -> Option<&State<T>> {
		self.index.get(token).map(|&idx| &self.states[idx])
	}

	/// Resolves a previously issued reference back to its state.
	pub fn state_at(&self, state_ref: StateRef) -> Option<&State<T>> {
		self.states.get(state_ref.0)
	}

	/// Records one observed token, optionally as the successor of an
	/// earlier state.
	///
	/// Looks up the state for `token` by value equality, creating it with an
	/// empty tally if this is the first observation. The lookup-or-create is
	/// idempotent: recording the same token repeatedly never creates
	/// duplicate states. If `previous` is supplied, the transition
	/// `previous -> token` is tallied in the previous state.
	///
	/// Returns the reference of the state now representing `token`. Passing
	/// it as `previous` on the next call threads consecutive calls into one
	/// continuous sequence; passing `None` starts a fresh sequence, which is
	/// how callers keep distinct input sources from being linked together.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidReference`] if `previous` does not
	/// belong to this chain's registry. The check runs before any mutation,
	/// so a failed call leaves the chain untouched.
	pub fn record_sample(
		&mut self,
		token: T,
		previous: Option<StateRef>,
	) -> Result<StateRef, ChainError<T>> {
		if let Some(StateRef(prev)) = previous {
			if prev >= self.states.len() {
				return Err(ChainError::InvalidReference(prev));
			}
		}

		let idx = match self.index.get(&token) {
			Some(&idx) => idx,
			None => {
				let idx = self.states.len();
				self.index.insert(token.clone(), idx);
				self.states.push(State::new(token.clone()));
				idx
			}
		};

		if let Some(StateRef(prev)) = previous {
			self.states[prev].record_transition(token);
		}

		Ok(StateRef(idx))
	}

	/// Trains the chain on one complete token sequence.
	///
	/// Feeds every token through [`Chain::record_sample`], threading the
	/// returned references so consecutive tokens form transitions. Each call
	/// is an independent sequence starting with no previous state: training
	/// two sources with two calls never links the last token of one to the
	/// first token of the other. Callers that want continuous chaining
	/// across sources can thread `record_sample` themselves.
	///
	/// Returns the reference of the last recorded state, or `None` if the
	/// sequence was empty.
	pub fn train<I>(&mut self, tokens: I) -> Result<Option<StateRef>, ChainError<T>>
	where
		I: IntoIterator<Item = T>,
	{
		let mut previous = None;
		for token in tokens {
			previous = Some(self.record_sample(token, previous)?);
		}
		Ok(previous)
	}

	/// Samples one next token out of the state representing `token`,
	/// weighted by observed frequency.
	///
	/// Returns `Ok(None)` when the state exists but has no outgoing
	/// transitions (normal terminal condition).
	///
	/// # Errors
	/// - [`ChainError::UnknownState`] if `token` was never observed.
	/// - [`ChainError::InternalInvariant`] if the weighted draw fails,
	///   which indicates a sampler bug.
	pub fn sample_transition<R: Rng + ?Sized>(
		&self,
		token: &T,
		rng: &mut R,
	) -> Result<Option<&T>, ChainError<T>> {
		let state = self
			.state(token)
			.ok_or_else(|| ChainError::UnknownState(token.clone()))?;
		state.sample_next(rng)
	}

	/// Starts a generation walk from `seed`, using the process-wide random
	/// source.
	///
	/// See [`Chain::generate_with_rng`] for the walk semantics.
	pub fn generate<F>(&self, seed: T, stop: F) -> Walk<'_, T, F, ThreadRng>
	where
		F: FnMut(&T) -> bool,
	{
		self.generate_with_rng(seed, stop, rand::rng())
	}

	/// Starts a generation walk from `seed` with a caller-supplied random
	/// source, enabling deterministic generation in tests.
	///
	/// The walk is a lazy iterator over `Result<T, ChainError<T>>`. Each
	/// step resolves the current token to its state, emits the token,
	/// evaluates the stop predicate (the satisfying token is emitted, then
	/// the walk ends), and otherwise samples the next token. A token with no
	/// state yields `Err(UnknownState)` and ends the walk; a state with no
	/// transitions ends the walk silently. Every call is a fresh,
	/// independent walk.
	pub fn generate_with_rng<F, R>(&self, seed: T, stop: F, rng: R) -> Walk<'_, T, F, R>
	where
		F: FnMut(&T) -> bool,
		R: Rng,
	{
		Walk::new(self, seed, stop, rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn train_words(chain: &mut Chain<String>, text: &str) {
		chain
			.train(text.split_whitespace().map(str::to_owned))
			.unwrap();
	}

	#[test]
	fn state_creation_is_idempotent() {
		let mut chain = Chain::new();
		let first = chain.record_sample("A", None).unwrap();
		for _ in 0..10 {
			assert_eq!(chain.record_sample("A", None).unwrap(), first);
		}

		assert_eq!(chain.len(), 1);
		assert!(chain.state(&"A").unwrap().is_terminal());
	}

	#[test]
	fn tally_counts_match_observed_sequence() {
		// A B A B A C
		let mut chain = Chain::new();
		train_words(&mut chain, "A B A B A C");

		let a = chain.state(&"A".to_owned()).unwrap();
		assert_eq!(a.tally_count(&"B".to_owned()), 2);
		assert_eq!(a.tally_count(&"C".to_owned()), 1);

		let b = chain.state(&"B".to_owned()).unwrap();
		assert_eq!(b.tally_count(&"A".to_owned()), 2);

		assert!(chain.state(&"C".to_owned()).unwrap().is_terminal());
		assert_eq!(chain.len(), 3);
	}

	#[test]
	fn training_structure_is_deterministic() {
		// Tallies are counting, not sampling; no randomness involved
		let mut first = Chain::new();
		let mut second = Chain::new();
		train_words(&mut first, "the cat sat on the mat");
		train_words(&mut second, "the cat sat on the mat");

		assert_eq!(first.len(), second.len());
		for word in ["the", "cat", "sat", "on", "mat"] {
			let word = word.to_owned();
			let a = first.state(&word).unwrap();
			let b = second.state(&word).unwrap();
			assert_eq!(a.tally_len(), b.tally_len());
			for next in ["the", "cat", "sat", "on", "mat"] {
				let next = next.to_owned();
				assert_eq!(a.tally_count(&next), b.tally_count(&next));
			}
		}
	}

	#[test]
	fn invalid_previous_reference_is_rejected() {
		let mut chain = Chain::new();
		chain.record_sample("A", None).unwrap();

		let bogus = StateRef(99);
		assert_eq!(
			chain.record_sample("B", Some(bogus)),
			Err(ChainError::InvalidReference(99))
		);

		// The failed call must not have mutated the registry
		assert_eq!(chain.len(), 1);
		assert!(chain.state(&"B").is_none());
	}

	#[test]
	fn separate_train_calls_do_not_chain() {
		let mut chain = Chain::new();
		train_words(&mut chain, "one two");
		train_words(&mut chain, "three four");

		// "two" must not have picked up a transition toward "three"
		let two = chain.state(&"two".to_owned()).unwrap();
		assert!(two.is_terminal());
	}

	#[test]
	fn references_thread_across_sources_when_asked() {
		let mut chain = Chain::new();
		let last = chain
			.train(["one".to_owned(), "two".to_owned()])
			.unwrap();
		chain.record_sample("three".to_owned(), last).unwrap();

		let two = chain.state(&"two".to_owned()).unwrap();
		assert_eq!(two.tally_count(&"three".to_owned()), 1);
	}

	#[test]
	fn sample_transition_reports_unknown_token() {
		let chain: Chain<String> = Chain::new();
		let mut rng = StdRng::seed_from_u64(3);

		let err = chain
			.sample_transition(&"ghost".to_owned(), &mut rng)
			.unwrap_err();
		assert_eq!(err, ChainError::UnknownState("ghost".to_owned()));
	}

	#[test]
	fn sample_transition_terminal_state_is_none() {
		let mut chain = Chain::new();
		chain.record_sample("end", None).unwrap();
		let mut rng = StdRng::seed_from_u64(3);

		assert_eq!(chain.sample_transition(&"end", &mut rng).unwrap(), None);
	}

	#[test]
	fn generation_stops_on_predicate() {
		let mut chain = Chain::new();
		train_words(&mut chain, "Hello World.");

		let rng = StdRng::seed_from_u64(11);
		let words: Vec<String> = chain
			.generate_with_rng("Hello".to_owned(), |w| w.ends_with('.'), rng)
			.collect::<Result<_, _>>()
			.unwrap();

		assert_eq!(words, vec!["Hello".to_owned(), "World.".to_owned()]);
	}

	#[test]
	fn generation_stops_silently_at_dead_end() {
		// "end" has no outgoing transitions and does not satisfy the predicate
		let mut chain = Chain::new();
		train_words(&mut chain, "start middle end");

		let rng = StdRng::seed_from_u64(11);
		let words: Vec<String> = chain
			.generate_with_rng("start".to_owned(), |_| false, rng)
			.collect::<Result<_, _>>()
			.unwrap();

		assert_eq!(
			words,
			vec!["start".to_owned(), "middle".to_owned(), "end".to_owned()]
		);
	}

	#[test]
	fn generation_from_unseen_seed_is_an_error() {
		let mut chain = Chain::new();
		train_words(&mut chain, "Hello World.");

		let rng = StdRng::seed_from_u64(11);
		let mut walk = chain.generate_with_rng("Goodbye".to_owned(), |_| false, rng);

		assert_eq!(
			walk.next(),
			Some(Err(ChainError::UnknownState("Goodbye".to_owned())))
		);
		// Fused after the error
		assert_eq!(walk.next(), None);
	}

	#[test]
	fn max_steps_bounds_a_looping_walk() {
		// Self-loop with a predicate that never triggers
		let mut chain = Chain::new();
		train_words(&mut chain, "loop loop loop");

		let rng = StdRng::seed_from_u64(11);
		let words: Vec<String> = chain
			.generate_with_rng("loop".to_owned(), |_| false, rng)
			.max_steps(5)
			.collect::<Result<_, _>>()
			.unwrap();

		assert_eq!(words.len(), 5);
	}
}
