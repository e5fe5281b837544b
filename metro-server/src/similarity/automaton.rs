//! Suffix automaton over station token ids.
//!
//! The automaton for a sequence `Q` accepts exactly the contiguous runs of
//! `Q`. It is built online in amortised O(|Q|) and then walked against each
//! candidate sequence to find the longest run the candidate shares with `Q`.
//!
//! States live in one arena and refer to each other by [`StateId`]. Cloning a
//! state during construction rewrites many transitions at once, which only
//! works because nothing holds a reference into the arena.

use std::collections::HashMap;

use tracing::trace;

use super::vocab::{TokenId, Vocabulary};

/// Index of a state in a [`SuffixAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    /// The initial state, representing the empty run.
    pub const ROOT: StateId = StateId(0);
}

#[derive(Debug, Clone, Default)]
struct State {
    /// Length of the longest run this state represents.
    len: usize,
    /// Next-shorter equivalence class. `None` only for the root.
    link: Option<StateId>,
    next: HashMap<TokenId, StateId>,
}

/// Suffix automaton built from one query sequence.
#[derive(Debug, Clone)]
pub struct SuffixAutomaton {
    states: Vec<State>,
    last: StateId,
}

impl Default for SuffixAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixAutomaton {
    /// An automaton for the empty sequence: just the root.
    pub fn new() -> Self {
        Self {
            states: vec![State::default()],
            last: StateId::ROOT,
        }
    }

    /// Build an automaton from a whole sequence.
    pub fn from_symbols<I: IntoIterator<Item = TokenId>>(symbols: I) -> Self {
        let mut sa = Self::new();
        for c in symbols {
            sa.extend(c);
        }
        trace!(states = sa.states.len(), "suffix automaton built");
        sa
    }

    /// Append one symbol to the represented sequence.
    pub fn extend(&mut self, c: TokenId) {
        let cur = StateId(self.states.len());
        self.states.push(State {
            len: self.states[self.last.0].len + 1,
            link: None,
            next: HashMap::new(),
        });

        // Every suffix of the old sequence without a `c` transition now gets
        // one to `cur`. Stop at the first suffix that already continues with `c`.
        let mut p = Some(self.last);
        let mut existing = None;
        while let Some(pi) = p {
            if let Some(&q) = self.states[pi.0].next.get(&c) {
                existing = Some((pi, q));
                break;
            }
            self.states[pi.0].next.insert(c, cur);
            p = self.states[pi.0].link;
        }

        let link = match existing {
            None => StateId::ROOT,
            Some((p, q)) if self.states[p.0].len + 1 == self.states[q.0].len => q,
            Some((p, q)) => self.split(p, q, c),
        };

        self.states[cur.0].link = Some(link);
        self.last = cur;
    }

    /// Clone `q` so that the runs reached from `p` via `c` get their own
    /// state of length `len(p) + 1`. Returns the clone.
    fn split(&mut self, p: StateId, q: StateId, c: TokenId) -> StateId {
        let clone = StateId(self.states.len());
        let cloned = State {
            len: self.states[p.0].len + 1,
            link: self.states[q.0].link,
            next: self.states[q.0].next.clone(),
        };
        self.states.push(cloned);

        let mut walk = Some(p);
        while let Some(w) = walk {
            if self.states[w.0].next.get(&c) != Some(&q) {
                break;
            }
            self.states[w.0].next.insert(c, clone);
            walk = self.states[w.0].link;
        }

        self.states[q.0].link = Some(clone);
        clone
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Length of the longest run represented by `state`.
    pub fn run_len(&self, state: StateId) -> usize {
        self.states[state.0].len
    }

    /// Suffix link of `state`; `None` for the root.
    pub fn link(&self, state: StateId) -> Option<StateId> {
        self.states[state.0].link
    }

    pub fn transition(&self, state: StateId, c: TokenId) -> Option<StateId> {
        self.states[state.0].next.get(&c).copied()
    }

    /// Returns true if `run` occurs contiguously in the query.
    pub fn contains(&self, run: &[TokenId]) -> bool {
        let mut state = StateId::ROOT;
        for &c in run {
            match self.transition(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        true
    }

    /// Length of the longest contiguous run of `candidate` that also occurs
    /// contiguously in the query.
    ///
    /// Tokens are encoded through `vocab`, which must be the vocabulary the
    /// automaton was built with. A token the query never used cannot extend
    /// any match, so it resets the current run.
    pub fn longest_common_run<I>(&self, candidate: I, vocab: &Vocabulary) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut v = StateId::ROOT;
        let mut l = 0usize;
        let mut best = 0usize;

        for token in candidate {
            let Some(c) = vocab.encode(token.as_ref()) else {
                v = StateId::ROOT;
                l = 0;
                continue;
            };

            if let Some(next) = self.transition(v, c) {
                v = next;
                l += 1;
            } else {
                // Shorten the current match along suffix links until some
                // suffix of it can be extended by `c`.
                let mut p = self.link(v);
                let mut extended = None;
                while let Some(pi) = p {
                    if let Some(next) = self.transition(pi, c) {
                        extended = Some((pi, next));
                        break;
                    }
                    p = self.link(pi);
                }

                match extended {
                    Some((pi, next)) => {
                        l = self.run_len(pi) + 1;
                        v = next;
                    }
                    None => {
                        v = StateId::ROOT;
                        l = 0;
                    }
                }
            }

            best = best.max(l);
        }

        best
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Longest common contiguous run by dynamic programming.
    fn naive_longest_common_run(a: &[String], b: &[String]) -> usize {
        let mut best = 0;
        let mut prev = vec![0usize; b.len() + 1];
        for x in a {
            let mut row = vec![0usize; b.len() + 1];
            for (j, y) in b.iter().enumerate() {
                if x == y {
                    row[j + 1] = prev[j] + 1;
                    best = best.max(row[j + 1]);
                }
            }
            prev = row;
        }
        best
    }

    /// Sequences over a small alphabet so that repeats are common.
    fn tokens(max_len: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[A-E]", 0..max_len)
    }

    proptest! {
        #[test]
        fn agrees_with_naive(query in tokens(24), candidate in tokens(24)) {
            let vocab = Vocabulary::from_tokens(&query);
            let sa = SuffixAutomaton::from_symbols(query.iter().filter_map(|t| vocab.encode(t)));
            prop_assert_eq!(
                sa.longest_common_run(&candidate, &vocab),
                naive_longest_common_run(&query, &candidate)
            );
        }

        #[test]
        fn query_against_itself(query in tokens(32)) {
            let vocab = Vocabulary::from_tokens(&query);
            let sa = SuffixAutomaton::from_symbols(query.iter().filter_map(|t| vocab.encode(t)));
            prop_assert_eq!(sa.longest_common_run(&query, &vocab), query.len());
        }

        #[test]
        fn state_count_bound(query in tokens(40)) {
            let vocab = Vocabulary::from_tokens(&query);
            let sa = SuffixAutomaton::from_symbols(query.iter().filter_map(|t| vocab.encode(t)));
            prop_assert!(sa.state_count() <= (2 * query.len()).max(1));
        }
    }
}
