//! Per-query token vocabulary.

use std::collections::HashMap;
use std::num::NonZeroU32;

/// Integer id of a station token within one [`Vocabulary`].
///
/// Ids start at 1; zero is never assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(NonZeroU32);

impl TokenId {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Maps each distinct token of a query to a [`TokenId`] in first-occurrence
/// order.
///
/// A vocabulary belongs to a single query and is dropped with it. Tokens are
/// trimmed before they are stored or looked up, matching how station names
/// are compared in the graph.
///
/// # Examples
///
/// ```
/// use metro_server::similarity::Vocabulary;
///
/// let vocab = Vocabulary::from_tokens(["Dwarka", "Janakpuri West", "Dwarka"]);
/// assert_eq!(vocab.len(), 2);
/// assert_eq!(vocab.encode("Dwarka").map(|t| t.get()), Some(1));
/// assert_eq!(vocab.encode("Janakpuri West").map(|t| t.get()), Some(2));
/// assert!(vocab.encode("Rajiv Chowk").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, TokenId>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary from a token sequence.
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut vocab = Self::new();
        for token in tokens {
            vocab.intern(token.as_ref());
        }
        vocab
    }

    /// Return the id for `token`, assigning the next one if it is new.
    pub fn intern(&mut self, token: &str) -> TokenId {
        let token = token.trim();
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let next = self.ids.len() as u32;
        let id = TokenId(NonZeroU32::MIN.saturating_add(next));
        self.ids.insert(token.to_string(), id);
        id
    }

    /// Look up a token without assigning.
    pub fn encode(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
