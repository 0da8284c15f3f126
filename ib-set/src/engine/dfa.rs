use bon::Builder;
use regex_automata::{
    dfa::{self, dense, Automaton},
    nfa::thompson::{self, WhichCaptures},
    util::syntax,
    Input, MatchError, MatchKind, PatternSet, Span,
};

use super::{BoxError, Engine};

/// An [`Engine`] backed by fully compiled dense DFAs.
///
/// Searching is a plain table walk, but building is worst case exponential in
/// the size of the patterns, so this engine suits small and mostly-ASCII sets.
///
/// Unlike [`Meta`](super::Meta), a search can fail. For example, with
/// [`dense::Config::unicode_word_boundary`] enabled, every non-ASCII byte
/// makes the DFA quit, which is reported as
/// [`Error::MatchEngine`](crate::Error::MatchEngine):
/// ```
/// use ib_set::{engine::{dense, Dfa}, Anchor, Error, RegexSet};
///
/// let engine = Dfa::builder()
///     .dense(dense::Config::new().unicode_word_boundary(true))
///     .build();
/// let mut set = RegexSet::with_engine(Anchor::Unanchored, engine);
/// set.add(r"\bfoo\b")?;
/// set.compile()?;
/// assert!(set.is_match("a foo b")?);
/// assert!(matches!(set.is_match("é foo"), Err(Error::MatchEngine(_))));
///
/// # Ok::<(), ib_set::Error>(())
/// ```
#[derive(Builder, Clone, Debug)]
pub struct Dfa {
    /// Syntax options used when parsing every pattern.
    #[builder(default)]
    syntax: syntax::Config,
    /// Dense DFA options. The match kind is ignored: the combined DFA always
    /// uses [`MatchKind::All`] and single patterns always use
    /// [`MatchKind::LeftmostFirst`].
    #[builder(default)]
    dense: dense::Config,
}

impl Dfa {
    pub fn new() -> Self {
        Self::builder().build()
    }

    fn thompson() -> thompson::Config {
        // DFAs do not support captures
        thompson::Config::new().which_captures(WhichCaptures::None)
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Dfa {
    type Single = dfa::regex::Regex;
    type Combined = dense::DFA<Vec<u32>>;

    fn compile_single(&self, pattern: &str) -> Result<Self::Single, BoxError> {
        let re = dfa::regex::Regex::builder()
            .syntax(self.syntax)
            .thompson(Self::thompson())
            .dense(self.dense.clone().match_kind(MatchKind::LeftmostFirst))
            .build(pattern)?;
        Ok(re)
    }

    fn compile_combined(&self, patterns: &[String]) -> Result<Self::Combined, BoxError> {
        let dfa = dense::Builder::new()
            .configure(self.dense.clone().match_kind(MatchKind::All))
            .syntax(self.syntax)
            .thompson(Self::thompson())
            .build_many(patterns)?;
        Ok(dfa)
    }

    #[inline]
    fn combined_is_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        let input = Input::new(haystack).earliest(true);
        Ok(combined.try_search_fwd(&input)?.is_some())
    }

    #[inline]
    fn combined_which_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
        matches: &mut PatternSet,
    ) -> Result<(), MatchError> {
        combined.try_which_overlapping_matches(&Input::new(haystack), matches)
    }

    #[inline]
    fn find_first(
        &self,
        single: &Self::Single,
        haystack: &[u8],
    ) -> Result<Option<Span>, MatchError> {
        Ok(single.try_search(&Input::new(haystack))?.map(|m| m.span()))
    }
}
