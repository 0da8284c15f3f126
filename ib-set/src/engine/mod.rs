/*!
Regex engines a [`RegexSet`](crate::RegexSet) can be built on.

A [`RegexSet`](crate::RegexSet) does not parse or execute regular expressions
by itself. It asks an [`Engine`] for five capabilities:
- compile one pattern,
- compile all patterns into one combined matcher,
- ask the combined matcher whether anything matches,
- ask the combined matcher which patterns match,
- find the first match span of one pattern.

Two engines are provided:
- [`Meta`]: backed by [`regex_automata::meta::Regex`]. The default.
- [`Dfa`]: backed by dense DFAs. Faster to search for small sets, but the build
  time and memory grow quickly with the set, and a search can fail. Requires
  feature `dfa`.

## Thread safety
A compiled set shares its engine handles between threads without any
synchronization of its own. Implementations must therefore support
concurrent read-only searches on `Single` and `Combined`, which the
`Send + Sync` bounds encode.
*/
use regex_automata::{MatchError, PatternSet, Span};

#[cfg(feature = "dfa")]
mod dfa;
mod meta;

#[cfg(feature = "dfa")]
pub use dfa::Dfa;
pub use meta::Meta;

#[cfg(feature = "dfa")]
pub use regex_automata::dfa::dense;
pub use regex_automata::util::syntax;

/// A type-erased engine build error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The capabilities a [`RegexSet`](crate::RegexSet) requires from a regex
/// engine.
pub trait Engine {
    /// A compiled single pattern.
    type Single: Send + Sync;
    /// A compiled set of patterns. Pattern `i` of the set must be reported as
    /// [`PatternID`](regex_automata::PatternID) `i`.
    type Combined: Send + Sync;

    fn compile_single(&self, pattern: &str) -> Result<Self::Single, BoxError>;

    fn compile_combined(&self, patterns: &[String]) -> Result<Self::Combined, BoxError>;

    /// Returns true if any pattern of the set matches anywhere in `haystack`.
    fn combined_is_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
    ) -> Result<bool, MatchError>;

    /// Inserts every pattern that matches anywhere in `haystack` into
    /// `matches`.
    ///
    /// `matches` is empty on entry and has a capacity of at least the number
    /// of patterns in `combined`.
    fn combined_which_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
        matches: &mut PatternSet,
    ) -> Result<(), MatchError>;

    /// Returns the span of the leftmost match of `single` in `haystack`.
    fn find_first(&self, single: &Self::Single, haystack: &[u8])
        -> Result<Option<Span>, MatchError>;
}
