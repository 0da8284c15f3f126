use bon::Builder;
use regex_automata::{
    meta,
    nfa::thompson::WhichCaptures,
    util::syntax,
    Input, MatchError, MatchKind, PatternSet, Span,
};

use super::{BoxError, Engine};

/// An [`Engine`] backed by [`regex_automata::meta::Regex`].
///
/// This is the engine used by [`RegexSet::new`](crate::RegexSet::new). It picks
/// the best available strategy (literal prefilters, lazy DFA, PikeVM, ...) for
/// each search and never fails at search time.
///
/// ## Example
/// ```
/// use ib_set::{engine::{syntax, Meta}, Anchor, RegexSet};
///
/// let engine = Meta::builder()
///     .syntax(syntax::Config::new().case_insensitive(true))
///     .build();
/// let mut set = RegexSet::with_engine(Anchor::Both, engine);
/// set.add("foo")?;
/// set.add("f.o")?;
/// set.compile()?;
/// assert_eq!(set.matches("FOO")?.as_slice(), &[0, 1]);
///
/// # Ok::<(), ib_set::Error>(())
/// ```
#[derive(Builder, Clone, Debug)]
pub struct Meta {
    /// Syntax options used when parsing every pattern.
    #[builder(default)]
    syntax: syntax::Config,
    /// Heap limit of a compiled NFA, for single patterns and the combined set.
    ///
    /// Defaults to the limit of [`meta::Config`].
    nfa_size_limit: Option<usize>,
    /// Heap limit of the NFA of the combined set only. Overrides
    /// `nfa_size_limit` for it.
    combined_nfa_size_limit: Option<usize>,
    /// Heap limit of fully compiled DFAs, if the meta engine decides to build
    /// any.
    dfa_size_limit: Option<usize>,
}

impl Meta {
    pub fn new() -> Self {
        Self::builder().build()
    }

    fn config(&self) -> meta::Config {
        let mut config = meta::Config::new();
        if let Some(limit) = self.nfa_size_limit {
            config = config.nfa_size_limit(Some(limit));
        }
        if let Some(limit) = self.dfa_size_limit {
            config = config.dfa_size_limit(Some(limit));
        }
        config
    }

    fn combined_config(&self) -> meta::Config {
        let mut config = self
            .config()
            // Overlapping searches report every pattern only with `All`
            .match_kind(MatchKind::All)
            // Spans of groups are never asked for
            .which_captures(WhichCaptures::Implicit);
        if let Some(limit) = self.combined_nfa_size_limit {
            config = config.nfa_size_limit(Some(limit));
        }
        config
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Meta {
    type Single = meta::Regex;
    type Combined = meta::Regex;

    fn compile_single(&self, pattern: &str) -> Result<Self::Single, BoxError> {
        let re = meta::Regex::builder()
            .configure(self.config())
            .syntax(self.syntax)
            .build(pattern)?;
        Ok(re)
    }

    fn compile_combined(&self, patterns: &[String]) -> Result<Self::Combined, BoxError> {
        let re = meta::Regex::builder()
            .configure(self.combined_config())
            .syntax(self.syntax)
            .build_many(patterns)?;
        Ok(re)
    }

    #[inline]
    fn combined_is_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        Ok(combined.is_match(Input::new(haystack)))
    }

    #[inline]
    fn combined_which_match(
        &self,
        combined: &Self::Combined,
        haystack: &[u8],
        matches: &mut PatternSet,
    ) -> Result<(), MatchError> {
        combined.which_overlapping_matches(&Input::new(haystack), matches);
        Ok(())
    }

    #[inline]
    fn find_first(
        &self,
        single: &Self::Single,
        haystack: &[u8],
    ) -> Result<Option<Span>, MatchError> {
        Ok(single.find(Input::new(haystack)).map(|m| m.span()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn which(engine: &Meta, patterns: &[&str], haystack: &str) -> Vec<usize> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        let combined = engine.compile_combined(&patterns).unwrap();
        let mut matches = PatternSet::new(patterns.len());
        engine
            .combined_which_match(&combined, haystack.as_bytes(), &mut matches)
            .unwrap();
        matches.iter().map(|pid| pid.as_usize()).collect()
    }

    #[test]
    fn single() {
        let engine = Meta::new();
        let re = engine.compile_single("b+").unwrap();
        assert_eq!(
            engine.find_first(&re, b"abbbc").unwrap(),
            Some(Span::from(1..4))
        );
        assert_eq!(engine.find_first(&re, b"ac").unwrap(), None);

        assert!(engine.compile_single("(").is_err());
        assert!(engine.compile_single("a{2,1}").is_err());
    }

    #[test]
    fn overlapping() {
        let engine = Meta::new();
        assert_eq!(which(&engine, &["a", "ab", "b", "c"], "ab"), vec![0, 1, 2]);
        assert_eq!(which(&engine, &["samwise", "sam"], "samwise"), vec![0, 1]);
        assert_eq!(which(&engine, &[r"\d+", r"[a-z]+"], "---"), Vec::<usize>::new());
    }

    #[test]
    fn is_match() {
        let engine = Meta::new();
        let combined = engine
            .compile_combined(&["foo".to_string(), "bar".to_string()])
            .unwrap();
        assert!(engine.combined_is_match(&combined, b"a bar").unwrap());
        assert!(!engine.combined_is_match(&combined, b"baz").unwrap());
    }

    #[test]
    fn empty() {
        let engine = Meta::new();
        let combined = engine.compile_combined(&[]).unwrap();
        assert!(!engine.combined_is_match(&combined, b"").unwrap());
        assert!(!engine.combined_is_match(&combined, b"abc").unwrap());
        assert_eq!(which(&engine, &[], "abc"), Vec::<usize>::new());
    }

    #[test]
    fn case() {
        let engine = Meta::builder()
            .syntax(syntax::Config::new().case_insensitive(true))
            .build();
        assert_eq!(which(&engine, &["δ", "x"], "Δ"), vec![0]);
    }

    #[test]
    fn size_limit() {
        let engine = Meta::builder().combined_nfa_size_limit(1).build();
        assert!(engine.compile_single(r"[a-z]+\d").is_ok());
        assert!(engine
            .compile_combined(&[r"[a-z]+\d".to_string(), r"\w+".to_string()])
            .is_err());

        let engine = Meta::builder().nfa_size_limit(1).build();
        assert!(engine.compile_single(r"[a-z]+\d").is_err());
    }
}
