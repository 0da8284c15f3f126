use std::{
    fmt, mem,
    panic::{RefUnwindSafe, UnwindSafe},
    slice,
};

use regex_automata::{util::pool::Pool, PatternSet, Span};
use tracing::{debug, trace, warn};

use crate::{
    engine::{Engine, Meta},
    Error, Result,
};

/// Which part of a haystack a pattern must cover to be reported by a
/// [`RegexSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The pattern may match anywhere in the haystack.
    #[default]
    Unanchored,
    /// The first match of the pattern must start at the start of the haystack.
    Start,
    /// The first match of the pattern must span the whole haystack.
    Both,
}

impl Anchor {
    /// The combined matcher only knows which patterns match somewhere, so
    /// anchored sets need a second, per-pattern pass to check the spans.
    #[inline]
    fn needs_verification(self) -> bool {
        self != Anchor::Unanchored
    }

    #[inline]
    fn accepts(self, span: Span, haystack_len: usize) -> bool {
        match self {
            Anchor::Unanchored => true,
            Anchor::Start => span.start == 0,
            Anchor::Both => span.start == 0 && span.end == haystack_len,
        }
    }
}

type ScratchFn = Box<dyn Fn() -> PatternSet + Send + Sync + UnwindSafe + RefUnwindSafe>;

enum State<C> {
    Building,
    Compiled {
        combined: C,
        /// Candidate buffers, sized to the pattern count at compile time.
        scratch: Pool<PatternSet, ScratchFn>,
    },
    Failed,
}

/// A set of regular expressions matched against a haystack in one pass,
/// reporting which of them match.
///
/// A `RegexSet` goes through three stages:
/// 1. Patterns are registered with [`RegexSet::add`]. Each successful call
///    returns the pattern's index, starting at `0`.
/// 2. [`RegexSet::compile`] combines all patterns into one matcher. It can only
///    be called once, and no pattern can be added afterwards.
/// 3. [`RegexSet::is_match`] and [`RegexSet::matches`] search haystacks.
///
/// ## Example
/// ```
/// use ib_set::{Anchor, RegexSet};
///
/// let mut set = RegexSet::new(Anchor::Unanchored);
/// assert_eq!(set.add("foo")?, 0);
/// assert_eq!(set.add("bar")?, 1);
/// set.compile()?;
///
/// assert!(set.is_match("a foo b")?);
/// assert_eq!(set.matches("a foo b")?.as_slice(), &[0]);
/// assert_eq!(set.matches("foobar")?.as_slice(), &[0, 1]);
///
/// # Ok::<(), ib_set::Error>(())
/// ```
///
/// ## Anchoring
/// With [`Anchor::Start`] and [`Anchor::Both`], the patterns that match
/// somewhere are only candidates. Each candidate is then searched for alone,
/// and it is kept only if its first match starts at offset `0` (`Start`) or
/// covers the whole haystack (`Both`):
/// ```
/// use ib_set::{Anchor, RegexSet};
///
/// let mut set = RegexSet::new(Anchor::Both);
/// set.add("abc")?;
/// set.add("a.*c")?;
/// set.compile()?;
///
/// assert_eq!(set.matches("abc")?.as_slice(), &[0, 1]);
/// assert!(set.matches("xabc")?.is_empty());
///
/// # Ok::<(), ib_set::Error>(())
/// ```
/// Note that only the first (leftmost-first) match of a pattern is checked.
/// For example, `a|ab` is not reported for `ab` under [`Anchor::Both`], because
/// its first match is `a`.
///
/// ## Synchronization
/// Searching only needs `&self`. A compiled `RegexSet` can be shared between
/// threads, and concurrent searches are safe as long as the engine's handles
/// support concurrent reads, which [`Engine`] requires.
pub struct RegexSet<E: Engine = Meta> {
    engine: E,
    anchor: Anchor,
    patterns: Vec<String>,
    /// Single-pattern matchers from registration, kept only for anchored sets.
    verifiers: Vec<E::Single>,
    state: State<E::Combined>,
}

impl RegexSet {
    /// Creates an empty set using the default [`Meta`] engine.
    pub fn new(anchor: Anchor) -> Self {
        Self::with_engine(anchor, Meta::new())
    }
}

impl<E: Engine> RegexSet<E> {
    /// Creates an empty set using the given engine.
    pub fn with_engine(anchor: Anchor, engine: E) -> Self {
        Self {
            engine,
            anchor,
            patterns: Vec::new(),
            verifiers: Vec::new(),
            state: State::Building,
        }
    }

    /// Registers a pattern and returns its index.
    ///
    /// The pattern is compiled alone to check it. If that fails,
    /// [`Error::PatternSyntax`] is returned and the set is left unchanged, so
    /// the next successful registration gets the same index.
    ///
    /// Returns [`Error::AlreadyFinalized`] after [`RegexSet::compile`].
    ///
    /// ## Example
    /// ```
    /// use ib_set::{Anchor, Error, RegexSet};
    ///
    /// let mut set = RegexSet::new(Anchor::Unanchored);
    /// assert_eq!(set.add("a+")?, 0);
    /// assert!(matches!(set.add("(a"), Err(Error::PatternSyntax { .. })));
    /// assert_eq!(set.add("b+")?, 1);
    /// assert_eq!(set.patterns(), ["a+", "b+"]);
    ///
    /// # Ok::<(), ib_set::Error>(())
    /// ```
    pub fn add(&mut self, pattern: &str) -> Result<usize> {
        if !matches!(self.state, State::Building) {
            warn!(pattern, "pattern added to a compiled regex set");
            return Err(Error::AlreadyFinalized);
        }

        let single = match self.engine.compile_single(pattern) {
            Ok(single) => single,
            Err(source) => {
                debug!(pattern, error = %source, "invalid pattern");
                return Err(Error::PatternSyntax {
                    pattern: pattern.to_owned(),
                    source,
                });
            }
        };

        let index = self.patterns.len();
        self.patterns.push(pattern.to_owned());
        if self.anchor.needs_verification() {
            self.verifiers.push(single);
        }
        Ok(index)
    }

    /// Compiles all registered patterns into one matcher.
    ///
    /// This can be attempted only once. Further calls return
    /// [`Error::AlreadyFinalized`] and do nothing, whether the first call
    /// succeeded or not. If the engine fails, [`Error::SetCompilation`] is
    /// returned and the set can no longer be used.
    pub fn compile(&mut self) -> Result<()> {
        if !matches!(self.state, State::Building) {
            warn!("regex set compiled more than once");
            return Err(Error::AlreadyFinalized);
        }

        match self.engine.compile_combined(&self.patterns) {
            Ok(combined) => {
                let len = self.patterns.len();
                let create: ScratchFn = Box::new(move || PatternSet::new(len));
                self.state = State::Compiled {
                    combined,
                    scratch: Pool::new(create),
                };
                debug!(patterns = len, anchor = ?self.anchor, "compiled regex set");
                Ok(())
            }
            Err(source) => {
                self.state = State::Failed;
                self.verifiers = Vec::new();
                warn!(error = %source, "failed to compile regex set");
                Err(Error::SetCompilation { source })
            }
        }
    }

    /// Returns true if any pattern matches `haystack` under the set's
    /// [`Anchor`].
    ///
    /// Returns [`Error::NotCompiled`] if the set is not compiled, and
    /// [`Error::MatchEngine`] if the engine fails.
    pub fn is_match<H: AsRef<[u8]>>(&self, haystack: H) -> Result<bool> {
        let haystack = haystack.as_ref();
        let (combined, scratch) = self.compiled()?;

        if !self.anchor.needs_verification() {
            return Ok(self.engine.combined_is_match(combined, haystack)?);
        }

        let mut candidates = scratch.get();
        candidates.clear();
        self.engine
            .combined_which_match(combined, haystack, &mut candidates)?;
        for pid in candidates.iter() {
            if self.verify(pid.as_usize(), haystack)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns the indices of all patterns that match `haystack` under the
    /// set's [`Anchor`], in ascending order.
    ///
    /// Returns [`Error::NotCompiled`] if the set is not compiled, and
    /// [`Error::MatchEngine`] if the engine fails.
    ///
    /// ## Example
    /// ```
    /// use ib_set::{Anchor, RegexSet};
    ///
    /// let mut set = RegexSet::new(Anchor::Start);
    /// set.add("abc")?;
    /// set.add("b")?;
    /// set.add("a")?;
    /// set.compile()?;
    ///
    /// let matches = set.matches("abcd")?;
    /// assert_eq!(matches.as_slice(), &[0, 2]);
    /// assert!(!matches.matched(1));
    ///
    /// # Ok::<(), ib_set::Error>(())
    /// ```
    pub fn matches<H: AsRef<[u8]>>(&self, haystack: H) -> Result<SetMatches> {
        let haystack = haystack.as_ref();
        let (combined, scratch) = self.compiled()?;

        let mut candidates = scratch.get();
        candidates.clear();
        self.engine
            .combined_which_match(combined, haystack, &mut candidates)?;

        let mut matches = Vec::with_capacity(candidates.len());
        for pid in candidates.iter() {
            let index = pid.as_usize();
            if !self.anchor.needs_verification() || self.verify(index, haystack)? {
                matches.push(index);
            }
        }
        Ok(SetMatches { matches })
    }

    fn compiled(&self) -> Result<(&E::Combined, &Pool<PatternSet, ScratchFn>)> {
        match &self.state {
            State::Compiled { combined, scratch } => Ok((combined, scratch)),
            _ => {
                warn!("regex set searched before compiling");
                Err(Error::NotCompiled)
            }
        }
    }

    fn verify(&self, index: usize, haystack: &[u8]) -> Result<bool> {
        let first = self.engine.find_first(&self.verifiers[index], haystack)?;
        let verified = first.is_some_and(|span| self.anchor.accepts(span, haystack.len()));
        if !verified {
            trace!(index, ?first, "candidate rejected by anchor");
        }
        Ok(verified)
    }

    /// Moves the set out, leaving `self` failed and empty.
    ///
    /// Unlike [`mem::take`], the set left behind cannot be reused: adding
    /// returns [`Error::AlreadyFinalized`] and searching returns
    /// [`Error::NotCompiled`].
    pub fn take(&mut self) -> Self
    where
        E: Clone,
    {
        let poisoned = Self {
            engine: self.engine.clone(),
            anchor: self.anchor,
            patterns: Vec::new(),
            verifiers: Vec::new(),
            state: State::Failed,
        };
        mem::replace(self, poisoned)
    }

    /// The number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The registered patterns, in index order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self.state, State::Compiled { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }
}

impl<E: Engine> fmt::Debug for RegexSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Building => "Building",
            State::Compiled { .. } => "Compiled",
            State::Failed => "Failed",
        };
        f.debug_struct("RegexSet")
            .field("anchor", &self.anchor)
            .field("patterns", &self.patterns)
            .field("state", &state)
            .finish()
    }
}

/// The indices of the patterns of a [`RegexSet`] that matched a haystack, in
/// ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetMatches {
    matches: Vec<usize>,
}

impl SetMatches {
    pub fn matched_any(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Whether the pattern at `index` matched.
    pub fn matched(&self, index: usize) -> bool {
        self.matches.binary_search(&index).is_ok()
    }

    /// The number of patterns that matched.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.matches
    }

    pub fn iter(&self) -> SetMatchesIter<'_> {
        SetMatchesIter(self.matches.iter())
    }
}

impl From<SetMatches> for Vec<usize> {
    fn from(matches: SetMatches) -> Self {
        matches.matches
    }
}

impl IntoIterator for SetMatches {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a SetMatches {
    type Item = usize;
    type IntoIter = SetMatchesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the indices in [`SetMatches`].
#[derive(Clone, Debug)]
pub struct SetMatchesIter<'a>(slice::Iter<'a, usize>);

impl Iterator for SetMatchesIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.0.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for SetMatchesIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<usize> {
        self.0.next_back().copied()
    }
}

impl ExactSizeIterator for SetMatchesIter<'_> {}
