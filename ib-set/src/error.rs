use regex_automata::MatchError;

use crate::engine::BoxError;

/// An error reported by a [`RegexSet`](crate::RegexSet).
///
/// Only [`Error::PatternSyntax`] is recoverable on the same set. The other
/// variants either report a misuse of the set's lifecycle or leave the set
/// permanently unusable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pattern passed to [`RegexSet::add`](crate::RegexSet::add) could not
    /// be compiled by the engine.
    ///
    /// No index is consumed. The next successful registration receives the
    /// index this pattern would have had.
    #[error("invalid pattern `{pattern}`: {source}")]
    PatternSyntax {
        pattern: String,
        #[source]
        source: BoxError,
    },

    /// [`RegexSet::compile`](crate::RegexSet::compile) was already called, or
    /// a pattern was added after it.
    #[error("regex set has already been compiled")]
    AlreadyFinalized,

    /// The engine could not compile the patterns as a whole.
    ///
    /// The set is left in the failed state and must be discarded.
    #[error("failed to compile regex set: {source}")]
    SetCompilation {
        #[source]
        source: BoxError,
    },

    /// A search was attempted on a set that is not compiled.
    #[error("regex set is not compiled")]
    NotCompiled,

    /// The engine gave up during a search.
    ///
    /// This is never the same as "no pattern matched".
    #[error("regex set search failed: {0}")]
    MatchEngine(#[from] MatchError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    /// The engine's diagnostic for a build failure, if this is one.
    pub fn diagnostic(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::PatternSyntax { source, .. } | Error::SetCompilation { source } => {
                Some(&**source)
            }
            _ => None,
        }
    }
}
