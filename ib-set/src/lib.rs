/*!
Match a haystack against a set of regular expressions in one pass, and find out which of them match.

## Features
- Patterns are registered one by one and keep their registration index as their identity.
- Three anchoring modes ([`Anchor`]):
  - Unanchored: a pattern may match anywhere.
  - Start: a pattern's first match must start at the start of the haystack.
  - Both: a pattern's first match must span the whole haystack.
- Raw byte haystacks.
- Pluggable [regex engines](engine), backed by [`regex-automata`](https://docs.rs/regex-automata/).
*/
//! ## Usage
//! ```
//! // cargo add ib-set
//! use ib_set::{Anchor, RegexSet};
//!
//! let mut set = RegexSet::new(Anchor::Both);
//! set.add(r"\d{4}-\d{2}-\d{2}")?;
//! set.add(r"[0-9-]+")?;
//! set.add(r"\w+")?;
//! set.compile()?;
//!
//! assert_eq!(set.matches("2010-03-14")?.as_slice(), &[0, 1]);
//! assert_eq!(set.matches("2010")?.as_slice(), &[1, 2]);
//! assert!(!set.is_match("2010-03-14 ")?);
//!
//! # Ok::<(), ib_set::Error>(())
//! ```
//!
//! ## Logging
//! Lifecycle misuse and build failures are reported through [`tracing`](https://docs.rs/tracing/)
//! in addition to the returned [`Error`]. Rejected candidates of anchored sets are logged at `trace` level.
//!
//! ## Crate features
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod engine;
mod error;
mod set;

pub use error::{Error, Result};
pub use set::{Anchor, RegexSet, SetMatches, SetMatchesIter};
