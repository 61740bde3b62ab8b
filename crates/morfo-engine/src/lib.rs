//! Affix-indexed word validator and compound segmenter.
//!
//! Given a dictionary of stems (reached through the [`morfo_core::entry::Lexicon`]
//! oracle), a table of prefix/suffix rules, and a flag grammar, this crate
//! decides whether a word is a legal inflected or compounded form and which
//! stem and affix chain produced it. It is the validity oracle that a
//! suggestion engine or a request-level spelling API calls many times per
//! word; everything here is allocation-light, synchronous, and safe to share
//! read-only across threads once built.
//!
//! # Architecture
//!
//! - [`condition`] -- character-class patterns anchored at the affix boundary
//! - [`rules`] -- the immutable affix rule model, global options, and the
//!   [`rules::AffixData`] bundle built once at load time
//! - [`index`] -- per-direction search structure with subset-pruning links
//! - [`checker`] -- the recursive affix-stripping validator
//!   (`prefix_check` / `suffix_check` / `affix_check` and the twofold
//!   variants)
//! - [`morph`] -- trace-accumulating variants of the validator
//! - [`compound`] -- the compound segmenter, its rule-grammar matcher, and
//!   the pluggable language heuristic hooks
//!
//! Negative outcomes (no rule matches, dictionary miss, condition failure,
//! deadline elapsed) are `None`/`false`, never errors: they occur on the
//! overwhelming majority of calls. The only fallible step is construction.

pub mod checker;
pub mod compound;
pub mod condition;
pub mod index;
pub mod morph;
pub mod rules;

use condition::ConditionError;
use morfo_core::codec::FlagError;

/// Errors detected while building the engine's tables. Checking itself
/// never fails; a malformed table must be rejected here, before any word is
/// looked at.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("affix index traversal link does not advance (construction bug)")]
    IndexCycle,
    #[error(transparent)]
    Condition(#[from] ConditionError),
    #[error(transparent)]
    Flag(#[from] FlagError),
}
