//! Shared types for the morfo morphological engine.
//!
//! This crate holds the vocabulary that the checking engine and its
//! collaborators (rule-table loader, dictionary backend, suggestion engine)
//! exchange: flag identifiers and flag sets, the textual flag codec,
//! dictionary entries and the lookup oracle trait, capitalization
//! classification, and the morphological-trace format.
//!
//! # Architecture
//!
//! - [`flags`] -- `FlagId` and the sorted [`flags::FlagSet`] with its
//!   small-set/large-set membership contract
//! - [`codec`] -- the four textual flag spellings (`char`, `long`, `num`,
//!   `UTF-8`)
//! - [`entry`] -- [`entry::WordEntry`], the [`entry::Lexicon`] oracle trait,
//!   and an in-memory reference implementation
//! - [`case`] -- capitalization pattern detection
//! - [`analysis`] -- morphological field tags and the trace accumulator

pub mod analysis;
pub mod case;
pub mod codec;
pub mod entry;
pub mod flags;
