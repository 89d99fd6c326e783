//! Provider-side ingestion: mapping data and the normalization flow.
//!
//! # Overview
//!
//! This crate turns one raw provider payload into one `NormalizedEvent`.
//! Everything provider-specific lives in per-provider mapping modules; the
//! flow itself is provider-agnostic and driven entirely by the mapping it
//! looks up.
//!
//! # Flow
//!
//! ```text
//! (provider, payload) → validate → extract paths → translate → assemble
//! ```
//!
//! # Invariants
//!
//! - Normalization is pure: no clocks beyond the event's own timestamp, no
//!   I/O, no mutation of the input payload.
//! - The first violated rule decides the error; rule order is fixed.
//! - Adding a provider touches only its mapping module and the registry.

pub mod aws;
pub mod azure;
pub mod gcp;
pub mod normalizer;
pub mod registry;
pub mod translate;
pub mod validate;

pub use normalizer::normalize;
pub use registry::{all_mappings, mapping_for, ProviderMapping};
pub use translate::{Translation, TranslationTier};
