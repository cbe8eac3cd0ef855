//! Entity recognition and resolution
//!
//! [`patterns::EntityPatterns`] holds the rule families,
//! [`normalize`] supplies the shared name and role normalization,
//! [`registry::EntityRegistry`] snapshots known participants from the
//! store and resolves mentions against them, and
//! [`extractor::EntityExtractor`] runs the full pass over a text span
//! and emits best-effort speaker and stakeholder records.

pub mod extractor;
pub mod normalize;
pub mod patterns;
pub mod registry;

pub use extractor::{EntityExtractor, EntityMention, ExtractionResult};
pub use patterns::{EntityPatterns, MentionKind};
pub use registry::{EntityContext, EntityRegistry, ResolvedEntity};
