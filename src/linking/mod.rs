//! Provision reference detection and linking
//!
//! The pipeline: [`patterns::ReferenceCatalog`] defines the rule
//! families, [`scanner::MentionScanner`] produces non-overlapping raw
//! mentions, [`resolver::ProvisionResolver`] maps each mention to a
//! canonical identifier with a calibrated confidence, and
//! [`orchestrator::DeliberationLinker`] drives the whole pass over a
//! meeting or resolution and persists the resulting edges.

pub mod orchestrator;
pub mod patterns;
pub mod resolver;
pub mod scanner;

pub use orchestrator::{DeliberationLinker, LinkResult, LinkSource, LinkType, LinkingReport};
pub use patterns::{ReferenceCatalog, ReferenceKind};
pub use resolver::{ProvisionIndex, ProvisionResolver};
pub use scanner::{MentionScanner, RawReference};
