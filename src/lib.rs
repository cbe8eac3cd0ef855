//! reglink - deliberation-to-regulation linking
//!
//! Connects deliberation records (meeting minutes, agenda items,
//! resolutions) to the regulatory provisions and participants they
//! mention. Rule-based reference scanning finds provision citations
//! ("Article 6(1)(a)", "Regulation 2016/679") and entity mentions
//! ("The representative of France"), resolves them against a triple
//! store, and persists typed graph edges with calibrated confidence
//! scores.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reglink::{DeliberationLinker, MemoryStore, Meeting};
//!
//! let mut store = MemoryStore::new();
//! let linker = DeliberationLinker::new(&store, "https://reglink.dev/reg/2024/1#");
//! let mut meeting = Meeting {
//!     uri: "meeting:42".to_string(),
//!     ..Default::default()
//! };
//! let report = linker.link_meeting_to_regulations(&mut meeting, &mut store)?;
//! println!("{} references, {} resolved", report.total_references, report.resolved_count);
//! # Ok::<(), reglink::LinkError>(())
//! ```

pub mod entity;
pub mod error;
pub mod linking;
pub mod model;
pub mod store;

pub use entity::{
    EntityContext, EntityExtractor, EntityMention, EntityRegistry, ExtractionResult, MentionKind,
    ResolvedEntity,
};
pub use error::{LinkError, Result};
pub use linking::{
    DeliberationLinker, LinkResult, LinkSource, LinkType, LinkingReport, MentionScanner,
    ProvisionIndex, ProvisionResolver, RawReference, ReferenceCatalog, ReferenceKind,
};
pub use model::{
    AgendaItem, AgendaItemOutcome, Decision, Intervention, Meeting, MeetingStatus, Motion,
    OperativeClause, Recital, Resolution, RoleAssignment, Speaker, Stakeholder, StakeholderType,
};
pub use store::{vocab, MemoryStore, Triple, TripleStore};
