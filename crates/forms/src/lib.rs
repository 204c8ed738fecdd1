//! # Civic Forms
//!
//! Turns the block graph of a document-analysis job into labelled form fields.
//!
//! ## Architecture
//!
//! ```text
//! DocumentLocation (bucket, key)
//!     │
//!     ├──> DocumentAnalyzer::start_analysis  ──> job id
//!     │
//!     ├──> wait_for_analysis (bounded poll: interval, attempts, deadline)
//!     │      └─> Vec<Block>
//!     │
//!     └──> BlockGraph (petgraph)
//!            ├─ Nodes: blocks (KEY_VALUE_SET, WORD, SELECTION_ELEMENT, ...)
//!            ├─ Edges: VALUE and CHILD relationships, provider order kept
//!            └─ resolve() ──> ResolvedForm { label ──> values }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use civic_forms::{resolve_blocks, Block, EntityType, RelationshipType};
//!
//! let blocks = vec![
//!     Block::key_value_set("k", EntityType::Key)
//!         .with_relationship(RelationshipType::Value, ["v"])
//!         .with_relationship(RelationshipType::Child, ["w1"]),
//!     Block::key_value_set("v", EntityType::Value)
//!         .with_relationship(RelationshipType::Child, ["w2"]),
//!     Block::word("w1", "Name"),
//!     Block::word("w2", "Jane"),
//! ];
//! let form = resolve_blocks(&blocks)?;
//! assert_eq!(form.labels(), vec!["Name"]);
//! # Ok::<(), civic_forms::ResolveError>(())
//! ```

mod analyzer;
mod block;
mod error;
mod graph;
mod local;
mod poll;

pub use analyzer::{AnalysisPoll, DocumentAnalyzer, DocumentLocation, JobStatus};
pub use block::{Block, BlockType, EntityType, Relationship, RelationshipType, SelectionStatus};
pub use error::{AnalysisError, ResolveError, Result};
pub use graph::{resolve_blocks, BlockGraph, FormField, ResolvedForm, SELECTED_MARKER};
pub use local::LocalAnalyzer;
pub use poll::{analyze_document, wait_for_analysis, PollPolicy};
