//! # Civic Agent
//!
//! Action-group backend of the municipal assistant: garbage collection, park
//! reservations and citizen forms.
//!
//! ## Architecture
//!
//! ```text
//! ActionEvent ──> FunctionCall::from_event ──> Agent::call ──> handlers::{garbage, parks, forms}
//!                                                   │
//!                                                   └──> Records ──> dyn KvStore
//!
//! S3Event ──> Agent::ingest ──> analyze_document (dyn DocumentAnalyzer, bounded poll)
//!                                   └──> template + one field per resolved label
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use civic_agent::Agent;
//! use civic_protocol::ActionEvent;
//! use civic_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let agent = Agent::new(Arc::new(MemoryStore::new()));
//! let event = ActionEvent::new("garbage", "get_garbage_pickup_day")
//!     .with_parameter("district_id", "A1");
//! let response = agent.handle_event(&event).await;
//! println!("{}", response.body());
//! # }
//! ```

mod agent;
pub mod config;
mod error;
pub mod handlers;
mod ingest;
pub mod sample_data;

pub use agent::Agent;
pub use config::{AgentConfig, AnalyzerKind, Backend};
pub use error::{AgentError, Result};
pub use ingest::{IngestReport, IngestedDocument};
pub use sample_data::{seed, SeedReport};
