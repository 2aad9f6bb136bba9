//! # TELOS Common Library
//!
//! Shared code for the TELOS coaching engine:
//! - Questionnaire data model (TelosData and its sections)
//! - Persisted questionnaire store with explicit load/save boundaries
//! - Static problem catalog
//! - Section flow progression and coaching prompts
//! - Event types (TelosEvent enum) and EventBus
//! - Configuration loading and data folder resolution

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use events::{EventBus, TelosEvent};
pub use model::{TelosData, TelosSection};
pub use store::TelosStore;
