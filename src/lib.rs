//! Driver for the MESSAGE and MACRO energy-systems models on GAMS.
//!
//! The heavy lifting happens in external systems: scenario storage and
//! versioning on one side, the optimization itself on the other. This crate
//! provides the glue between them: the schema items the models add to the
//! platform's base schema, the mapping from "solve this scenario" onto GAMS
//! invocations and solver option files, and detection of the installed
//! engine release.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod platform;
pub mod schema;
pub mod telemetry;

pub use config::Config;
pub use engine::{GamsEngine, GamsVersion};
pub use error::ModelError;
pub use model::{GamsModel, ModelOptions, ModelVariant, RunSummary, SolverOptions};
pub use platform::{initialize_items, ItemSpec, ItemType, MemoryScenario, Scenario};
