//! Configuration loading and management for the segment engine.
//!
//! Engine options, labor codes and the CTE preference mapping are loaded from
//! YAML and passed into each run as immutable values.
//!
//! # Example
//!
//! ```no_run
//! use segment_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("REG code: {}", config.labor_codes().reg);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BucketPatterns, EngineConfig, LaborCodes, PreferenceMap, SegmentOptions, SignalField,
    TRANSIT_SUPERVISOR_SENTINEL, UncertaintySignal,
};
