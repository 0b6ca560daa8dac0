// Hazardscope: hazard classification and analytics for disaster request data
//
// This is the library root. Each module corresponds to a major subsystem
// of the pipeline, from fetching training data to serving predictions.

pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod status;
pub mod store;

#[cfg(feature = "web")]
pub mod web;
