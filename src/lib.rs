pub mod adapters;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::ServeArgs;
pub use config::ServiceConfig;

pub use adapters::ArtifactModel;
pub use client::StrengthClient;
pub use crate::core::{features::FeatureEngineer, predictor::StrengthPredictor, validator::InputValidator};
pub use domain::model::{EngineeredFeatures, MixComposition, PredictionResult};
pub use domain::schema::MixSchema;
pub use utils::error::{Result, StrengthError};
