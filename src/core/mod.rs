pub mod features;
pub mod predictor;
pub mod validator;

pub use crate::domain::model::{EngineeredFeatures, MixComposition, PredictionResult};
pub use crate::domain::ports::{ConfigProvider, Regressor};
pub use crate::utils::error::Result;
