use crate::domain::model::{EngineeredFeatures, ModelMetadata};
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// A loaded, read-only regression model. Implementations are shared across
/// request handlers, so inference must not mutate state.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &EngineeredFeatures) -> Result<f64>;

    fn metadata(&self) -> ModelMetadata;

    /// Importances declared by the training run, keyed by feature name.
    fn feature_importances(&self) -> BTreeMap<String, f64> {
        BTreeMap::new()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn max_water_binder_ratio(&self) -> f64;
    fn bind_address(&self) -> String;
}
