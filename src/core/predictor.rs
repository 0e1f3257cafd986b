use crate::adapters::ArtifactModel;
use crate::core::features::FeatureEngineer;
use crate::core::validator::InputValidator;
use crate::core::{ConfigProvider, Regressor};
use crate::domain::model::{
    EngineeredFeatures, Explanation, MixComposition, ModelMetadata, PredictionResult,
    STATUS_SUCCESS, STRENGTH_UNITS,
};
use crate::utils::error::Result;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Runs validation, feature engineering and the model call for one mix.
///
/// Built once by the entry point and shared with the HTTP layer. The model
/// is behind an `Arc` and only ever read.
#[derive(Clone)]
pub struct StrengthPredictor {
    validator: InputValidator,
    engineer: FeatureEngineer,
    model: Arc<dyn Regressor>,
}

impl StrengthPredictor {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self {
            validator: InputValidator::default(),
            engineer: FeatureEngineer::new(),
            model,
        }
    }

    /// Loads the model artifact named by the configuration. Fails fast so
    /// the caller never serves traffic without a model.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let model = ArtifactModel::load(config.model_path())?;
        Ok(Self::new(Arc::new(model))
            .with_validator(InputValidator::new(config.max_water_binder_ratio())))
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    pub fn predict(&self, raw: &Map<String, Value>) -> Result<PredictionResult> {
        let started = Instant::now();
        let mix = self.validator.validate(raw)?;
        let features = self.engineer.engineer(&mix)?;
        let result = self.run_model(&features)?;

        tracing::info!(
            event = "prediction_made",
            predicted_strength = result.predicted_strength,
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            model_version = %result.model_version,
            "Prediction successful: {:.2} MPa",
            result.predicted_strength
        );
        Ok(result)
    }

    /// Predicts for an already-typed mix; only the ratio plausibility rule
    /// of the validator applies.
    pub fn predict_mix(&self, mix: &MixComposition) -> Result<PredictionResult> {
        self.validator.check_water_binder_ratio(mix)?;
        let features = self.engineer.engineer(mix)?;
        self.run_model(&features)
    }

    pub fn explain(&self, raw: &Map<String, Value>) -> Result<Explanation> {
        let result = self.predict(raw)?;
        let feature_importance = self.model.feature_importances();
        let message = if feature_importance.is_empty() {
            format!(
                "{} does not declare feature importances",
                self.model.metadata().model_type
            )
        } else {
            format!(
                "Feature importance based on {} model",
                self.model.metadata().model_type
            )
        };

        Ok(Explanation {
            predicted_strength: result.predicted_strength,
            feature_importance,
            message,
        })
    }

    pub fn metadata(&self) -> ModelMetadata {
        self.model.metadata()
    }

    fn run_model(&self, features: &EngineeredFeatures) -> Result<PredictionResult> {
        let prediction = self.model.predict(features).inspect_err(|e| {
            tracing::error!(error = %e, "Prediction error");
        })?;

        Ok(PredictionResult {
            predicted_strength: prediction,
            units: STRENGTH_UNITS.to_string(),
            model_version: self.model.metadata().model_version,
            features_used: EngineeredFeatures::names(),
            status: STATUS_SUCCESS.to_string(),
        })
    }
}
