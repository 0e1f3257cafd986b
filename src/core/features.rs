use crate::domain::model::{EngineeredFeatures, MixComposition};
use crate::utils::error::{Result, StrengthError};

/// Denominators at or below this are treated as zero.
const MIN_DENOMINATOR: f64 = 1e-9;

/// Derives total binder and the two ratio features from a validated mix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    pub fn engineer(&self, mix: &MixComposition) -> Result<EngineeredFeatures> {
        let total_binder = mix.cement + mix.blast_furnace_slag + mix.fly_ash;
        if !total_binder.is_finite() {
            return Err(StrengthError::feature(
                "total_binder",
                format!("binder sum is not finite ({})", total_binder),
            ));
        }

        let water_binder_ratio = Self::ratio(
            "water_binder_ratio",
            mix.water,
            total_binder,
            "total binder (cement + slag + fly ash)",
        )?;

        let aggregate_cement_ratio = Self::ratio(
            "aggregate_cement_ratio",
            mix.coarse_aggregate + mix.fine_aggregate,
            mix.cement,
            "cement",
        )?;

        tracing::debug!(
            total_binder,
            water_binder_ratio,
            aggregate_cement_ratio,
            "Engineered features"
        );

        Ok(EngineeredFeatures::new(
            *mix,
            total_binder,
            water_binder_ratio,
            aggregate_cement_ratio,
        ))
    }

    fn ratio(feature: &str, numerator: f64, denominator: f64, denominator_name: &str) -> Result<f64> {
        // NaN 也會落入這個分支
        if !(denominator > MIN_DENOMINATOR) {
            return Err(StrengthError::feature(
                feature,
                format!(
                    "{} must be positive to compute the ratio (got {})",
                    denominator_name, denominator
                ),
            ));
        }

        let value = numerator / denominator;
        if !value.is_finite() {
            return Err(StrengthError::feature(
                feature,
                format!("ratio is not finite ({} / {})", numerator, denominator),
            ));
        }
        Ok(value)
    }
}
