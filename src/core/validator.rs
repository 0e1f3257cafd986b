use crate::domain::model::{MixComposition, MixField};
use crate::utils::error::{Result, StrengthError};
use serde_json::{Map, Value};

pub const DEFAULT_MAX_WATER_BINDER_RATIO: f64 = 1.0;

/// Checks presence and numeric type of the eight mix fields, plus the
/// water-to-binder plausibility rule. Domain ranges belong to `MixSchema`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputValidator {
    max_water_binder_ratio: Option<f64>,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self {
            max_water_binder_ratio: Some(DEFAULT_MAX_WATER_BINDER_RATIO),
        }
    }
}

impl InputValidator {
    pub fn new(max_water_binder_ratio: f64) -> Self {
        Self {
            max_water_binder_ratio: Some(max_water_binder_ratio),
        }
    }

    /// Disables the cross-field plausibility rule.
    pub fn without_ratio_check() -> Self {
        Self {
            max_water_binder_ratio: None,
        }
    }

    pub fn max_water_binder_ratio(&self) -> Option<f64> {
        self.max_water_binder_ratio
    }

    pub fn validate(&self, raw: &Map<String, Value>) -> Result<MixComposition> {
        // 依欄位順序逐一檢查存在與型別
        let mut values = [0.0_f64; 8];
        for (slot, field) in values.iter_mut().zip(MixField::ALL) {
            let value = field.lookup(raw).ok_or_else(|| {
                StrengthError::validation(
                    field.name(),
                    format!("Missing required field: {}", field.name()),
                )
            })?;
            *slot = value.as_f64().ok_or_else(|| {
                StrengthError::validation(
                    field.name(),
                    format!("Field {} must be numeric", field.name()),
                )
            })?;
        }

        let age = Self::whole_days(values[7])?;
        let mix = MixComposition {
            cement: values[0],
            blast_furnace_slag: values[1],
            fly_ash: values[2],
            water: values[3],
            superplasticizer: values[4],
            coarse_aggregate: values[5],
            fine_aggregate: values[6],
            age,
        };

        self.check_water_binder_ratio(&mix)?;
        Ok(mix)
    }

    pub fn check_water_binder_ratio(&self, mix: &MixComposition) -> Result<()> {
        let Some(limit) = self.max_water_binder_ratio else {
            return Ok(());
        };

        let total_binder = mix.total_binder();
        if total_binder > 0.0 {
            let ratio = mix.water / total_binder;
            if ratio > limit {
                return Err(StrengthError::validation(
                    MixField::Water.name(),
                    format!(
                        "Water-to-binder ratio seems unusually high ({:.3} > {:.3})",
                        ratio, limit
                    ),
                ));
            }
        }
        Ok(())
    }

    fn whole_days(value: f64) -> Result<u32> {
        if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
            return Err(StrengthError::validation(
                MixField::Age.name(),
                format!("Field age must be a whole number of days (got {})", value),
            ));
        }
        Ok(value as u32)
    }
}
