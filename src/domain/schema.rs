//! Boundary schema: the accepted domain range of every mix field.
//!
//! The schema only checks values that are present and numeric. Missing or
//! malformed fields are left to the input validator so the two checks stay
//! independent.

use crate::domain::model::{FieldKind, MixComposition, MixField};
use crate::utils::error::{Result, StrengthError};
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub field: MixField,
    pub kind: FieldKind,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    const fn new(field: MixField, kind: FieldKind, min: f64, max: f64) -> Self {
        Self {
            field,
            kind,
            min,
            max,
        }
    }

    /// 整數欄位也以 f64 比較，整數性由 InputValidator 檢查
    pub fn check(&self, value: f64) -> Result<()> {
        validate_range(self.field.name(), value, self.min, self.max)
    }
}

/// Partial override of one field's range, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

const DEFAULT_SPECS: [FieldSpec; 8] = [
    FieldSpec::new(MixField::Cement, FieldKind::Float, 102.0, 540.0),
    FieldSpec::new(MixField::BlastFurnaceSlag, FieldKind::Float, 0.0, 359.4),
    FieldSpec::new(MixField::FlyAsh, FieldKind::Float, 0.0, 200.1),
    FieldSpec::new(MixField::Water, FieldKind::Float, 121.75, 247.0),
    FieldSpec::new(MixField::Superplasticizer, FieldKind::Float, 0.0, 32.2),
    FieldSpec::new(MixField::CoarseAggregate, FieldKind::Float, 801.0, 1145.0),
    FieldSpec::new(MixField::FineAggregate, FieldKind::Float, 594.0, 992.6),
    FieldSpec::new(MixField::Age, FieldKind::Integer, 1.0, 365.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct MixSchema {
    specs: Vec<FieldSpec>,
}

impl Default for MixSchema {
    fn default() -> Self {
        Self {
            specs: DEFAULT_SPECS.to_vec(),
        }
    }
}

impl MixSchema {
    pub fn with_overrides(overrides: &HashMap<String, RangeOverride>) -> Result<Self> {
        let mut schema = Self::default();

        for (name, range) in overrides {
            let field = MixField::from_name(name).ok_or_else(|| {
                StrengthError::InvalidConfigValueError {
                    field: format!("schema.{}", name),
                    value: name.clone(),
                    reason: "Unknown mix field".to_string(),
                }
            })?;

            if let Some(spec) = schema.specs.iter_mut().find(|s| s.field == field) {
                if let Some(min) = range.min {
                    spec.min = min;
                }
                if let Some(max) = range.max {
                    spec.max = max;
                }
                if !(spec.min.is_finite() && spec.max.is_finite()) || spec.min > spec.max {
                    return Err(StrengthError::InvalidConfigValueError {
                        field: format!("schema.{}", name),
                        value: format!("{}..={}", spec.min, spec.max),
                        reason: "Range bounds must be finite with min <= max".to_string(),
                    });
                }
            }
        }

        Ok(schema)
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn spec(&self, field: MixField) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.field == field)
    }

    /// Range-checks the raw request body in fixed field order.
    pub fn check(&self, raw: &Map<String, Value>) -> Result<()> {
        for spec in &self.specs {
            if let Some(value) = spec.field.lookup(raw).and_then(Value::as_f64) {
                spec.check(value)?;
            }
        }
        Ok(())
    }

    pub fn check_mix(&self, mix: &MixComposition) -> Result<()> {
        for spec in &self.specs {
            spec.check(mix.get(spec.field))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_body() -> Map<String, Value> {
        json!({
            "cement": 540.0,
            "blast_furnace_slag": 0.0,
            "fly_ash": 0.0,
            "water": 162.0,
            "superplasticizer": 2.5,
            "coarse_aggregate": 1040.0,
            "fine_aggregate": 676.0,
            "age": 28
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_reference_mix_in_range() {
        assert!(MixSchema::default().check(&reference_body()).is_ok());
    }

    #[test]
    fn test_zero_cement_rejected_by_range() {
        let mut body = reference_body();
        body.insert("cement".to_string(), json!(0.0));

        let err = MixSchema::default().check(&body).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("cement"));
    }

    #[test]
    fn test_age_bounds() {
        let schema = MixSchema::default();
        let mut body = reference_body();

        body.insert("age".to_string(), json!(365));
        assert!(schema.check(&body).is_ok());

        body.insert("age".to_string(), json!(366));
        assert!(schema.check(&body).is_err());

        body.insert("age".to_string(), json!(0));
        assert!(schema.check(&body).is_err());
    }

    #[test]
    fn test_fractional_values_not_truncated() {
        let schema = MixSchema::default();
        let mut body = reference_body();

        body.insert("age".to_string(), json!(0.5));
        let err = schema.check(&body).unwrap_err();
        assert!(err.to_string().contains("got 0.5"));

        let mut overrides = HashMap::new();
        overrides.insert(
            "age".to_string(),
            RangeOverride {
                min: Some(1.5),
                max: None,
            },
        );
        let schema = MixSchema::with_overrides(&overrides).unwrap();
        body.insert("age".to_string(), json!(1));
        assert!(schema.check(&body).is_err());
        body.insert("age".to_string(), json!(2));
        assert!(schema.check(&body).is_ok());
    }

    #[test]
    fn test_missing_fields_left_to_validator() {
        let mut body = reference_body();
        body.remove("water");
        body.insert("fly_ash".to_string(), json!("lots"));

        assert!(MixSchema::default().check(&body).is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "cement".to_string(),
            RangeOverride {
                min: Some(50.0),
                max: None,
            },
        );

        let schema = MixSchema::with_overrides(&overrides).unwrap();
        let spec = schema.spec(MixField::Cement).unwrap();
        assert_eq!(spec.min, 50.0);
        assert_eq!(spec.max, 540.0);

        overrides.insert(
            "water".to_string(),
            RangeOverride {
                min: Some(300.0),
                max: Some(200.0),
            },
        );
        assert!(MixSchema::with_overrides(&overrides).is_err());

        let mut unknown = HashMap::new();
        unknown.insert("sand".to_string(), RangeOverride::default());
        assert!(MixSchema::with_overrides(&unknown).is_err());
    }
}
