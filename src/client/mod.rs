//! Client for the prediction API, used by the `strength-client` dashboard.

use crate::domain::model::{Explanation, HealthStatus, MixComposition, ModelMetadata, PredictionResult};
use crate::utils::error::{Result, StrengthError};
use crate::utils::validation::validate_url;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Status checks should answer quickly; predictions may hit a cold start.
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const PREDICT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct StrengthClient {
    base_url: String,
    client: Client,
}

impl StrengthClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("api_url", base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn metadata(&self) -> Result<ModelMetadata> {
        let response = self
            .client
            .get(self.url("/metadata"))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn predict(&self, mix: &MixComposition) -> Result<PredictionResult> {
        tracing::debug!("Requesting prediction from {}", self.base_url);
        let response = self
            .client
            .post(self.url("/predict"))
            .timeout(PREDICT_TIMEOUT)
            .json(&mix.to_json_map())
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn explain(&self, mix: &MixComposition) -> Result<Explanation> {
        let response = self
            .client
            .post(self.url("/explain"))
            .timeout(PREDICT_TIMEOUT)
            .json(&mix.to_json_map())
            .send()
            .await?;
        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        // 伺服器錯誤格式: {"error": true, "message": "..."}
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        Err(StrengthError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        })
    }
}

/// European strength class bands used to describe a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthClass {
    VeryLow,
    Low,
    Moderate,
    Standard,
    High,
    VeryHigh,
    UltraHigh,
}

impl StrengthClass {
    pub fn classify(strength_mpa: f64) -> Self {
        match strength_mpa {
            s if s < 20.0 => StrengthClass::VeryLow,
            s if s < 25.0 => StrengthClass::Low,
            s if s < 30.0 => StrengthClass::Moderate,
            s if s < 40.0 => StrengthClass::Standard,
            s if s < 50.0 => StrengthClass::High,
            s if s < 60.0 => StrengthClass::VeryHigh,
            _ => StrengthClass::UltraHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthClass::VeryLow => "Very Low Strength Concrete (C12/15)",
            StrengthClass::Low => "Low Strength Concrete (C16/20)",
            StrengthClass::Moderate => "Moderate Strength Concrete (C25/30)",
            StrengthClass::Standard => "Standard Strength Concrete (C30/37)",
            StrengthClass::High => "High Strength Concrete (C40/50)",
            StrengthClass::VeryHigh => "Very High Strength Concrete (C50/60)",
            StrengthClass::UltraHigh => "Ultra High Strength Concrete (C60/75+)",
        }
    }

    pub fn typical_use(&self) -> &'static str {
        match self {
            StrengthClass::VeryLow => "Non-structural applications",
            StrengthClass::Low => "Foundations and mass concrete",
            StrengthClass::Moderate => "General purpose construction",
            StrengthClass::Standard => "Reinforced concrete structures",
            StrengthClass::High => "Pre-stressed concrete, high-rise buildings",
            StrengthClass::VeryHigh => "Special structures, bridges",
            StrengthClass::UltraHigh => "High-performance structures",
        }
    }
}

/// Mix design guidance shown next to a prediction. Warnings flag choices
/// likely to hurt strength or durability; notes are informational.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixAdvice {
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

pub fn advise(mix: &MixComposition) -> MixAdvice {
    let mut advice = MixAdvice::default();

    let water_cement_ratio = if mix.cement > 0.0 {
        mix.water / mix.cement
    } else {
        0.0
    };
    if water_cement_ratio > 0.7 {
        advice
            .warnings
            .push("High water-cement ratio may significantly reduce strength and durability".to_string());
    } else if water_cement_ratio > 0.6 {
        advice
            .warnings
            .push("Moderate water-cement ratio, consider reducing it for higher strength".to_string());
    } else if water_cement_ratio < 0.3 {
        advice
            .warnings
            .push("Very low water-cement ratio may affect workability".to_string());
    } else {
        advice.notes.push("Water-cement ratio within the usual range".to_string());
    }

    if mix.age < 3 {
        advice
            .notes
            .push("Very early age, strength will develop significantly over time".to_string());
    } else if mix.age < 7 {
        advice
            .notes
            .push("Early age concrete typically reaches ~65% of 28-day strength".to_string());
    } else if mix.age < 28 {
        advice
            .notes
            .push("Concrete typically reaches ~90% of 28-day strength at 14 days".to_string());
    }

    if mix.cement < 250.0 {
        advice
            .warnings
            .push("Low cement content may result in lower strength and durability".to_string());
    } else if mix.cement > 500.0 {
        advice
            .notes
            .push("High cement content, consider supplementary cementitious materials".to_string());
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix() -> MixComposition {
        MixComposition {
            cement: 540.0,
            blast_furnace_slag: 0.0,
            fly_ash: 0.0,
            water: 162.0,
            superplasticizer: 2.5,
            coarse_aggregate: 1040.0,
            fine_aggregate: 676.0,
            age: 28,
        }
    }

    #[test]
    fn test_classify_band_edges() {
        assert_eq!(StrengthClass::classify(19.9), StrengthClass::VeryLow);
        assert_eq!(StrengthClass::classify(20.0), StrengthClass::Low);
        assert_eq!(StrengthClass::classify(35.0), StrengthClass::Standard);
        assert_eq!(StrengthClass::classify(79.9), StrengthClass::UltraHigh);
    }

    #[test]
    fn test_advise_reference_mix() {
        let advice = advise(&mix());
        assert!(advice.warnings.is_empty());
        assert_eq!(advice.notes.len(), 2);
    }

    #[test]
    fn test_advise_wet_lean_mix() {
        let lean = MixComposition {
            cement: 200.0,
            water: 180.0,
            age: 3,
            ..mix()
        };
        let advice = advise(&lean);
        assert_eq!(advice.warnings.len(), 2);
        assert!(advice.notes[0].contains("65%"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(StrengthClient::new("localhost:8000").is_err());
        let client = StrengthClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
