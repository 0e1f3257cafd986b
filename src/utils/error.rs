use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrengthError {
    #[error("Validation error: {message}")]
    ValidationError { field: String, message: String },

    #[error("Feature engineering error: {feature}: {message}")]
    FeatureEngineeringError { feature: String, message: String },

    #[error("Failed to load model from {path}: {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 錯誤分類，決定 HTTP 狀態碼與程式結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入有誤，可修正後重試
    Input,
    /// 模型載入或推論失敗
    Model,
    Config,
    Transport,
    System,
}

impl StrengthError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StrengthError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn feature(feature: impl Into<String>, message: impl Into<String>) -> Self {
        StrengthError::FeatureEngineeringError {
            feature: feature.into(),
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        StrengthError::InferenceError {
            message: message.into(),
        }
    }

    pub fn model_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StrengthError::ModelLoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StrengthError::ValidationError { .. } | StrengthError::FeatureEngineeringError { .. } => {
                ErrorCategory::Input
            }
            StrengthError::ModelLoadError { .. } | StrengthError::InferenceError { .. } => {
                ErrorCategory::Model
            }
            StrengthError::ConfigError { .. }
            | StrengthError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            StrengthError::ApiError(_) | StrengthError::UnexpectedStatus { .. } => {
                ErrorCategory::Transport
            }
            StrengthError::IoError(_) | StrengthError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// Client-caused failures are reported with full detail; everything else
    /// is reported generically.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StrengthError::ValidationError { message, .. } => message.clone(),
            StrengthError::FeatureEngineeringError { feature, message } => {
                format!("Cannot derive {}: {}", feature, message)
            }
            StrengthError::ModelLoadError { path, .. } => {
                format!("Model could not be loaded from {}", path)
            }
            StrengthError::InferenceError { .. } => "Prediction failed".to_string(),
            StrengthError::ConfigError { .. }
            | StrengthError::InvalidConfigValueError { .. } => self.to_string(),
            StrengthError::ApiError(_) => "Could not reach the prediction API".to_string(),
            StrengthError::UnexpectedStatus { status, message } => {
                if (400..500).contains(status) {
                    message.clone()
                } else {
                    format!("The prediction API reported an error (HTTP {})", status)
                }
            }
            StrengthError::IoError(_) | StrengthError::SerializationError(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the mix composition values against the accepted ranges",
            ErrorCategory::Model => "Verify the model artifact path and that the file is a valid model export",
            ErrorCategory::Config => "Fix the configuration file or command-line overrides",
            ErrorCategory::Transport => "Make sure the prediction API is running and reachable",
            ErrorCategory::System => "Check file permissions and server logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, StrengthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_input_category() {
        assert!(StrengthError::validation("cement", "Missing required field: cement").is_client_error());
        assert!(StrengthError::feature("water_binder_ratio", "total binder is zero").is_client_error());
        assert!(!StrengthError::inference("tree index out of bounds").is_client_error());
        assert!(!StrengthError::model_load("missing.json", "not found").is_client_error());
    }

    #[test]
    fn test_inference_message_is_generic() {
        let err = StrengthError::inference("feature_idx 42 out of range");
        assert_eq!(err.user_friendly_message(), "Prediction failed");
        assert!(err.to_string().contains("feature_idx 42"));
    }

    #[test]
    fn test_config_errors_are_config_category() {
        let invalid = StrengthError::InvalidConfigValueError {
            field: "API_PORT".to_string(),
            value: "eighty".to_string(),
            reason: "Port must be an integer between 0 and 65535".to_string(),
        };
        assert_eq!(invalid.category(), ErrorCategory::Config);
        assert!(invalid.user_friendly_message().contains("API_PORT"));

        let general = StrengthError::ConfigError {
            message: "bad TOML".to_string(),
        };
        assert_eq!(general.category(), ErrorCategory::Config);
    }
}
