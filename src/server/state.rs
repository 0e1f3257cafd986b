//! Application state shared across handlers

use crate::core::predictor::StrengthPredictor;
use crate::domain::schema::MixSchema;

pub struct AppState {
    pub predictor: StrengthPredictor,
    pub schema: MixSchema,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(predictor: StrengthPredictor, schema: MixSchema) -> Self {
        Self {
            predictor,
            schema,
            started_at: chrono::Utc::now(),
        }
    }
}
