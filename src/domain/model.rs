use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const STRENGTH_UNITS: &str = "MPa";
pub const STATUS_SUCCESS: &str = "success";

/// Column order consumed by the model: eight raw fields, then the three
/// derived ratios.
pub const FEATURE_NAMES: [&str; 11] = [
    "cement",
    "blast_furnace_slag",
    "fly_ash",
    "water",
    "superplasticizer",
    "coarse_aggregate",
    "fine_aggregate",
    "age",
    "total_binder",
    "water_binder_ratio",
    "aggregate_cement_ratio",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixField {
    Cement,
    BlastFurnaceSlag,
    FlyAsh,
    Water,
    Superplasticizer,
    CoarseAggregate,
    FineAggregate,
    Age,
}

impl MixField {
    pub const ALL: [MixField; 8] = [
        MixField::Cement,
        MixField::BlastFurnaceSlag,
        MixField::FlyAsh,
        MixField::Water,
        MixField::Superplasticizer,
        MixField::CoarseAggregate,
        MixField::FineAggregate,
        MixField::Age,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MixField::Cement => "cement",
            MixField::BlastFurnaceSlag => "blast_furnace_slag",
            MixField::FlyAsh => "fly_ash",
            MixField::Water => "water",
            MixField::Superplasticizer => "superplasticizer",
            MixField::CoarseAggregate => "coarse_aggregate",
            MixField::FineAggregate => "fine_aggregate",
            MixField::Age => "age",
        }
    }

    /// 原始資料集的欄位名稱 (UCI concrete dataset)
    pub fn dataset_label(&self) -> &'static str {
        match self {
            MixField::Cement => "Cement (component 1)(kg in a m^3 mixture)",
            MixField::BlastFurnaceSlag => "Blast Furnace Slag (component 2)(kg in a m^3 mixture)",
            MixField::FlyAsh => "Fly Ash (component 3)(kg in a m^3 mixture)",
            MixField::Water => "Water  (component 4)(kg in a m^3 mixture)",
            MixField::Superplasticizer => "Superplasticizer (component 5)(kg in a m^3 mixture)",
            MixField::CoarseAggregate => "Coarse Aggregate  (component 6)(kg in a m^3 mixture)",
            MixField::FineAggregate => "Fine Aggregate (component 7)(kg in a m^3 mixture)",
            MixField::Age => "Age (day)",
        }
    }

    pub fn from_name(name: &str) -> Option<MixField> {
        MixField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Looks the field up by its snake_case name, falling back to the
    /// dataset label.
    pub fn lookup<'a>(&self, raw: &'a Map<String, Value>) -> Option<&'a Value> {
        raw.get(self.name()).or_else(|| raw.get(self.dataset_label()))
    }
}

/// One concrete mix design, kg per cubic meter except `age` (days).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixComposition {
    pub cement: f64,
    pub blast_furnace_slag: f64,
    pub fly_ash: f64,
    pub water: f64,
    pub superplasticizer: f64,
    pub coarse_aggregate: f64,
    pub fine_aggregate: f64,
    pub age: u32,
}

impl MixComposition {
    pub fn get(&self, field: MixField) -> f64 {
        match field {
            MixField::Cement => self.cement,
            MixField::BlastFurnaceSlag => self.blast_furnace_slag,
            MixField::FlyAsh => self.fly_ash,
            MixField::Water => self.water,
            MixField::Superplasticizer => self.superplasticizer,
            MixField::CoarseAggregate => self.coarse_aggregate,
            MixField::FineAggregate => self.fine_aggregate,
            MixField::Age => f64::from(self.age),
        }
    }

    pub fn total_binder(&self) -> f64 {
        self.cement + self.blast_furnace_slag + self.fly_ash
    }

    /// JSON object keyed by snake_case field names, the shape `/predict` accepts.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in MixField::ALL {
            let value = match field {
                MixField::Age => Value::from(self.age),
                _ => Value::from(self.get(field)),
            };
            map.insert(field.name().to_string(), value);
        }
        map
    }
}

/// Raw fields plus derived ratios. Only the feature engineer builds these,
/// so every value is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatures {
    mix: MixComposition,
    total_binder: f64,
    water_binder_ratio: f64,
    aggregate_cement_ratio: f64,
}

impl EngineeredFeatures {
    pub(crate) fn new(
        mix: MixComposition,
        total_binder: f64,
        water_binder_ratio: f64,
        aggregate_cement_ratio: f64,
    ) -> Self {
        Self {
            mix,
            total_binder,
            water_binder_ratio,
            aggregate_cement_ratio,
        }
    }

    pub fn mix(&self) -> &MixComposition {
        &self.mix
    }

    pub fn total_binder(&self) -> f64 {
        self.total_binder
    }

    pub fn water_binder_ratio(&self) -> f64 {
        self.water_binder_ratio
    }

    pub fn aggregate_cement_ratio(&self) -> f64 {
        self.aggregate_cement_ratio
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn to_vector(&self) -> [f64; 11] {
        let m = &self.mix;
        [
            m.cement,
            m.blast_furnace_slag,
            m.fly_ash,
            m.water,
            m.superplasticizer,
            m.coarse_aggregate,
            m.fine_aggregate,
            f64::from(m.age),
            self.total_binder,
            self.water_binder_ratio,
            self.aggregate_cement_ratio,
        ]
    }

    pub fn names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_strength: f64,
    pub units: String,
    pub model_version: String,
    pub features_used: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub model_version: String,
    pub training_date: String,
    pub features_used: usize,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub predicted_strength: f64,
    pub feature_importance: BTreeMap<String, f64>,
    pub message: String,
}
