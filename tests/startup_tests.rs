use serde_json::json;
use std::sync::Arc;
use strength_serve::core::Regressor;
use strength_serve::{ArtifactModel, MixSchema, ServiceConfig, StrengthError, StrengthPredictor};
use tempfile::TempDir;

#[test]
fn test_missing_model_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = ServiceConfig::default();
    config.model.path = temp_dir
        .path()
        .join("best_model.json")
        .to_str()
        .unwrap()
        .to_string();

    let err = StrengthPredictor::from_config(&config).err().unwrap();
    match &err {
        StrengthError::ModelLoadError { path, reason } => {
            assert!(path.ends_with("best_model.json"));
            assert!(reason.contains("not found"));
        }
        other => panic!("expected ModelLoadError, got {:?}", other),
    }
    assert!(!err.is_client_error());
}

#[test]
fn test_corrupt_model_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04\x95 pickled bytes").unwrap();

    assert!(matches!(
        ArtifactModel::load(&path),
        Err(StrengthError::ModelLoadError { .. })
    ));
}

#[test]
fn test_bundled_model_predicts_reference_mix() {
    let model = ArtifactModel::load(concat!(env!("CARGO_MANIFEST_DIR"), "/models/model.json")).unwrap();
    assert_eq!(model.metadata().model_version, "1.0.0");
    assert_eq!(model.feature_importances().len(), 10);

    let predictor = StrengthPredictor::new(Arc::new(model));
    let body = json!({
        "Cement (component 1)(kg in a m^3 mixture)": 540.0,
        "Blast Furnace Slag (component 2)(kg in a m^3 mixture)": 0.0,
        "Fly Ash (component 3)(kg in a m^3 mixture)": 0.0,
        "Water  (component 4)(kg in a m^3 mixture)": 162.0,
        "Superplasticizer (component 5)(kg in a m^3 mixture)": 2.5,
        "Coarse Aggregate  (component 6)(kg in a m^3 mixture)": 1040.0,
        "Fine Aggregate (component 7)(kg in a m^3 mixture)": 676.0,
        "Age (day)": 28
    });

    let first = predictor.predict(body.as_object().unwrap()).unwrap();
    let second = predictor.predict(body.as_object().unwrap()).unwrap();

    assert_eq!(first, second);
    assert!(first.predicted_strength.is_finite());
    assert!(first.predicted_strength > 0.0);
}

#[test]
fn test_bundled_model_positive_at_range_corners() {
    let model = ArtifactModel::load(concat!(env!("CARGO_MANIFEST_DIR"), "/models/model.json")).unwrap();
    let predictor = StrengthPredictor::new(Arc::new(model));
    let schema = MixSchema::default();

    // 低水泥、高水量、1 天齡期等最不利組合
    let corners = [
        json!({
            "cement": 102.0, "blast_furnace_slag": 150.0, "fly_ash": 0.0, "water": 247.0,
            "superplasticizer": 0.0, "coarse_aggregate": 801.0, "fine_aggregate": 594.0, "age": 1
        }),
        json!({
            "cement": 102.0, "blast_furnace_slag": 0.0, "fly_ash": 145.0, "water": 247.0,
            "superplasticizer": 0.0, "coarse_aggregate": 1145.0, "fine_aggregate": 992.6, "age": 1
        }),
        json!({
            "cement": 540.0, "blast_furnace_slag": 359.4, "fly_ash": 200.1, "water": 121.75,
            "superplasticizer": 32.2, "coarse_aggregate": 1145.0, "fine_aggregate": 992.6, "age": 365
        }),
    ];

    for body in corners {
        let body = body.as_object().unwrap();
        schema.check(body).unwrap();
        let result = predictor.predict(body).unwrap();
        assert!(result.predicted_strength > 0.0, "{:?}", body);
    }
}

#[tokio::test]
async fn test_shared_predictor_across_tasks() {
    let model = ArtifactModel::load(concat!(env!("CARGO_MANIFEST_DIR"), "/models/model.json")).unwrap();
    let predictor = Arc::new(StrengthPredictor::new(Arc::new(model)));
    let body = json!({
        "cement": 300.0, "blast_furnace_slag": 100.0, "fly_ash": 50.0, "water": 180.0,
        "superplasticizer": 5.0, "coarse_aggregate": 950.0, "fine_aggregate": 750.0, "age": 56
    });

    let mut handles = Vec::new();
    for _ in 0..8 {
        let predictor = Arc::clone(&predictor);
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            predictor.predict(body.as_object().unwrap()).map(|r| r.predicted_strength)
        }));
    }

    let mut outputs = Vec::new();
    for handle in handles {
        outputs.push(handle.await.unwrap().unwrap());
    }
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}
