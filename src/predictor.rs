use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::feature_order::FeatureOrderLoader;
use crate::model::{extract_prediction, extract_predictions, ModelError, ModelRunner, SubprocessRunner};
use crate::{ModelFeatures, PredictionResult};

/// Scores feature vectors with the external model and falls back to the
/// heuristic formula whenever the model cannot produce a usable answer.
#[derive(Clone)]
pub struct PredictionService {
    runner: Arc<dyn ModelRunner>,
    feature_order: Arc<FeatureOrderLoader>,
}

impl PredictionService {
    pub fn new(runner: Arc<dyn ModelRunner>, feature_order: Arc<FeatureOrderLoader>) -> Self {
        Self {
            runner,
            feature_order,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let runner = SubprocessRunner::from_config(config);
        let feature_order = FeatureOrderLoader::from_path(config.model.features_path());
        PredictionService::new(Arc::new(runner), Arc::new(feature_order))
    }

    pub async fn predict(&self, features: &ModelFeatures) -> PredictionResult {
        match self.run_single(features).await {
            Ok(prediction) => {
                debug!(prediction, platform = features.platform.id(), "model prediction");
                PredictionResult::from_model(prediction, features.clone())
            }
            Err(err) => {
                warn!(error = %err, "model prediction failed, using heuristic fallback");
                PredictionResult::fallback(features.clone(), err.to_string())
            }
        }
    }

    /// Scores all items in one model call. If that call fails every item falls
    /// back to its own heuristic score.
    pub async fn predict_batch(&self, features: &[ModelFeatures]) -> Vec<PredictionResult> {
        if features.is_empty() {
            return Vec::new();
        }

        match self.run_batch(features).await {
            Ok(predictions) => {
                debug!(count = predictions.len(), "model batch prediction");
                features
                    .iter()
                    .zip(predictions)
                    .map(|(item, prediction)| PredictionResult::from_model(prediction, item.clone()))
                    .collect()
            }
            Err(err) => {
                warn!(error = %err, count = features.len(), "model batch failed, using heuristic fallback");
                let warning = err.to_string();
                features
                    .iter()
                    .map(|item| PredictionResult::fallback(item.clone(), warning.clone()))
                    .collect()
            }
        }
    }

    async fn run_single(&self, features: &ModelFeatures) -> Result<f64, ModelError> {
        let order = self.feature_order.get().await;
        let payload = Value::Object(order.apply(features));
        let output = self.runner.run(payload).await?;
        extract_prediction(&output)
    }

    async fn run_batch(&self, features: &[ModelFeatures]) -> Result<Vec<f64>, ModelError> {
        let order = self.feature_order.get().await;
        let payload = Value::Array(
            features
                .iter()
                .map(|item| Value::Object(order.apply(item)))
                .collect(),
        );
        let output = self.runner.run(payload).await?;
        extract_predictions(&output, features.len())
    }
}
