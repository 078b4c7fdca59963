use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::ModelFeatures;

pub const DEFAULT_FEATURE_ORDER: [&str; 13] = [
    "platform",
    "format",
    "goal",
    "campaign",
    "tone",
    "cta_type",
    "hashtags_count",
    "post_hour",
    "day_of_week",
    "caption_length",
    "creative_score",
    "posts_last_7_days",
    "follower_count",
];

/// Key order of the feature object sent to the model process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOrder {
    names: Vec<String>,
}

impl Default for FeatureOrder {
    fn default() -> Self {
        Self {
            names: DEFAULT_FEATURE_ORDER.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl FeatureOrder {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Accepts a non-empty JSON array of strings.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|err| format!("failed to parse feature order: {}", err))?;
        let items = value
            .as_array()
            .ok_or_else(|| "feature order must be a JSON array".to_string())?;
        if items.is_empty() {
            return Err("feature order is empty".to_string());
        }
        let names = items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| "feature order must only contain strings".to_string())?;
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Builds the ordered JSON object for one feature vector. Names that are
    /// not model features are skipped.
    pub fn apply(&self, features: &ModelFeatures) -> Map<String, Value> {
        let mut source = match serde_json::to_value(features) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let mut ordered = Map::new();
        for name in &self.names {
            if let Some(value) = source.remove(name) {
                ordered.insert(name.clone(), value);
            }
        }
        ordered
    }
}

/// Reads the feature-order artifact on first use and keeps the result, or the
/// default order, for the loader's lifetime.
#[derive(Debug, Default)]
pub struct FeatureOrderLoader {
    path: Option<PathBuf>,
    cell: OnceCell<FeatureOrder>,
}

impl FeatureOrderLoader {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            cell: OnceCell::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()))
    }

    pub fn fixed(order: FeatureOrder) -> Self {
        Self {
            path: None,
            cell: OnceCell::new_with(Some(order)),
        }
    }

    pub async fn get(&self) -> &FeatureOrder {
        self.cell.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> FeatureOrder {
        let Some(path) = self.path.as_ref() else {
            return FeatureOrder::default();
        };
        let result = match tokio::fs::read_to_string(path).await {
            Ok(contents) => FeatureOrder::parse(&contents),
            Err(err) => Err(format!("failed to read feature order: {}", err)),
        };
        match result {
            Ok(order) => {
                debug!(path = %path.display(), features = order.names.len(), "loaded feature order");
                order
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "using default feature order");
                FeatureOrder::default()
            }
        }
    }
}
