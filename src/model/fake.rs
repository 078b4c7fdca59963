use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

use crate::model::{ModelError, ModelRunner};

/// In-memory runner that answers every call with a scripted response and
/// records the payloads it was sent.
#[derive(Debug, Clone)]
pub struct FakeRunner {
    response: Result<Value, ModelError>,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl FakeRunner {
    pub fn responding(response: Value) -> Self {
        Self {
            response: Ok(response),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prediction(value: f64) -> Self {
        Self::responding(json!({ "prediction": value }))
    }

    pub fn predictions(values: &[f64]) -> Self {
        Self::responding(json!({ "predictions": values }))
    }

    pub fn failing(error: ModelError) -> Self {
        Self {
            response: Err(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ModelRunner for FakeRunner {
    async fn run(&self, payload: Value) -> Result<Map<String, Value>, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(payload);
        }
        match &self.response {
            Ok(Value::Object(map)) => Ok(map.clone()),
            Ok(_) => Err(ModelError::NotAnObject),
            Err(err) => Err(err.clone()),
        }
    }
}
