pub mod fake;
pub mod subprocess;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

pub use fake::FakeRunner;
pub use subprocess::SubprocessRunner;

/// Failure modes of one external model invocation. The display text is shown
/// to end users as the fallback warning.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("failed to start model process: {0}")]
    Spawn(String),
    #[error("model process i/o failed: {0}")]
    Io(String),
    #[error("{}", exit_message(.code, .stderr))]
    Exited { code: Option<i32>, stderr: String },
    #[error("Model inference timed out after {} seconds.", .0.as_secs())]
    Timeout(Duration),
    #[error("Failed to parse model output. {0}")]
    InvalidOutput(String),
    #[error("Model output must be a JSON object.")]
    NotAnObject,
    #[error("Model output is missing a numeric prediction.")]
    MissingPrediction,
    #[error("Model output is missing predictions array.")]
    MissingPredictions,
    #[error("Model output contains non-numeric predictions.")]
    NonNumericPredictions,
    #[error("Model returned {actual} predictions for {expected} inputs.")]
    LengthMismatch { expected: usize, actual: usize },
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match *code {
        Some(code) => format!("predict.py exited with code {}", code),
        None => "predict.py was terminated by a signal".to_string(),
    }
}

/// One request/response exchange with the scoring model. Implementations
/// send `payload` and return the single JSON object the model answered with.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn run(&self, payload: Value) -> Result<Map<String, Value>, ModelError>;
}

/// Parses raw model stdout into the single JSON object the protocol requires.
pub fn parse_output(stdout: &str) -> Result<Map<String, Value>, ModelError> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|err| ModelError::InvalidOutput(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ModelError::NotAnObject),
    }
}

pub fn extract_prediction(output: &Map<String, Value>) -> Result<f64, ModelError> {
    output
        .get("prediction")
        .and_then(coerce_number)
        .ok_or(ModelError::MissingPrediction)
}

pub fn extract_predictions(
    output: &Map<String, Value>,
    expected: usize,
) -> Result<Vec<f64>, ModelError> {
    let values = output
        .get("predictions")
        .and_then(Value::as_array)
        .ok_or(ModelError::MissingPredictions)?;
    let predictions = values
        .iter()
        .map(coerce_number)
        .collect::<Option<Vec<_>>>()
        .ok_or(ModelError::NonNumericPredictions)?;
    if predictions.len() != expected {
        return Err(ModelError::LengthMismatch {
            expected,
            actual: predictions.len(),
        });
    }
    Ok(predictions)
}

/// Numbers and numeric strings; anything non-finite is rejected.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
