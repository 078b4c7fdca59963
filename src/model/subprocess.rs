use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{parse_output, ModelError, ModelRunner};

/// Runs the predictor script once per call, writing the payload to stdin and
/// reading one JSON object from stdout.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    program: String,
    script: PathBuf,
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn from_config(config: &EngineConfig) -> Self {
        let working_dir = Some(config.model.ai_dir.clone()).filter(|dir| dir.is_dir());
        SubprocessRunner::new(
            config.model.python_bin.clone(),
            config.model.script_path(),
            Duration::from_millis(config.model.timeout_ms),
        )
        .with_working_dir(working_dir)
    }

    pub fn new(program: String, script: PathBuf, timeout: Duration) -> Self {
        Self {
            program,
            script,
            working_dir: None,
            timeout,
        }
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn exchange(&self, payload: &[u8]) -> Result<Map<String, Value>, ModelError> {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = self.working_dir.as_ref() {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|err| ModelError::Spawn(format!("{}: {}", self.program, err)))?;

        // stdin is fed while stdout and stderr are drained, so neither side
        // can stall on a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            let result = stdin.write_all(payload).await;
            drop(stdin);
            match result {
                // Broken pipe: the process exited early and its status reports why.
                Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => Err(err),
                _ => Ok(()),
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|err| ModelError::Io(err.to_string()))?;

        if !output.status.success() {
            return Err(ModelError::Exited {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        fed.map_err(|err| ModelError::Io(err.to_string()))?;

        parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl ModelRunner for SubprocessRunner {
    async fn run(&self, payload: Value) -> Result<Map<String, Value>, ModelError> {
        let body = serde_json::to_vec(&payload)
            .map_err(|err| ModelError::Io(format!("failed to encode payload: {}", err)))?;
        let started = Instant::now();

        // Dropping the exchange future on timeout drops the child, which kills it.
        let result = tokio::time::timeout(self.timeout, self.exchange(&body))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))?;

        debug!(
            program = %self.program,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "model process finished"
        );
        result
    }
}
