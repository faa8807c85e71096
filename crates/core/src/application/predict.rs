// Prediction Use Case
//
// Builds one InvocationRequest per incoming prediction payload: the
// payload is serialized to a single JSON-text argument appended after the
// configured base arguments. Awaits exactly one outcome from the runner
// and decodes the frozen stdout buffer as the prediction text.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::InvocationRequest;
use crate::error::Result;
use crate::port::{IdProvider, ModelRunner, TimeProvider};

/// Configuration of the external inference command
///
/// Example: `python3 scripts/predict_data.py '<payload json>'`
#[derive(Debug, Clone)]
pub struct ModelCommand {
    pub program: String,
    pub base_args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Prediction service with injected dependencies
pub struct PredictionService {
    runner: Arc<dyn ModelRunner>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    command: ModelCommand,
}

impl PredictionService {
    pub fn new(
        runner: Arc<dyn ModelRunner>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        command: ModelCommand,
    ) -> Self {
        Self {
            runner,
            id_provider,
            time_provider,
            command,
        }
    }

    /// Run one prediction for the given payload.
    ///
    /// All failure subkinds collapse to a single error for the caller;
    /// the distinguishing reason is retained in the logs.
    pub async fn predict(&self, payload: &serde_json::Value) -> Result<String> {
        let invocation_id = self.id_provider.generate_id();
        let started_at = self.time_provider.now_millis();

        let request = self.build_request(payload)?;

        info!(
            invocation_id = %invocation_id,
            program = %request.program(),
            "Starting model invocation"
        );

        match self.runner.run(&request).await {
            Ok(stdout) => {
                let duration_ms = self.time_provider.now_millis() - started_at;
                info!(
                    invocation_id = %invocation_id,
                    duration_ms = %duration_ms,
                    stdout_bytes = stdout.len(),
                    "Model invocation succeeded"
                );
                Ok(String::from_utf8_lossy(&stdout).into_owned())
            }
            Err(e) => {
                let duration_ms = self.time_provider.now_millis() - started_at;
                error!(
                    invocation_id = %invocation_id,
                    duration_ms = %duration_ms,
                    failure_kind = e.kind(),
                    error = %e,
                    "Model invocation failed"
                );
                Err(e.into())
            }
        }
    }

    fn build_request(&self, payload: &serde_json::Value) -> Result<InvocationRequest> {
        let serialized = serde_json::to_string(payload)?;

        let mut args = self.command.base_args.clone();
        args.push(serialized);
        if args.len() == 1 {
            // No script configured: the payload alone is a suspicious
            // command line, but still a valid one per the bridge contract.
            warn!(program = %self.command.program, "Model command has no base arguments");
        }

        let mut request = InvocationRequest::new(self.command.program.clone(), args)?;
        if let Some(dir) = &self.command.working_dir {
            request = request.with_working_dir(dir.clone());
        }
        Ok(request)
    }
}
