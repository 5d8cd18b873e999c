//! Rasterizer backed by an external conversion program
//!
//! The program receives the raw drawing on stdin and the options as
//! arguments, and writes a PNG to stdout. A dedicated exit code signals that
//! the drawing could not be loaded.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{RasterOptions, RasterizeError, Rasterizer};

#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    load_failure_exit_code: i32,
}

impl CommandRasterizer {
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        timeout: Duration,
        load_failure_exit_code: i32,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            load_failure_exit_code,
        }
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, raw: Bytes, options: &RasterOptions) -> Result<Bytes, RasterizeError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(options.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RasterizeError::Failed(format!(
                    "failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Feed stdin concurrently so a converter that streams output early
        // cannot deadlock on a full pipe.
        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&raw).await {
                    tracing::debug!(error = %e, "Rasterizer closed stdin early");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RasterizeError::Failed(format!("timed out after {}s", self.timeout.as_secs_f32()))
            })?
            .map_err(|e| RasterizeError::Failed(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(0) => {}
            Some(code) if code == self.load_failure_exit_code => {
                return Err(RasterizeError::Load(stderr));
            }
            Some(code) => {
                return Err(RasterizeError::Failed(format!(
                    "exit code {}: {}",
                    code, stderr
                )));
            }
            None => {
                return Err(RasterizeError::Failed(format!(
                    "terminated by signal: {}",
                    stderr
                )));
            }
        }

        if output.stdout.is_empty() {
            return Err(RasterizeError::Failed("converter produced no output".to_string()));
        }
        Ok(Bytes::from(output.stdout))
    }
}
