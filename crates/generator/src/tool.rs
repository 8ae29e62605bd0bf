//! External proxy generation tool

use soap_client_generator_common::{GeneratorError, Result, ToolConfig};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Produces a raw proxy listing for a service description document
#[cfg_attr(test, mockall::automock)]
pub trait ProxyTool {
    /// Write the listing for `document` to `output`
    fn generate(&self, document: &str, output: &Path) -> Result<()>;
}

/// svcutil invoked as a child process
#[derive(Debug, Clone)]
pub struct SvcUtil {
    path: PathBuf,
    arguments: Vec<String>,
}

impl SvcUtil {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            path: config.path.clone(),
            arguments: config.arguments.clone(),
        }
    }

    /// `<document> <arguments...> /out:<output>`
    pub fn command_args(&self, document: &str, output: &Path) -> Vec<OsString> {
        let mut out = OsString::from("/out:");
        out.push(output.as_os_str());

        std::iter::once(OsString::from(document))
            .chain(self.arguments.iter().map(OsString::from))
            .chain(std::iter::once(out))
            .collect()
    }
}

impl ProxyTool for SvcUtil {
    fn generate(&self, document: &str, output: &Path) -> Result<()> {
        if !self.path.is_file() {
            return Err(GeneratorError::ToolNotFound(self.path.clone()));
        }

        info!(tool = %self.path.display(), document, "running proxy generation tool");
        let result = Command::new(&self.path)
            .args(self.command_args(document, output))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => GeneratorError::ToolNotFound(self.path.clone()),
                _ => GeneratorError::ExternalToolFailure(format!(
                    "failed to start {}: {}",
                    self.path.display(),
                    e
                )),
            })?;
        debug!(
            stdout = %String::from_utf8_lossy(&result.stdout),
            stderr = %String::from_utf8_lossy(&result.stderr),
            "proxy generation tool output"
        );

        if !result.status.success() {
            return Err(GeneratorError::ExternalToolFailure(format!(
                "{} exited with {}{}",
                self.path.display(),
                result.status,
                first_line(&result.stderr)
                    .or_else(|| first_line(&result.stdout))
                    .map(|line| format!(": {}", line))
                    .unwrap_or_default()
            )));
        }
        if !output.is_file() {
            return Err(GeneratorError::ExternalToolFailure(format!(
                "{} produced no listing at {}",
                self.path.display(),
                output.display()
            )));
        }

        Ok(())
    }
}

/// First non-blank line of process output
fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
