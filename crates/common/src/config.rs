//! Generator configuration loaded from YAML
//!
//! Every field has a default, so an empty document (or no file at all) yields
//! the stock svcutil setup.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Install location of svcutil in the Windows SDK
pub const DEFAULT_TOOL_PATH: &str =
    r"C:\Program Files (x86)\Microsoft SDKs\Windows\v8.1A\bin\NETFX 4.5.1 Tools\SvcUtil.exe";

/// Root structure of a generator configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// External proxy generation tool
    #[serde(default)]
    pub tool: ToolConfig,
    /// Shape of the emitted source file
    #[serde(default)]
    pub output: OutputConfig,
}

/// External proxy generation tool settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolConfig {
    /// Path to the executable
    #[serde(default = "default_tool_path")]
    pub path: PathBuf,
    /// Arguments passed after the document URI and before `/out:`
    #[serde(default = "default_tool_arguments")]
    pub arguments: Vec<String>,
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Base class of every generated client implementation
    #[serde(default = "default_client_base_type")]
    pub client_base_type: String,
    /// Generic request/response operation on the base class
    #[serde(default = "default_call_method")]
    pub call_method: String,
    /// Using directives placed inside the namespace block
    #[serde(default = "default_usings")]
    pub usings: Vec<String>,
    /// Emit the auto-generated banner at the top of the file
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_tool_path() -> PathBuf {
    PathBuf::from(DEFAULT_TOOL_PATH)
}

fn default_tool_arguments() -> Vec<String> {
    ["/noconfig", "/nologo", "/t:code", "/mc", "/edb"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_client_base_type() -> String {
    "SoapServices.SoapClientBase".to_string()
}

fn default_call_method() -> String {
    "CallAsync".to_string()
}

fn default_usings() -> Vec<String> {
    [
        "System.Collections.Generic",
        "System.Threading.Tasks",
        "System.Xml.Linq",
        "System.Xml.Schema",
        "System.Xml.Serialization",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_header() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            path: default_tool_path(),
            arguments: default_tool_arguments(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            client_base_type: default_client_base_type(),
            call_method: default_call_method(),
            usings: default_usings(),
            header: default_header(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the tool path (the `/tool:` command-line override)
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool.path = path.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.output.call_method.trim().is_empty() {
            return Err(GeneratorError::Config(
                "output.call_method must not be empty".to_string(),
            ));
        }
        if self.output.client_base_type.trim().is_empty() {
            return Err(GeneratorError::Config(
                "output.client_base_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
