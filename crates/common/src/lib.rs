//! Common types and utilities for the SOAP client generator
//!
//! This crate contains the error taxonomy, the generator configuration and the
//! intermediate representation shared by the parser, analyzer, generator and
//! CLI components.

mod config;
mod descriptors;
mod type_name;

pub use config::{GeneratorConfig, OutputConfig, ToolConfig, DEFAULT_TOOL_PATH};
pub use descriptors::{
    AnyElementMetadata, ArrayItemMetadata, ArrayMetadata, AttributeMetadata, BodyMember,
    ContractDescriptor, ElementMetadata, EnumDescriptor, EnumMemberDescriptor, GenerationModel,
    MemberDescriptor, OperationDescriptor, ParameterDescriptor, Placement, RootElement,
    ServiceDescriptor, TextMetadata,
};
pub use type_name::TypeName;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a client
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("proxy generation tool not found: {}", .0.display())]
    ToolNotFound(PathBuf),

    #[error("proxy generation tool failed: {0}")]
    ExternalToolFailure(String),

    #[error("Bad parameter '{0}'")]
    MalformedParameter(String),

    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
