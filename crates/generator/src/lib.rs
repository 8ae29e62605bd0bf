//! Client source generation
//!
//! Turns a [`GenerationModel`] into a single C# source file: interfaces and
//! partial client classes per service, data classes per contract and enums.
//! [`Pipeline`] drives the whole run from a description document or an
//! existing proxy listing.

mod contract;
mod enumeration;
mod pipeline;
pub mod printer;
mod service;
mod synthesizer;
pub mod syntax;
mod templates;
mod tool;

pub use pipeline::{Pipeline, RunSummary};
pub use synthesizer::synthesize;
pub use tool::{ProxyTool, SvcUtil};

use serde::Serialize;
use soap_client_generator_common::{GenerationModel, GeneratorError, OutputConfig, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tera::Tera;
use tracing::{debug, info};

/// Renders generation models into client source files
pub struct ClientGenerator {
    output: OutputConfig,
    tera: Tera,
}

#[derive(Serialize)]
struct SourceFileContext<'a> {
    generator: &'static str,
    version: &'static str,
    header: bool,
    namespace: &'a str,
    usings: &'a [String],
    body: String,
}

impl ClientGenerator {
    /// Create a new generator for the given output settings
    pub fn new(output: OutputConfig) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { output, tera })
    }

    /// Render the complete source file for `model` inside `namespace`
    pub fn render(&self, model: &GenerationModel, namespace: &str) -> Result<String> {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Err(GeneratorError::Config(
                "target namespace must not be empty".to_string(),
            ));
        }

        let declarations = synthesize(model, &self.output)?;
        debug!(declarations = declarations.len(), "synthesized declarations");

        let context = SourceFileContext {
            generator: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            header: self.output.header,
            namespace,
            usings: &self.output.usings,
            body: printer::print_declarations(&declarations, 1),
        };
        let context = tera::Context::from_serialize(&context)
            .map_err(|e| GeneratorError::Generation(format!("Template context error: {}", e)))?;

        let mut rendered = self
            .tera
            .render(templates::SOURCE_FILE, &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {}", e)))?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }

        Ok(rendered)
    }

    /// Render and write to `path`, replacing any previous file atomically
    pub fn generate_to_file(
        &self,
        model: &GenerationModel,
        namespace: &str,
        path: &Path,
    ) -> Result<()> {
        let rendered = self.render(model, namespace)?;
        write_atomically(path, &rendered)?;
        info!(path = %path.display(), bytes = rendered.len(), "wrote client source");
        Ok(())
    }
}

/// Write through a temporary file in the target directory, then rename
///
/// A failed run leaves any existing file at `path` untouched.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        GeneratorError::Generation(format!(
            "Failed to create output directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| {
        GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_client_generator_common::{
        EnumDescriptor, EnumMemberDescriptor, OperationDescriptor, ParameterDescriptor,
        ServiceDescriptor, TypeName,
    };
    use tempfile::TempDir;

    fn letters() -> GenerationModel {
        GenerationModel {
            enums: vec![EnumDescriptor {
                name: "Letter".into(),
                is_flags: false,
                members: vec![
                    EnumMemberDescriptor {
                        name: "A".into(),
                        wire_value: None,
                        value: None,
                    },
                    EnumMemberDescriptor {
                        name: "B".into(),
                        wire_value: Some("b-value".into()),
                        value: None,
                    },
                ],
            }],
            ..GenerationModel::default()
        }
    }

    #[test]
    fn test_render_file_shell() {
        let generator = ClientGenerator::new(OutputConfig::default()).unwrap();
        let text = generator.render(&letters(), "Acme.Letters").unwrap();

        assert!(text.starts_with("//----"));
        assert!(text.contains("<auto-generated>"));
        assert!(text.contains("namespace Acme.Letters\n{\n    using System.Collections.Generic;\n    using System.Threading.Tasks;\n"));
        assert!(text.contains("    using System.Xml.Serialization;\n\n    public enum Letter\n"));
        assert!(text.contains("        A,\n        [XmlEnum(\"b-value\")]\n        B\n"));
        assert!(text.ends_with("    }\n}\n"));
    }

    #[test]
    fn test_render_generic_collection_response() {
        let list = TypeName::generic("List", vec![TypeName::named("Item")]);
        let model = GenerationModel {
            services: vec![ServiceDescriptor {
                name: "ICatalog".into(),
                operations: vec![OperationDescriptor {
                    name: "ListItemsAsync".into(),
                    parameters: vec![ParameterDescriptor {
                        name: "request".into(),
                        type_name: TypeName::named("ListItemsRequest"),
                    }],
                    return_type: TypeName::generic("Task", vec![list.clone()]),
                    response_type: list,
                    action: "urn:ListItems".into(),
                    request_body: None,
                }],
            }],
            ..GenerationModel::default()
        };

        let generator = ClientGenerator::new(OutputConfig::default()).unwrap();
        let text = generator.render(&model, "Acme.Catalog").unwrap();

        assert!(text.contains("    using System.Collections.Generic;\n"));
        assert!(text.contains("Task<List<Item>> ListItemsAsync(ListItemsRequest request);"));
    }

    #[test]
    fn test_render_without_header() {
        let output = OutputConfig {
            header: false,
            usings: vec![],
            ..OutputConfig::default()
        };
        let generator = ClientGenerator::new(output).unwrap();
        let text = generator.render(&GenerationModel::default(), "Empty").unwrap();
        assert_eq!(text, "namespace Empty\n{\n}\n");
    }

    #[test]
    fn test_render_rejects_blank_namespace() {
        let generator = ClientGenerator::new(OutputConfig::default()).unwrap();
        assert!(matches!(
            generator.render(&letters(), "  "),
            Err(GeneratorError::Config(_))
        ));
    }

    #[test]
    fn test_render_is_repeatable() {
        let generator = ClientGenerator::new(OutputConfig::default()).unwrap();
        let first = generator.render(&letters(), "Acme").unwrap();
        let second = generator.render(&letters(), "Acme").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_to_file_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Client.cs");
        let generator = ClientGenerator::new(OutputConfig::default()).unwrap();

        generator.generate_to_file(&letters(), "Acme", &path).unwrap();
        generator
            .generate_to_file(&GenerationModel::default(), "Acme", &path)
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("Letter"));
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
