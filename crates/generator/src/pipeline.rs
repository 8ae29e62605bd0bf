//! Run orchestration
//!
//! `tool → parse → classify → synthesize → emit`, strictly in that order. Any
//! stage failing aborts the run; the output file is only replaced once the
//! whole source has been rendered.

use crate::tool::ProxyTool;
use crate::ClientGenerator;
use serde::Serialize;
use soap_client_generator_analyzer::{AnalysisWarning, ListingAnalyzer};
use soap_client_generator_common::{GeneratorError, OutputConfig, Result};
use soap_client_generator_parser::parse_listing;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::{info, warn};

/// File name of the intermediate listing inside the run directory
const LISTING_FILE: &str = "proxy.cs";

/// Pipeline orchestrator
pub struct Pipeline<T: ProxyTool> {
    tool: T,
    generator: ClientGenerator,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub services: usize,
    pub operations: usize,
    pub contracts: usize,
    pub enums: usize,
    pub warnings: Vec<AnalysisWarning>,
}

impl<T: ProxyTool> Pipeline<T> {
    pub fn new(tool: T, output: OutputConfig) -> Result<Self> {
        Ok(Self {
            tool,
            generator: ClientGenerator::new(output)?,
        })
    }

    /// Generate client source for a description document
    ///
    /// The intermediate listing lives in a run directory that is removed on
    /// every exit path.
    pub fn run_document(&self, document: &str, output: &Path, namespace: &str) -> Result<RunSummary> {
        let run_dir = TempDir::new()?;
        let listing_path = run_dir.path().join(LISTING_FILE);

        info!(document, "generating proxy listing");
        self.tool.generate(document, &listing_path)?;

        let source = fs::read_to_string(&listing_path).map_err(|e| {
            GeneratorError::ExternalToolFailure(format!(
                "could not read generated listing {}: {}",
                listing_path.display(),
                e
            ))
        })?;

        self.run_source(&source, output, namespace)
            .map_err(|e| match e {
                GeneratorError::Parse(message) => GeneratorError::ExternalToolFailure(format!(
                    "generated listing is not parsable: {}",
                    message
                )),
                other => other,
            })
    }

    /// Generate client source from an existing proxy listing file
    pub fn run_listing(&self, listing: &Path, output: &Path, namespace: &str) -> Result<RunSummary> {
        let source = fs::read_to_string(listing)?;
        self.run_source(&source, output, namespace)
    }

    fn run_source(&self, source: &str, output: &Path, namespace: &str) -> Result<RunSummary> {
        info!(bytes = source.len(), "parsing listing");
        let listing = parse_listing(source)?;

        let analysis = ListingAnalyzer::new(&listing).analyze();
        for warning in &analysis.warnings {
            warn!("{}", warning);
        }

        info!(path = %output.display(), namespace, "emitting client source");
        self.generator
            .generate_to_file(&analysis.model, namespace, output)?;

        Ok(RunSummary {
            services: analysis.model.services.len(),
            operations: analysis.operation_count(),
            contracts: analysis.model.contracts.len(),
            enums: analysis.model.enums.len(),
            warnings: analysis.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::MockProxyTool;

    const LISTING: &str = r#"
namespace Generated
{
    [System.ServiceModel.ServiceContractAttribute()]
    public interface IWorker
    {
        [System.ServiceModel.OperationContractAttribute(Action="urn:DoWork", ReplyAction="*")]
        System.Threading.Tasks.Task<Generated.Response> DoWorkAsync(Generated.Request request);
    }

    [System.Runtime.Serialization.DataContractAttribute()]
    public partial class Request { }

    [System.Runtime.Serialization.DataContractAttribute()]
    public partial class Response { }
}
"#;

    fn writing_tool(contents: &'static str) -> MockProxyTool {
        let mut tool = MockProxyTool::new();
        tool.expect_generate()
            .withf(|document, _| document == "http://host/worker.svc?wsdl")
            .times(1)
            .returning(move |_, path| fs::write(path, contents).map_err(GeneratorError::from));
        tool
    }

    #[test]
    fn test_run_document() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Worker.cs");
        let pipeline = Pipeline::new(writing_tool(LISTING), OutputConfig::default()).unwrap();

        let summary = pipeline
            .run_document("http://host/worker.svc?wsdl", &output, "Acme.Worker")
            .unwrap();

        assert_eq!(summary.services, 1);
        assert_eq!(summary.operations, 1);
        assert_eq!(summary.contracts, 2);
        assert_eq!(summary.enums, 0);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("namespace Acme.Worker"));
        assert!(text.contains("Task<Response> DoWorkAsync(Request request);"));
        assert!(text.contains(
            "return this.CallAsync<Request, Response>(\"urn:DoWork\", request);"
        ));
    }

    #[test]
    fn test_tool_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Worker.cs");
        let mut tool = MockProxyTool::new();
        tool.expect_generate()
            .times(1)
            .returning(|_, _| Err(GeneratorError::ExternalToolFailure("exit code 2".into())));
        let pipeline = Pipeline::new(tool, OutputConfig::default()).unwrap();

        let result = pipeline.run_document("worker.wsdl", &output, "Acme");
        assert!(matches!(result, Err(GeneratorError::ExternalToolFailure(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_unparsable_listing_is_tool_failure() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Worker.cs");
        let pipeline =
            Pipeline::new(writing_tool("namespace Broken {"), OutputConfig::default()).unwrap();

        let result = pipeline.run_document("http://host/worker.svc?wsdl", &output, "Acme");
        assert!(matches!(result, Err(GeneratorError::ExternalToolFailure(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_unsupported_shape_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let listing = dir.path().join("proxy.cs");
        let output = dir.path().join("Calc.cs");
        fs::write(
            &listing,
            r#"
            [ServiceContract]
            public interface ICalc
            {
                [OperationContract(Action="urn:Add")]
                System.Threading.Tasks.Task<int> AddAsync(int a, int b);
            }
            "#,
        )
        .unwrap();
        fs::write(&output, "previous").unwrap();

        let pipeline = Pipeline::new(MockProxyTool::new(), OutputConfig::default()).unwrap();
        let result = pipeline.run_listing(&listing, &output, "Acme");

        assert!(matches!(result, Err(GeneratorError::UnsupportedShape(_))));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_run_listing_parse_error() {
        let dir = TempDir::new().unwrap();
        let listing = dir.path().join("proxy.cs");
        fs::write(&listing, "class {").unwrap();

        let pipeline = Pipeline::new(MockProxyTool::new(), OutputConfig::default()).unwrap();
        let result = pipeline.run_listing(&listing, &dir.path().join("out.cs"), "Acme");
        assert!(matches!(result, Err(GeneratorError::Parse(_))));
    }
}
