//! Core listing analysis orchestration

use crate::classifier::{classify, ClassifiedDeclarations};
use crate::descriptor_builder::{build_contract, build_enum, build_service};
use serde::Serialize;
use soap_client_generator_common::GenerationModel;
use soap_client_generator_parser::SourceListing;
use std::fmt;
use tracing::info;

/// Listing analyzer - main entry point
pub struct ListingAnalyzer<'a> {
    listing: &'a SourceListing,
}

/// Complete analysis result
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Classified declaration handles, in emission order
    pub classified: ClassifiedDeclarations,
    /// Descriptors for the synthesizer
    pub model: GenerationModel,
    /// Shapes that need attention before or during synthesis
    pub warnings: Vec<AnalysisWarning>,
}

/// Warning about analysis results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// An operation without exactly one request parameter
    ParameterCount {
        service: String,
        operation: String,
        count: usize,
    },
    /// A request parameter type that is not declared in the listing
    UnresolvedRequestType {
        service: String,
        operation: String,
        type_name: String,
    },
    /// A service contract without a single qualifying operation
    NoOperations { service: String },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::ParameterCount {
                service,
                operation,
                count,
            } => write!(
                f,
                "{service}.{operation} takes {count} parameters; exactly one request parameter is supported"
            ),
            AnalysisWarning::UnresolvedRequestType {
                service,
                operation,
                type_name,
            } => write!(
                f,
                "{service}.{operation}: request type {type_name} is not declared in the listing; passing it as the body"
            ),
            AnalysisWarning::NoOperations { service } => {
                write!(f, "{service} has no asynchronous operations")
            }
        }
    }
}

impl<'a> ListingAnalyzer<'a> {
    /// Create an analyzer over a parsed listing
    pub fn new(listing: &'a SourceListing) -> Self {
        Self { listing }
    }

    /// Run classification and descriptor building
    pub fn analyze(&self) -> AnalysisResult {
        // Phase 1: classify declarations
        let classified = classify(self.listing);
        info!(
            services = classified.services.len(),
            contracts = classified.contracts.len(),
            enums = classified.enums.len(),
            "classified declarations"
        );

        // Phase 2: build descriptors in classification order
        let mut warnings = Vec::new();
        let services = classified
            .services
            .iter()
            .map(|id| build_service(self.listing, *id, &mut warnings))
            .collect();
        let contracts = classified
            .contracts
            .iter()
            .map(|id| build_contract(self.listing, *id))
            .collect();
        let enums = classified
            .enums
            .iter()
            .map(|id| build_enum(self.listing, *id))
            .collect();

        if !warnings.is_empty() {
            info!(warnings = warnings.len(), "analysis produced warnings");
        }

        AnalysisResult {
            classified,
            model: GenerationModel {
                services,
                contracts,
                enums,
            },
            warnings,
        }
    }
}

impl AnalysisResult {
    /// Total number of qualifying operations across all services
    pub fn operation_count(&self) -> usize {
        self.model
            .services
            .iter()
            .map(|service| service.operations.len())
            .sum()
    }
}
