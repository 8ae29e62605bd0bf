//! Listing analysis for the SOAP client generator
//!
//! Classifies the declarations of a parsed proxy listing and derives the
//! descriptors the synthesizer works from.
//!
//! # Examples
//!
//! ```no_run
//! use soap_client_generator_analyzer::ListingAnalyzer;
//! use soap_client_generator_parser::parse_listing;
//!
//! let source = std::fs::read_to_string("proxy.cs").expect("read failed");
//! let listing = parse_listing(&source).expect("parse failed");
//! let result = ListingAnalyzer::new(&listing).analyze();
//!
//! println!("{} services", result.model.services.len());
//! ```

mod analyzer;
mod classifier;
mod descriptor_builder;
pub mod metadata;
pub mod type_resolver;

pub use analyzer::{AnalysisResult, AnalysisWarning, ListingAnalyzer};
pub use classifier::{classify, ClassifiedDeclarations};
pub use descriptor_builder::{build_contract, build_enum, build_service, is_async_operation};
