//! Parsing of svcutil proxy listings
//!
//! This crate turns the C# source that svcutil emits into a declaration tree:
//! namespaces, type declarations, member signatures and their bound
//! annotations. Method and accessor bodies are skipped.
//!
//! ## Structure
//!
//! - [`lexer`] tokenizes the listing
//! - the parser builds [`TypeDeclaration`]s with typed [`Annotation`]s
//! - [`SourceListing`] indexes the declarations for lookup by [`DeclId`]

mod annotations;
pub mod lexer;
mod model;
mod parser;
mod syntax;

pub use annotations::{Annotated, Annotation, AnnotationKind};
pub use model::{DeclId, SourceListing};
pub use parser::parse_declarations;
pub use syntax::{
    DeclarationKind, EnumMemberDeclaration, Expr, FieldDeclaration, MemberDeclaration,
    MethodDeclaration, ParameterSyntax, PropertyDeclaration, TypeDeclaration, TypeSyntax,
};

use soap_client_generator_common::Result;
use tracing::debug;

/// Parse a proxy listing into an indexed [`SourceListing`]
///
/// # Arguments
/// * `source` - Full text of the listing
///
/// # Returns
/// * `SourceListing` - Every type declaration, nested ones included
pub fn parse_listing(source: &str) -> Result<SourceListing> {
    let listing = SourceListing::parse(source)?;
    debug!(declarations = listing.len(), "parsed proxy listing");
    Ok(listing)
}
