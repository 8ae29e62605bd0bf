//! Declaration classification
//!
//! Buckets the top-level declarations of a listing into service interfaces,
//! contract types and enums. The order of each bucket follows the listing and
//! becomes the emission order of the generated file.

use soap_client_generator_parser::{
    Annotated, AnnotationKind, DeclId, DeclarationKind, SourceListing,
};
use tracing::debug;

/// Handles of the declarations the generator cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedDeclarations {
    pub services: Vec<DeclId>,
    pub contracts: Vec<DeclId>,
    pub enums: Vec<DeclId>,
}

impl ClassifiedDeclarations {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.contracts.is_empty() && self.enums.is_empty()
    }
}

/// Classify every top-level declaration of a listing
///
/// - enums are always kept
/// - interfaces are kept when marked as a service contract
/// - classes are kept when marked as a data or message contract
///
/// Everything else, nested declarations included, is ignored.
pub fn classify(listing: &SourceListing) -> ClassifiedDeclarations {
    let mut classified = ClassifiedDeclarations::default();

    for (id, declaration) in listing.declarations() {
        if !listing.is_top_level(id) {
            continue;
        }

        match declaration.kind {
            DeclarationKind::Enum => {
                debug!(name = %declaration.name, "classified enum");
                classified.enums.push(id);
            }
            DeclarationKind::Interface
                if declaration.has_annotation(&AnnotationKind::ServiceContract) =>
            {
                debug!(name = %declaration.name, "classified service contract");
                classified.services.push(id);
            }
            DeclarationKind::Class
                if declaration.has_annotation(&AnnotationKind::DataContract)
                    || declaration.has_annotation(&AnnotationKind::MessageContract) =>
            {
                debug!(name = %declaration.name, "classified contract");
                classified.contracts.push(id);
            }
            _ => {}
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(listing: &SourceListing, ids: &[DeclId]) -> Vec<String> {
        ids.iter().map(|id| listing.get(*id).name.clone()).collect()
    }

    #[test]
    fn test_empty_listing() {
        let listing = SourceListing::parse("").unwrap();
        let classified = classify(&listing);
        assert!(classified.is_empty());
    }

    #[test]
    fn test_buckets_in_source_order() {
        let source = r#"
            namespace N
            {
                public enum Zeta { A }
                [System.ServiceModel.ServiceContractAttribute()]
                public interface IFirst {}
                [System.Runtime.Serialization.DataContractAttribute()]
                public class Data {}
                public interface IPlain {}
                [System.ServiceModel.MessageContractAttribute(IsWrapped=false)]
                public partial class Message {}
                public class Helper {}
                public enum Alpha { B }
                [System.ServiceModel.ServiceContract]
                public interface ISecond {}
                [System.ServiceModel.ServiceContractAttribute()]
                public class NotAnInterface {}
                [System.Runtime.Serialization.DataContractAttribute()]
                public struct NotAClass {}
            }
        "#;
        let listing = SourceListing::parse(source).unwrap();
        let classified = classify(&listing);

        assert_eq!(names(&listing, &classified.services), vec!["IFirst", "ISecond"]);
        assert_eq!(names(&listing, &classified.contracts), vec!["Data", "Message"]);
        assert_eq!(names(&listing, &classified.enums), vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_nested_declarations_are_ignored() {
        let source = r#"
            [System.Runtime.Serialization.DataContractAttribute()]
            public class Outer
            {
                public enum Inner { A }
            }
        "#;
        let listing = SourceListing::parse(source).unwrap();
        let classified = classify(&listing);

        assert_eq!(names(&listing, &classified.contracts), vec!["Outer"]);
        assert!(classified.enums.is_empty());
    }

    #[test]
    fn test_classification_is_repeatable() {
        let source = "[ServiceContract] interface IA {} enum B { X }";
        let listing = SourceListing::parse(source).unwrap();
        assert_eq!(classify(&listing), classify(&listing));
    }
}
