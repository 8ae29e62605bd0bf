//! Declaration synthesis in emission order

use crate::contract::synthesize_contract;
use crate::enumeration::synthesize_enum;
use crate::service::{synthesize_client, synthesize_interface};
use crate::syntax::Declaration;
use soap_client_generator_common::{GenerationModel, OutputConfig, Result};
use tracing::debug;

/// Build the output declarations of a model
///
/// Interface and client pairs come first, then contracts, then enums, each
/// group in model order. Fails without partial output when any operation has
/// an unsupported shape.
pub fn synthesize(model: &GenerationModel, output: &OutputConfig) -> Result<Vec<Declaration>> {
    let mut declarations =
        Vec::with_capacity(model.services.len() * 2 + model.contracts.len() + model.enums.len());

    for service in &model.services {
        debug!(service = %service.name, operations = service.operations.len(), "synthesizing service");
        declarations.push(Declaration::Interface(synthesize_interface(service)));
        declarations.push(Declaration::Class(synthesize_client(service, output)?));
    }

    declarations.extend(
        model
            .contracts
            .iter()
            .map(|contract| Declaration::Class(synthesize_contract(contract))),
    );
    declarations.extend(
        model
            .enums
            .iter()
            .map(|descriptor| Declaration::Enum(synthesize_enum(descriptor))),
    );

    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_client_generator_common::{
        ContractDescriptor, EnumDescriptor, GeneratorError, OperationDescriptor,
        ParameterDescriptor, ServiceDescriptor, TypeName,
    };

    fn model() -> GenerationModel {
        let operation = OperationDescriptor {
            name: "DoWork".into(),
            parameters: vec![ParameterDescriptor {
                name: "request".into(),
                type_name: TypeName::named("Request"),
            }],
            return_type: TypeName::generic("Task", vec![TypeName::named("Response")]),
            response_type: TypeName::named("Response"),
            action: "urn:DoWork".into(),
            request_body: None,
        };
        let contract = |name: &str| ContractDescriptor {
            name: name.into(),
            base_type: None,
            includes: vec![],
            root: None,
            fields: vec![],
            properties: vec![],
        };

        GenerationModel {
            services: vec![
                ServiceDescriptor {
                    name: "IFirst".into(),
                    operations: vec![operation.clone()],
                },
                ServiceDescriptor {
                    name: "ISecond".into(),
                    operations: vec![operation],
                },
            ],
            contracts: vec![contract("Request"), contract("Response")],
            enums: vec![EnumDescriptor {
                name: "Kind".into(),
                is_flags: false,
                members: vec![],
            }],
        }
    }

    #[test]
    fn test_emission_order() {
        let declarations = synthesize(&model(), &OutputConfig::default()).unwrap();
        let names: Vec<_> = declarations.iter().map(Declaration::name).collect();
        assert_eq!(
            names,
            vec![
                "IFirst",
                "IFirstClient",
                "ISecond",
                "ISecondClient",
                "Request",
                "Response",
                "Kind"
            ]
        );
        assert!(matches!(declarations[0], Declaration::Interface(_)));
        assert!(matches!(declarations[6], Declaration::Enum(_)));
    }

    #[test]
    fn test_empty_model() {
        let declarations = synthesize(&GenerationModel::default(), &OutputConfig::default()).unwrap();
        assert!(declarations.is_empty());
    }

    #[test]
    fn test_unsupported_shape_aborts() {
        let mut model = model();
        model.services[1].operations[0].parameters.clear();
        assert!(matches!(
            synthesize(&model, &OutputConfig::default()),
            Err(GeneratorError::UnsupportedShape(_))
        ));
    }
}
