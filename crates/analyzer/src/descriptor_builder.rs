//! Descriptor building for classified declarations

use crate::analyzer::AnalysisWarning;
use crate::metadata::{body_member, extract_field, extract_property, first_present, root_element};
use crate::type_resolver::{is_primitive, resolve};
use soap_client_generator_common::{
    BodyMember, ContractDescriptor, EnumDescriptor, EnumMemberDescriptor, OperationDescriptor,
    ParameterDescriptor, ServiceDescriptor,
};
use soap_client_generator_parser::{
    Annotated, Annotation, AnnotationKind, DeclId, MethodDeclaration, SourceListing,
};
use tracing::{debug, warn};

/// Namespace WCF assumes when a service contract names none
const DEFAULT_SERVICE_NAMESPACE: &str = "http://tempuri.org/";

/// Whether a method is an asynchronous, annotation-marked operation
pub fn is_async_operation(method: &MethodDeclaration) -> bool {
    method.return_type.short_name() == "Task"
        && method.return_type.is_generic()
        && method.has_annotation(&AnnotationKind::OperationContract)
}

/// Build the descriptor of a service contract interface
pub fn build_service(
    listing: &SourceListing,
    id: DeclId,
    warnings: &mut Vec<AnalysisWarning>,
) -> ServiceDescriptor {
    let declaration = listing.get(id);
    let contract = declaration.annotation(&AnnotationKind::ServiceContract);

    let mut operations = Vec::new();
    for method in declaration.methods() {
        if !is_async_operation(method) {
            debug!(service = %declaration.name, method = %method.name, "skipping non-async operation");
            continue;
        }
        let Some(operation) = method.annotation(&AnnotationKind::OperationContract) else {
            continue;
        };

        let parameters: Vec<_> = method
            .parameters
            .iter()
            .map(|parameter| ParameterDescriptor {
                name: parameter.name.clone(),
                type_name: resolve(&parameter.type_syntax),
            })
            .collect();

        if parameters.len() != 1 {
            warn!(
                service = %declaration.name,
                operation = %method.name,
                parameters = parameters.len(),
                "operation does not take exactly one request parameter"
            );
            warnings.push(AnalysisWarning::ParameterCount {
                service: declaration.name.clone(),
                operation: method.name.clone(),
                count: parameters.len(),
            });
        }

        let request_body = match method.parameters.as_slice() {
            [parameter] => {
                let request = listing.lookup_from(id, &parameter.type_syntax);
                if request.is_none() && !is_primitive(&parameter.type_syntax.canonical_name()) {
                    warnings.push(AnalysisWarning::UnresolvedRequestType {
                        service: declaration.name.clone(),
                        operation: method.name.clone(),
                        type_name: parameter.type_syntax.to_string(),
                    });
                }
                request
                    .and_then(|request| body_member(listing.get(request)))
                    .map(|field| BodyMember {
                        field_name: field.name.clone(),
                        type_name: resolve(&field.type_syntax),
                    })
            }
            _ => None,
        };

        let response = &method.return_type.type_args()[0];

        operations.push(OperationDescriptor {
            name: method.name.clone(),
            parameters,
            return_type: resolve(&method.return_type),
            response_type: resolve(response),
            action: action(&declaration.name, contract, method, operation),
            request_body,
        });
    }

    if operations.is_empty() {
        warnings.push(AnalysisWarning::NoOperations {
            service: declaration.name.clone(),
        });
    }

    ServiceDescriptor {
        name: declaration.name.clone(),
        operations,
    }
}

/// Wire action of an operation
///
/// Taken from the operation annotation; without one, WCF's default
/// `<namespace>/<contract>/<operation>` applies.
fn action(
    interface_name: &str,
    contract: Option<&Annotation>,
    method: &MethodDeclaration,
    operation: &Annotation,
) -> String {
    if let Some(action) = operation.named_str("Action") {
        return action.to_string();
    }

    let namespace = contract
        .and_then(|c| c.named_non_empty("Namespace"))
        .unwrap_or(DEFAULT_SERVICE_NAMESPACE);
    let contract_name = contract
        .and_then(|c| c.named_non_empty("Name"))
        .unwrap_or(interface_name);
    let method_name = method.name.strip_suffix("Async").unwrap_or(&method.name);
    let operation_name = operation.named_non_empty("Name").unwrap_or(method_name);

    let separator = if namespace.ends_with('/') { "" } else { "/" };
    format!("{namespace}{separator}{contract_name}/{operation_name}")
}

/// Build the descriptor of a data or message contract class
pub fn build_contract(listing: &SourceListing, id: DeclId) -> ContractDescriptor {
    let declaration = listing.get(id);

    let base_type = listing
        .base_type_syntax(id)
        .filter(|base| base.canonical_name() != "object")
        .map(resolve);

    let includes = declaration
        .annotations_of(&AnnotationKind::XmlInclude)
        .filter_map(|include| include.positional_type())
        .map(resolve)
        .collect();

    let fields: Vec<_> = declaration.fields().filter_map(extract_field).collect();
    let properties: Vec<_> = declaration.properties().filter_map(extract_property).collect();
    debug!(
        contract = %declaration.name,
        fields = fields.len(),
        properties = properties.len(),
        "built contract"
    );

    ContractDescriptor {
        name: declaration.name.clone(),
        base_type,
        includes,
        root: root_element(declaration),
        fields,
        properties,
    }
}

/// Build the descriptor of an enumeration
pub fn build_enum(listing: &SourceListing, id: DeclId) -> EnumDescriptor {
    let declaration = listing.get(id);

    let members = declaration
        .enum_members
        .iter()
        .map(|member| {
            let wire = member.annotation(&AnnotationKind::XmlEnum);
            EnumMemberDescriptor {
                name: member.name.clone(),
                wire_value: wire
                    .and_then(|a| first_present([a.positional_str(), a.named_str("Name")]))
                    .map(str::to_string),
                value: member.value.as_ref().map(|value| value.to_string()),
            }
        })
        .collect();

    EnumDescriptor {
        name: declaration.name.clone(),
        is_flags: declaration.has_annotation(&AnnotationKind::Flags),
        members,
    }
}
