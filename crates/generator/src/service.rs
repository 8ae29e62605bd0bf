//! Client interface and implementation synthesis

use crate::syntax::{
    ClassDecl, Expr, InterfaceDecl, Member, MethodDecl, Modifier, Parameter, Stmt,
};
use soap_client_generator_common::{
    GeneratorError, OperationDescriptor, OutputConfig, Result, ServiceDescriptor, TypeName,
};
use tracing::debug;

/// Public interface with one signature per qualifying operation
pub fn synthesize_interface(service: &ServiceDescriptor) -> InterfaceDecl {
    let methods = service
        .operations
        .iter()
        .map(|operation| MethodDecl {
            modifiers: vec![],
            return_type: operation.return_type.clone(),
            name: operation.name.clone(),
            parameters: parameters(operation),
            body: None,
        })
        .collect();

    InterfaceDecl {
        name: service.name.clone(),
        methods,
    }
}

/// `public partial class <Interface>Client : <base>, <Interface>`
///
/// Each method delegates to the base class call operation. Operations must
/// take exactly one request parameter.
pub fn synthesize_client(service: &ServiceDescriptor, output: &OutputConfig) -> Result<ClassDecl> {
    let members = service
        .operations
        .iter()
        .map(|operation| client_method(service, operation, output).map(Member::Method))
        .collect::<Result<Vec<_>>>()?;

    Ok(ClassDecl {
        attributes: vec![],
        modifiers: vec![Modifier::Public, Modifier::Partial],
        name: client_name(service),
        base_types: vec![
            TypeName::named(output.client_base_type.as_str()),
            TypeName::named(service.name.as_str()),
        ],
        members,
    })
}

pub fn client_name(service: &ServiceDescriptor) -> String {
    format!("{}Client", service.name)
}

fn client_method(
    service: &ServiceDescriptor,
    operation: &OperationDescriptor,
    output: &OutputConfig,
) -> Result<MethodDecl> {
    let [request] = operation.parameters.as_slice() else {
        return Err(GeneratorError::UnsupportedShape(format!(
            "{}.{} takes {} parameters; exactly one request parameter is supported",
            service.name,
            operation.name,
            operation.parameters.len()
        )));
    };

    let (body_type, argument) = match &operation.request_body {
        Some(body) => (
            body.type_name.clone(),
            Expr::identifier(request.name.as_str()).member(body.field_name.as_str()),
        ),
        None => (
            request.type_name.clone(),
            Expr::identifier(request.name.as_str()),
        ),
    };

    debug!(
        service = %service.name,
        operation = %operation.name,
        action = %operation.action,
        body = %body_type,
        "synthesized client method"
    );

    let call = Expr::This.member(output.call_method.as_str()).invoke(
        vec![body_type, operation.response_type.clone()],
        vec![Expr::string(operation.action.as_str()), argument],
    );

    Ok(MethodDecl {
        modifiers: vec![Modifier::Public, Modifier::Virtual],
        return_type: operation.return_type.clone(),
        name: operation.name.clone(),
        parameters: parameters(operation),
        body: Some(vec![Stmt::Return(call)]),
    })
}

fn parameters(operation: &OperationDescriptor) -> Vec<Parameter> {
    operation
        .parameters
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            type_name: p.type_name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_expr;
    use soap_client_generator_common::{BodyMember, ParameterDescriptor};

    fn operation(name: &str, parameters: &[(&str, &str)]) -> OperationDescriptor {
        OperationDescriptor {
            name: name.into(),
            parameters: parameters
                .iter()
                .map(|(name, ty)| ParameterDescriptor {
                    name: name.to_string(),
                    type_name: TypeName::named(*ty),
                })
                .collect(),
            return_type: TypeName::generic("Task", vec![TypeName::named("Response")]),
            response_type: TypeName::named("Response"),
            action: "urn:DoWork".into(),
            request_body: None,
        }
    }

    fn worker(operations: Vec<OperationDescriptor>) -> ServiceDescriptor {
        ServiceDescriptor {
            name: "IWorker".into(),
            operations,
        }
    }

    fn call_of(method: &MethodDecl) -> String {
        match method.body.as_deref() {
            Some([Stmt::Return(expr)]) => print_expr(expr),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_interface_mirrors_operations() {
        let service = worker(vec![operation("DoWork", &[("request", "Request")])]);
        let interface = synthesize_interface(&service);

        assert_eq!(interface.name, "IWorker");
        assert_eq!(interface.methods.len(), 1);
        let method = &interface.methods[0];
        assert_eq!(method.name, "DoWork");
        assert_eq!(method.return_type.to_string(), "Task<Response>");
        assert_eq!(method.parameters[0].name, "request");
        assert_eq!(method.parameters[0].type_name, TypeName::named("Request"));
        assert!(method.body.is_none());
    }

    #[test]
    fn test_client_passes_whole_request() {
        let service = worker(vec![operation("DoWork", &[("request", "Request")])]);
        let client = synthesize_client(&service, &OutputConfig::default()).unwrap();

        assert_eq!(client.name, "IWorkerClient");
        assert_eq!(client.modifiers, vec![Modifier::Public, Modifier::Partial]);
        assert_eq!(
            client.base_types,
            vec![
                TypeName::named("SoapServices.SoapClientBase"),
                TypeName::named("IWorker")
            ]
        );

        let method = client.methods().next().unwrap();
        assert_eq!(method.modifiers, vec![Modifier::Public, Modifier::Virtual]);
        assert_eq!(
            call_of(method),
            "this.CallAsync<Request, Response>(\"urn:DoWork\", request)"
        );
    }

    #[test]
    fn test_client_passes_body_field() {
        let mut op = operation("GetForecastAsync", &[("request", "GetForecastRequest")]);
        op.request_body = Some(BodyMember {
            field_name: "city".into(),
            type_name: TypeName::named("string"),
        });
        let client = synthesize_client(&worker(vec![op]), &OutputConfig::default()).unwrap();

        let method = client.methods().next().unwrap();
        assert_eq!(
            call_of(method),
            "this.CallAsync<string, Response>(\"urn:DoWork\", request.city)"
        );
    }

    #[test]
    fn test_client_uses_configured_call_method() {
        let output = OutputConfig {
            call_method: "InvokeAsync".into(),
            client_base_type: "Acme.ClientBase".into(),
            ..OutputConfig::default()
        };
        let service = worker(vec![operation("DoWork", &[("request", "Request")])]);
        let client = synthesize_client(&service, &output).unwrap();

        assert_eq!(client.base_types[0], TypeName::named("Acme.ClientBase"));
        assert!(call_of(client.methods().next().unwrap()).starts_with("this.InvokeAsync<"));
    }

    #[test]
    fn test_multi_parameter_operation_is_unsupported() {
        let service = worker(vec![operation("Add", &[("a", "int"), ("b", "int")])]);
        let result = synthesize_client(&service, &OutputConfig::default());

        match result {
            Err(GeneratorError::UnsupportedShape(message)) => {
                assert_eq!(
                    message,
                    "IWorker.Add takes 2 parameters; exactly one request parameter is supported"
                );
            }
            other => panic!("expected UnsupportedShape, got {:?}", other),
        }
    }

    #[test]
    fn test_parameterless_operation_is_unsupported() {
        let service = worker(vec![operation("Ping", &[])]);
        assert!(matches!(
            synthesize_client(&service, &OutputConfig::default()),
            Err(GeneratorError::UnsupportedShape(_))
        ));
    }
}
