//! Integration tests for parsing svcutil proxy listings

use soap_client_generator_parser::{
    parse_listing, Annotated, AnnotationKind, DeclarationKind, Expr, TypeSyntax,
};
use std::fs;
use std::path::PathBuf;

fn load_fixture() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/weather_proxy.cs");
    fs::read_to_string(&path).expect("fixture should be readable")
}

#[test]
fn test_parse_weather_listing() {
    let listing = parse_listing(&load_fixture());
    assert!(listing.is_ok(), "Failed to parse listing: {:?}", listing.err());

    let listing = listing.unwrap();
    let names: Vec<_> = listing
        .declarations()
        .map(|(_, d)| d.qualified_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "Weather.Proxy.Forecast",
            "Weather.Proxy.Condition",
            "Weather.Proxy.GetForecastRequest",
            "Weather.Proxy.GetForecastResponse",
            "Weather.Proxy.PingRequest",
            "Weather.Proxy.PingBody",
            "Weather.Proxy.IWeatherService",
            "Weather.Proxy.IWeatherServiceChannel",
            "Weather.Proxy.WeatherServiceClient",
        ]
    );
}

#[test]
fn test_service_interface_shape() {
    let listing = parse_listing(&load_fixture()).unwrap();
    let id = listing
        .lookup(&TypeSyntax::simple("IWeatherService"))
        .expect("service interface should resolve");
    let service = listing.get(id);

    assert_eq!(service.kind, DeclarationKind::Interface);
    assert!(service.has_annotation(&AnnotationKind::ServiceContract));

    let methods: Vec<_> = service.methods().collect();
    assert_eq!(methods.len(), 4);

    let async_forecast = methods[1];
    assert_eq!(async_forecast.name, "GetForecastAsync");
    assert_eq!(async_forecast.return_type.short_name(), "Task");
    assert_eq!(
        async_forecast.return_type.type_args()[0].short_name(),
        "GetForecastResponse"
    );

    let operation = async_forecast
        .annotation(&AnnotationKind::OperationContract)
        .unwrap();
    assert_eq!(
        operation.named_str("Action"),
        Some("http://example.com/weather/GetForecast")
    );
}

#[test]
fn test_message_contract_fields() {
    let listing = parse_listing(&load_fixture()).unwrap();
    let id = listing
        .lookup(&TypeSyntax::simple("GetForecastRequest"))
        .unwrap();
    let request = listing.get(id);

    let contract = request
        .annotation(&AnnotationKind::MessageContract)
        .unwrap();
    assert_eq!(contract.named_str("WrapperName"), Some("GetForecast"));
    assert_eq!(contract.named_bool("IsWrapped"), Some(true));

    let fields: Vec<_> = request.fields().collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "city");
    assert!(fields[0].has_annotation(&AnnotationKind::XmlElement));
    assert_eq!(
        fields[1]
            .annotation(&AnnotationKind::MessageBodyMember)
            .and_then(|a| a.named_int("Order")),
        Some(1)
    );
}

#[test]
fn test_data_contract_properties() {
    let listing = parse_listing(&load_fixture()).unwrap();
    let id = listing.lookup(&TypeSyntax::simple("Forecast")).unwrap();
    let forecast = listing.get(id);

    let properties: Vec<_> = forecast.properties().map(|p| p.name.as_str()).collect();
    assert_eq!(
        properties,
        vec![
            "City",
            "Day",
            "Temperature",
            "Condition",
            "Alerts",
            "unit",
            "Any",
            "ExtensionData"
        ]
    );

    let temperature = forecast.properties().nth(2).unwrap();
    assert_eq!(temperature.type_syntax.canonical_name(), "double?");

    let alerts = forecast.properties().nth(4).unwrap();
    let item = alerts.annotation(&AnnotationKind::XmlArrayItem).unwrap();
    assert_eq!(item.positional_str(), Some("alert"));
    assert_eq!(item.named_bool("IsNullable"), Some(false));

    let unit = forecast.properties().nth(5).unwrap();
    let attribute = unit.annotation(&AnnotationKind::XmlAttribute).unwrap();
    assert_eq!(
        attribute.named("Form").and_then(Expr::path_tail),
        Some("Qualified")
    );
}

#[test]
fn test_enum_declaration() {
    let listing = parse_listing(&load_fixture()).unwrap();
    let id = listing.lookup(&TypeSyntax::simple("Condition")).unwrap();
    let condition = listing.get(id);

    assert_eq!(condition.kind, DeclarationKind::Enum);
    let members: Vec<_> = condition
        .enum_members
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(members, vec!["Sunny", "PartlyCloudy", "Rain"]);
    assert_eq!(
        condition.enum_members[1]
            .annotation(&AnnotationKind::XmlEnum)
            .and_then(|a| a.positional_str()),
        Some("partly-cloudy")
    );
}

#[test]
fn test_client_class_base_list() {
    let listing = parse_listing(&load_fixture()).unwrap();
    let id = listing
        .lookup(&TypeSyntax::simple("WeatherServiceClient"))
        .unwrap();
    let client = listing.get(id);

    assert_eq!(client.base_list.len(), 2);
    assert_eq!(client.base_list[0].short_name(), "ClientBase");
    // explicit implementation, overload and async variant
    assert_eq!(client.methods().count(), 3);
    assert_eq!(
        listing
            .base_type_syntax(id)
            .map(|base| base.short_name().to_string()),
        Some("ClientBase".to_string())
    );
}
