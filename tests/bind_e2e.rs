use std::sync::Arc;

use entbind::{
    BindOutcome, BindRequest, BindingTarget, BinderOptions, BodyPolicy, EntityBinderProvider,
    EntityDescriptor, EntityRecord, FieldKind, InMemoryEntitySource, ResolutionKind, Value,
};

fn order_descriptor() -> EntityDescriptor {
    EntityDescriptor::builder("Order")
        .field("OrderNo", FieldKind::String)
        .field("Customer", FieldKind::String)
        .field("Amount", FieldKind::Float)
        .field("ShipDate", FieldKind::DateTime)
        .field("Paid", FieldKind::Bool)
        .field("Lines", FieldKind::Complex)
        .unique_key("OrderNo")
        .build()
        .unwrap()
}

fn line_descriptor() -> EntityDescriptor {
    EntityDescriptor::builder("OrderLine")
        .field("OrderId", FieldKind::Int)
        .field("LineNo", FieldKind::Int)
        .field("Sku", FieldKind::String)
        .field("Qty", FieldKind::Int)
        .primary_key("OrderId")
        .primary_key("LineNo")
        .build()
        .unwrap()
}

fn provider_with_data() -> (EntityBinderProvider, Arc<InMemoryEntitySource>) {
    let orders = Arc::new(InMemoryEntitySource::new(order_descriptor()));
    let mut order = EntityRecord::new("Order");
    order.set("OrderNo", Value::String("12345".to_string()));
    order.set("Customer", Value::String("ACME".to_string()));
    order.set("Amount", Value::Float(250.0));
    orders.insert(order).unwrap();

    let lines = Arc::new(InMemoryEntitySource::new(line_descriptor()));
    let mut line = EntityRecord::new("OrderLine");
    line.set("OrderId", Value::Int(7));
    line.set("LineNo", Value::Int(2));
    line.set("Sku", Value::String("SKU-1".to_string()));
    line.set("Qty", Value::Int(4));
    lines.insert(line).unwrap();

    let mut provider = EntityBinderProvider::new();
    provider.register(orders.clone());
    provider.register(lines);
    (provider, orders)
}

fn bind(provider: &EntityBinderProvider, entity: &str, request: &BindRequest) -> BindOutcome {
    provider
        .get_binder(&BindingTarget::new(entity))
        .unwrap()
        .expect("entity type should be registered")
        .bind(request)
        .unwrap()
}

#[test]
fn unique_key_match_returns_existing_record() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder().route("OrderNo", "12345").build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(report.resolution, ResolutionKind::Existing);
    assert_eq!(
        report.entity.get("Customer"),
        Some(&Value::String("ACME".to_string()))
    );
}

#[test]
fn unique_key_miss_returns_new_blank_record() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder().route("OrderNo", "99999").build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(report.resolution, ResolutionKind::Created);
    // Defaults applied on creation; field values come from form, query,
    // or body only, so the route key does not flow into the record.
    assert_eq!(report.entity.get("Amount"), Some(&Value::Float(0.0)));
    assert_eq!(
        report.entity.get("OrderNo"),
        Some(&Value::String(String::new()))
    );
}

#[test]
fn composite_key_match_returns_existing_record() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .query("OrderId", "7")
        .query("LineNo", "2")
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "OrderLine", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(report.resolution, ResolutionKind::Existing);
    assert_eq!(
        report.entity.get("Sku"),
        Some(&Value::String("SKU-1".to_string()))
    );
}

#[test]
fn composite_key_miss_returns_new_record() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .query("OrderId", "7")
        .query("LineNo", "99")
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "OrderLine", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(report.resolution, ResolutionKind::Created);
}

#[test]
fn composite_key_coercion_failure_is_a_bind_error() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .query("OrderId", "not-a-number")
        .query("LineNo", "2")
        .build();
    let err = provider
        .get_binder(&BindingTarget::new("OrderLine"))
        .unwrap()
        .unwrap()
        .bind(&request)
        .unwrap_err();

    assert!(err.is_key_coercion());
}

#[test]
fn empty_date_field_is_left_unset_without_error() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "99999")
        .form("ShipDate", "")
        .form("Amount", "10")
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    assert!(report.field_errors.is_empty());
    assert_eq!(report.entity.get("ShipDate"), Some(&Value::Null));
    assert_eq!(report.entity.get("Amount"), Some(&Value::Float(10.0)));
}

#[test]
fn repeated_string_field_binds_all_values_joined() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "99999")
        .form("Customer", "3")
        .form("Customer", "2")
        .form("Customer", "5")
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(
        report.entity.get("Customer"),
        Some(&Value::String("3,2,5".to_string()))
    );
}

#[test]
fn json_body_overrides_form_values() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "12345")
        .form("Amount", "1.0")
        .form("Customer", "FormCo")
        .content_type("application/json; charset=utf-8")
        .body(br#"{"Amount": 777.5, "Paid": true}"#.to_vec())
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    // Payload entries win; fields absent from the payload fall back.
    assert_eq!(report.entity.get("Amount"), Some(&Value::Float(777.5)));
    assert_eq!(report.entity.get("Paid"), Some(&Value::Bool(true)));
    assert_eq!(
        report.entity.get("Customer"),
        Some(&Value::String("FormCo".to_string()))
    );
}

#[test]
fn json_body_does_not_change_which_record_resolves() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "12345")
        .content_type("application/json")
        .body(br#"{"OrderNo": "99999"}"#.to_vec())
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    // Resolution used the route key; the payload only affects field values.
    assert_eq!(report.resolution, ResolutionKind::Existing);
    assert_eq!(
        report.entity.get("OrderNo"),
        Some(&Value::String("99999".to_string()))
    );
}

#[test]
fn malformed_json_body_fails_strict_and_degrades_lenient() {
    let (strict_provider, orders) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "12345")
        .form("Amount", "5.0")
        .content_type("application/json")
        .body(b"{oops".to_vec())
        .build();

    let err = strict_provider
        .get_binder(&BindingTarget::new("Order"))
        .unwrap()
        .unwrap()
        .bind(&request)
        .unwrap_err();
    assert!(err.is_body());

    let mut lenient_provider = EntityBinderProvider::with_options(BinderOptions {
        body_policy: BodyPolicy::Lenient,
        ..BinderOptions::default()
    });
    lenient_provider.register(orders);

    let BindOutcome::Bound(report) = bind(&lenient_provider, "Order", &request) else {
        panic!("expected bound outcome");
    };
    assert_eq!(report.entity.get("Amount"), Some(&Value::Float(5.0)));
}

#[test]
fn unregistered_type_defers_to_host_default_chain() {
    let (provider, _) = provider_with_data();

    let binder = provider
        .get_binder(&BindingTarget::new("Invoice"))
        .unwrap();
    assert!(binder.is_none());
}

#[test]
fn empty_binding_target_is_rejected() {
    let (provider, _) = provider_with_data();

    let err = provider.get_binder(&BindingTarget::new("")).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn per_field_errors_surface_without_failing_the_bind() {
    let (provider, _) = provider_with_data();

    let request = BindRequest::builder()
        .route("OrderNo", "99999")
        .form("Amount", "lots")
        .form("Customer", "ACME")
        .build();
    let BindOutcome::Bound(report) = bind(&provider, "Order", &request) else {
        panic!("expected bound outcome");
    };

    assert_eq!(report.field_errors.len(), 1);
    assert_eq!(report.field_errors[0].field, "Amount");
    // The valid field still bound.
    assert_eq!(
        report.entity.get("Customer"),
        Some(&Value::String("ACME".to_string()))
    );
}
