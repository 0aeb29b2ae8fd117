//! 构建脚本生成的容器

use di_abstractions::{DependencyError, ServiceProvider, ServiceProviderExt};
use di_codegen_integration_tests::services;
use di_codegen_integration_tests::{Clock, Config, Connection, Logger, Request, Stamp};
use std::rc::Rc;

#[test]
fn test_singletons_are_shared_across_scopes() {
    let provider = services::ServiceProvider::new();

    let first = provider.create_scope();
    let second = provider.create_scope();
    let a = first
        .service_provider()
        .get_required_service::<dyn Logger>()
        .unwrap();
    let b = second
        .service_provider()
        .get_required_service::<dyn Logger>()
        .unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(a.format("ready"), "[42] ready");
}

#[test]
fn test_factory_builds_scoped_connection() {
    let provider = services::ServiceProvider::new();
    let scope = provider.create_scope();

    let connection = scope
        .service_provider()
        .get_required_service::<Connection>()
        .unwrap();
    assert_eq!(connection.database, "orders");
}

#[test]
fn test_request_shares_connection_within_scope() {
    let provider = services::ServiceProvider::new();
    let scope = provider.create_scope();
    let services = scope.service_provider();

    let request = services.get_required_service::<Request>().unwrap();
    let connection = services.get_required_service::<Connection>().unwrap();
    assert!(Rc::ptr_eq(&request.connection, &connection));
    assert_eq!(request.config.database, "orders");
    assert_eq!(request.describe(), "[42] orders");
}

#[test]
fn test_scope_disposal_closes_connection() {
    let provider = services::ServiceProvider::new();
    let scope = provider.create_scope();
    let connection = scope
        .service_provider()
        .get_required_service::<Connection>()
        .unwrap();
    assert!(!connection.is_closed());

    scope.dispose();
    assert!(connection.is_closed());
}

#[test]
fn test_named_constructor_for_transient() {
    let provider = services::ServiceProvider::new();

    let first = provider.get_required_service::<Stamp>().unwrap();
    let second = provider.get_required_service::<Stamp>().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(first.value, 42);
}

#[test]
fn test_root_does_not_resolve_scoped_services() {
    let provider = services::ServiceProvider::new();

    assert!(provider.get_service::<Connection>().unwrap().is_none());
    assert!(matches!(
        provider.get_required_service::<Request>(),
        Err(DependencyError::ServiceNotRegistered { .. })
    ));
    assert!(provider.get_service::<Clock>().unwrap().is_some());
    assert!(provider.get_service::<Config>().unwrap().is_some());
}
