//! `#[service_module]` 生成容器的集成测试

use di_abstractions::{
    ComposedServiceProvider, DependencyError, ServiceProvider, ServiceProviderExt,
};
use service_macros_integration_tests::app::{self, container};
use service_macros_integration_tests::custom::{self, wiring};
use std::rc::Rc;

fn disposal_counts() -> (usize, usize, usize) {
    (
        app::session_disposals(),
        app::cache_disposals(),
        app::ticket_disposals(),
    )
}

#[test]
fn test_singleton_is_shared() {
    let provider = container::ServiceProvider::new();

    let first = provider.get_required_service::<app::Clock>().unwrap();
    let second = provider.get_required_service::<app::Clock>().unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // 克隆的句柄共享同一组单例
    let cloned = provider.clone();
    let third = cloned.get_required_service::<app::Clock>().unwrap();
    assert!(Rc::ptr_eq(&first, &third));
}

#[test]
fn test_transient_is_fresh_per_request() {
    let provider = container::ServiceProvider::new();

    let first = provider.get_required_service::<app::Ticket>().unwrap();
    let second = provider.get_required_service::<app::Ticket>().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    // 依赖的单例仍是同一个
    assert!(Rc::ptr_eq(&first.clock, &second.clock));
}

#[test]
fn test_scoped_is_shared_within_scope_only() {
    let provider = container::ServiceProvider::new();

    let scope = provider.create_scope();
    let first = scope
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();
    let second = scope
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    let other_scope = provider.create_scope();
    let third = other_scope
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();
    assert!(!Rc::ptr_eq(&first, &third));

    // 单例通过父提供者解析，跨作用域相同
    assert!(Rc::ptr_eq(&first.clock, &third.clock));
    let root_clock = provider.get_required_service::<app::Clock>().unwrap();
    assert!(Rc::ptr_eq(&first.clock, &root_clock));
}

#[test]
fn test_scoped_service_is_not_visible_from_root() {
    let provider = container::ServiceProvider::new();

    assert!(provider.get_service::<app::Session>().unwrap().is_none());
}

#[test]
fn test_contract_marker_key_resolves_to_trait_object() {
    let provider = container::ServiceProvider::new();

    let greeter = provider.get_required_service::<dyn app::Greeter>().unwrap();
    assert_eq!(greeter.greet(), "hello");

    // 实现类型本身不是服务键
    assert!(provider.get_service::<app::English>().unwrap().is_none());
}

#[test]
fn test_well_shaped_factory_is_used() {
    let provider = container::ServiceProvider::new();

    let settings = provider.get_required_service::<app::Settings>().unwrap();
    assert_eq!(settings.source, "factory");
}

#[test]
fn test_misshaped_factory_falls_back_to_constructor() {
    let provider = container::ServiceProvider::new();

    let counter = provider.get_required_service::<app::Counter>().unwrap();
    assert_eq!(counter.source, "constructor");
}

#[test]
fn test_constructor_clones_value_parameters() {
    let provider = container::ServiceProvider::new();

    let report = provider.get_required_service::<app::Report>().unwrap();
    assert_eq!(report.render(), "hello (factory)");
}

#[test]
fn test_constructor_receives_resolving_provider() {
    let provider = container::ServiceProvider::new();
    let scope = provider.create_scope();

    let workspace = scope
        .service_provider()
        .get_required_service::<app::Workspace>()
        .unwrap();
    assert_eq!(workspace.greeting, "hello");
    // 传入的是作用域提供者，因此能看到作用域服务
    assert!(workspace.has_session);
}

#[test]
fn test_marker_inherited_from_base_type() {
    let provider = container::ServiceProvider::new();
    let scope = provider.create_scope();

    let repository = scope
        .service_provider()
        .get_required_service::<app::OrderRepository>()
        .unwrap();
    assert!(repository.orders.is_empty());
    // 抽象基类型本身不注册
    assert!(scope
        .service_provider()
        .get_service::<app::Repository>()
        .unwrap()
        .is_none());
}

#[test]
fn test_scope_disposal_disposes_scoped_services_once() {
    let provider = container::ServiceProvider::new();
    let (sessions, caches, tickets) = disposal_counts();

    let scope = provider.create_scope();
    scope
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();
    scope
        .service_provider()
        .get_required_service::<app::Cache>()
        .unwrap();
    scope
        .service_provider()
        .get_required_service::<app::Ticket>()
        .unwrap();
    scope.dispose();

    assert_eq!(disposal_counts(), (sessions + 1, caches, tickets));
}

#[test]
fn test_unresolved_scoped_service_is_not_disposed() {
    let provider = container::ServiceProvider::new();
    let before = disposal_counts();

    drop(provider.create_scope());
    assert_eq!(disposal_counts(), before);
}

#[test]
fn test_root_disposal_disposes_resolved_singletons() {
    let provider = container::ServiceProvider::new();
    let (sessions, caches, tickets) = disposal_counts();
    provider.get_required_service::<app::Cache>().unwrap();
    provider.get_required_service::<app::Ticket>().unwrap();

    ServiceProvider::dispose(&provider);

    assert_eq!(disposal_counts(), (sessions, caches + 1, tickets));
}

#[test]
fn test_nested_scope_shares_scoped_instances() {
    let provider = container::ServiceProvider::new();
    let before = app::session_disposals();
    let scope = provider.create_scope();
    let session = scope
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();

    let nested = scope.service_provider().create_scope();
    let nested_session = nested
        .service_provider()
        .get_required_service::<app::Session>()
        .unwrap();
    assert!(Rc::ptr_eq(&session, &nested_session));

    // 嵌套作用域中首次解析的实例也对外层可见
    let workspace = nested
        .service_provider()
        .get_required_service::<app::Workspace>()
        .unwrap();
    let outer_workspace = scope
        .service_provider()
        .get_required_service::<app::Workspace>()
        .unwrap();
    assert!(Rc::ptr_eq(&workspace, &outer_workspace));

    // 嵌套作用域结束时不释放外层的实例
    drop(nested);
    assert_eq!(app::session_disposals(), before);
    drop(scope);
    assert_eq!(app::session_disposals(), before + 1);
}

#[test]
fn test_scope_resolves_every_lifetime() {
    let provider = container::ServiceProvider::new();
    let scope = provider.create_scope();
    let services = scope.service_provider();

    let clock = services.get_required_service::<app::Clock>().unwrap();
    let ticket = services.get_required_service::<app::Ticket>().unwrap();
    let session = services.get_required_service::<app::Session>().unwrap();

    assert!(Rc::ptr_eq(&clock, &ticket.clock));
    assert!(Rc::ptr_eq(&clock, &session.clock));
}

#[test]
fn test_unregistered_type() {
    let provider = container::ServiceProvider::new();

    assert!(provider.get_service::<app::Unregistered>().unwrap().is_none());

    match provider.get_required_service::<app::Unregistered>() {
        Err(DependencyError::ServiceNotRegistered { type_name }) => {
            assert!(type_name.ends_with("Unregistered"));
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("expected ServiceNotRegistered"),
    }

    let scope = provider.create_scope();
    assert!(scope
        .service_provider()
        .get_service::<app::Unregistered>()
        .unwrap()
        .is_none());
}

#[test]
fn test_custom_names() {
    let provider = wiring::RootProvider::new();
    let scope = provider.create_scope();

    let request = scope
        .service_provider()
        .get_required_service::<custom::Request>()
        .unwrap();
    assert!(request.path.is_empty());

    let _: wiring::RequestScope = wiring::RequestScope::new(Rc::new(provider.clone()));
}

#[test]
fn test_composed_provider_probes_in_order() {
    let composed = ComposedServiceProvider::builder()
        .add_provider(container::ServiceProvider::new())
        .add_provider(wiring::RootProvider::new())
        .build();

    assert!(composed.get_service::<app::Clock>().unwrap().is_some());
    assert!(composed.get_service::<custom::Router>().unwrap().is_some());
    assert!(composed.get_service::<app::Unregistered>().unwrap().is_none());

    let scope = composed.create_scope();
    let services = scope.service_provider();
    let first = services.get_required_service::<custom::Request>().unwrap();
    let second = services.get_required_service::<custom::Request>().unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert!(services.get_service::<app::Session>().unwrap().is_some());
}
