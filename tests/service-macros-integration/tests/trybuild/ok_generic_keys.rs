use di_abstractions::ServiceProviderExt;
use service_macros::service_module;

#[service_module(namespace = "handlers")]
mod app {
    pub struct Order;
    pub struct Refund;

    pub trait Handler<T> {
        fn name(&self) -> &'static str;
    }

    #[service(singleton, key = dyn Handler<Order>)]
    pub struct OrderHandler;

    impl Handler<Order> for OrderHandler {
        fn name(&self) -> &'static str {
            "order"
        }
    }

    #[service(transient, key = dyn Handler<Refund>)]
    pub struct RefundHandler;

    impl Handler<Refund> for RefundHandler {
        fn name(&self) -> &'static str {
            "refund"
        }
    }
}

fn main() {
    use app::{Handler, Order, Refund};

    let provider = app::handlers::ServiceProvider::new();
    let order = provider.get_required_service::<dyn Handler<Order>>().unwrap();
    let refund = provider.get_required_service::<dyn Handler<Refund>>().unwrap();
    assert_eq!(order.name(), "order");
    assert_eq!(refund.name(), "refund");

    let scope = di_abstractions::ServiceProvider::create_scope(&provider);
    let order = scope
        .service_provider()
        .get_required_service::<dyn Handler<Order>>()
        .unwrap();
    assert_eq!(order.name(), "order");
}
