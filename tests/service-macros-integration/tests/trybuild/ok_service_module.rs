use di_abstractions::{ServiceProvider, ServiceProviderExt};
use service_macros::service_module;
use std::rc::Rc;

#[service_module]
mod services {
    use std::rc::Rc;

    #[service(singleton)]
    pub struct Clock;

    #[service(transient)]
    pub struct Greeter {
        pub clock: Rc<Clock>,
    }

    impl Greeter {
        pub fn new(clock: Rc<Clock>) -> Self {
            Self { clock }
        }
    }
}

fn main() {
    let provider = services::container::ServiceProvider::new();
    let greeter = provider.get_required_service::<services::Greeter>().unwrap();
    let clock = provider.get_required_service::<services::Clock>().unwrap();
    assert!(Rc::ptr_eq(&greeter.clock, &clock));

    let scope = provider.create_scope();
    assert!(scope
        .service_provider()
        .get_service::<services::Greeter>()
        .unwrap()
        .is_some());
}
