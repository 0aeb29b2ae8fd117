use di_abstractions::{ServiceProvider, ServiceProviderExt};
use service_macros::service_module;

#[service_module(strict, provider = "Root", scoped_provider = "Scope")]
mod settings {
    #[service(scoped)]
    #[derive(Debug, Default, PartialEq)]
    pub enum Mode {
        #[default]
        Fast,
        Safe,
    }
}

fn main() {
    let root = settings::container::Root::new();
    assert!(root.get_service::<settings::Mode>().unwrap().is_none());

    let scope = root.create_scope();
    let mode = scope
        .service_provider()
        .get_required_service::<settings::Mode>()
        .unwrap();
    assert_eq!(*mode, settings::Mode::Fast);
    assert_ne!(*mode, settings::Mode::Safe);
}
