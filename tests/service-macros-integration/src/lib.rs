//! `#[service_module]` 集成测试用的服务声明

use service_macros::service_module;

/// 覆盖三种生命周期、契约标记、工厂方法与释放的服务集合
#[service_module]
pub mod app {
    use di_abstractions::{Disposable, ServiceProvider, ServiceProviderExt};
    use std::cell::Cell;
    use std::rc::Rc;

    thread_local! {
        static SESSION_DISPOSALS: Cell<usize> = Cell::new(0);
        static CACHE_DISPOSALS: Cell<usize> = Cell::new(0);
        static TICKET_DISPOSALS: Cell<usize> = Cell::new(0);
    }

    pub fn session_disposals() -> usize {
        SESSION_DISPOSALS.with(Cell::get)
    }

    pub fn cache_disposals() -> usize {
        CACHE_DISPOSALS.with(Cell::get)
    }

    pub fn ticket_disposals() -> usize {
        TICKET_DISPOSALS.with(Cell::get)
    }

    fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
        counter.with(|count| count.set(count.get() + 1));
    }

    #[service(singleton)]
    #[derive(Debug)]
    pub struct Clock;

    #[service(singleton)]
    #[derive(Debug, Default)]
    pub struct Cache;

    impl Disposable for Cache {
        fn dispose(&self) {
            bump(&CACHE_DISPOSALS);
        }
    }

    #[service(transient)]
    pub struct Ticket {
        pub clock: Rc<Clock>,
    }

    impl Ticket {
        pub fn new(clock: Rc<Clock>) -> Self {
            Self { clock }
        }
    }

    impl Disposable for Ticket {
        fn dispose(&self) {
            bump(&TICKET_DISPOSALS);
        }
    }

    #[service(scoped)]
    pub struct Session {
        pub clock: Rc<Clock>,
    }

    impl Session {
        pub fn new(clock: Rc<Clock>) -> Self {
            Self { clock }
        }
    }

    impl Disposable for Session {
        fn dispose(&self) {
            bump(&SESSION_DISPOSALS);
        }
    }

    /// 契约上的标记，服务键为 `dyn Greeter`
    #[service(singleton, key = dyn Greeter)]
    pub trait Greeter {
        fn greet(&self) -> String;
    }

    pub struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[service(singleton)]
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub source: &'static str,
    }

    impl Settings {
        pub fn new() -> Self {
            Self {
                source: "constructor",
            }
        }

        #[factory]
        pub fn create(_provider: &dyn ServiceProvider) -> Self {
            Self { source: "factory" }
        }
    }

    /// 工厂方法缺少提供者参数，回退到构造函数
    #[service(transient)]
    #[derive(Debug)]
    pub struct Counter {
        pub source: &'static str,
    }

    impl Counter {
        pub fn new() -> Self {
            Self {
                source: "constructor",
            }
        }

        #[factory]
        pub fn build() -> Self {
            Self { source: "factory" }
        }
    }

    #[service(transient)]
    pub struct Report {
        pub settings: Settings,
        pub greeter: Rc<dyn Greeter>,
    }

    impl Report {
        pub fn new(settings: Settings, greeter: Rc<dyn Greeter>) -> Self {
            Self { settings, greeter }
        }

        pub fn render(&self) -> String {
            format!("{} ({})", self.greeter.greet(), self.settings.source)
        }
    }

    /// 构造时直接使用所在的提供者
    #[service(scoped)]
    pub struct Workspace {
        pub greeting: String,
        pub has_session: bool,
    }

    impl Workspace {
        pub fn new(provider: &dyn ServiceProvider) -> Self {
            let greeting = provider
                .get_required_service::<dyn Greeter>()
                .map(|greeter| greeter.greet())
                .unwrap_or_default();
            let has_session = matches!(provider.get_service::<Session>(), Ok(Some(_)));
            Self {
                greeting,
                has_session,
            }
        }
    }

    #[abstract_service]
    #[service(scoped)]
    pub struct Repository;

    /// 从基类型继承作用域标记
    #[extends(Repository)]
    #[derive(Debug, Default)]
    pub struct OrderRepository {
        pub orders: Vec<u32>,
    }

    /// 未注册的类型
    pub struct Unregistered;
}

/// 自定义命名的容器
#[service_module(namespace = "wiring", provider = "RootProvider", scoped_provider = "RequestScope")]
pub mod custom {
    #[service(scoped)]
    #[derive(Debug, Default)]
    pub struct Request {
        pub path: String,
    }

    #[service(singleton)]
    #[derive(Debug, Default)]
    pub struct Router {
        pub routes: Vec<String>,
    }
}
