//! 由 `build.rs` 根据 `services.toml` 生成容器的集成测试工程

use di_abstractions::{Disposable, ServiceProvider, ServiceProviderExt};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
pub struct Clock;

impl Clock {
    pub fn tick(&self) -> u64 {
        42
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "orders".to_string(),
        }
    }
}

pub trait Logger {
    fn format(&self, message: &str) -> String;
}

pub struct ConsoleLogger {
    clock: Rc<Clock>,
}

impl ConsoleLogger {
    pub fn new(clock: Rc<Clock>) -> Self {
        Self { clock }
    }
}

impl Logger for ConsoleLogger {
    fn format(&self, message: &str) -> String {
        format!("[{}] {message}", self.clock.tick())
    }
}

/// 作用域内共享的连接，作用域结束时关闭
pub struct Connection {
    pub database: String,
    closed: Cell<bool>,
}

impl Connection {
    pub fn open(provider: &dyn ServiceProvider) -> Self {
        let database = provider
            .get_required_service::<Config>()
            .map(|config| config.database.clone())
            .unwrap_or_default();
        Self {
            database,
            closed: Cell::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Disposable for Connection {
    fn dispose(&self) {
        self.closed.set(true);
    }
}

pub struct Request {
    pub connection: Rc<Connection>,
    pub logger: Rc<dyn Logger>,
    pub config: Config,
}

impl Request {
    pub fn new(connection: Rc<Connection>, logger: Rc<dyn Logger>, config: Config) -> Self {
        Self {
            connection,
            logger,
            config,
        }
    }

    pub fn describe(&self) -> String {
        self.logger.format(&self.connection.database)
    }
}

pub struct Stamp {
    pub value: u64,
}

impl Stamp {
    pub fn now(clock: Rc<Clock>) -> Self {
        Self { value: clock.tick() }
    }
}

include!(concat!(env!("OUT_DIR"), "/services.rs"));
