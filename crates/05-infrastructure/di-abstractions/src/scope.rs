//! 服务作用域

use crate::provider::{ServiceInstance, ServiceProvider};
use infrastructure_common::DependencyResult;
use std::any::TypeId;
use std::cell::Cell;
use std::fmt;
use tracing::debug;

/// 服务作用域
///
/// 持有一个嵌套的服务提供者，作用域结束（显式 [`ServiceScope::dispose`] 或 drop）时
/// 释放该提供者，且只释放一次。
///
/// 由 [`ServiceScope::nested`] 创建的作用域只借用外层作用域的提供者，结束时不释放它。
pub struct ServiceScope {
    provider: Box<dyn ServiceProvider>,
    owns_provider: bool,
    disposed: Cell<bool>,
}

impl ServiceScope {
    /// 创建新的作用域，作用域拥有该提供者
    pub fn new<P: ServiceProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Box::new(provider),
            owns_provider: true,
            disposed: Cell::new(false),
        }
    }

    /// 在外层作用域内创建嵌套作用域
    ///
    /// `provider` 是外层作用域提供者的句柄，与外层共享作用域实例；
    /// 这些实例仍由外层作用域释放。
    pub fn nested<P: ServiceProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Box::new(provider),
            owns_provider: false,
            disposed: Cell::new(false),
        }
    }

    /// 作用域内的服务提供者
    pub fn service_provider(&self) -> &dyn ServiceProvider {
        self.provider.as_ref()
    }

    /// 结束作用域并释放嵌套的提供者
    pub fn dispose(self) {
        drop(self);
    }

    /// 作用域是否已释放
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn dispose_once(&self) {
        if self.disposed.replace(true) || !self.owns_provider {
            return;
        }
        debug!("释放服务作用域");
        self.provider.dispose();
    }
}

impl ServiceProvider for ServiceScope {
    fn get_service_by_type(&self, service_type: TypeId) -> DependencyResult<Option<ServiceInstance>> {
        self.provider.get_service_by_type(service_type)
    }

    fn create_scope(&self) -> ServiceScope {
        self.provider.create_scope()
    }

    fn dispose(&self) {
        self.dispose_once();
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        self.dispose_once();
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("provider", &"<provider>")
            .field("owns_provider", &self.owns_provider)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}
