//! 组合服务提供者
//!
//! 将多个独立生成的容器聚合到一个查找入口之后

use crate::provider::{ServiceInstance, ServiceProvider};
use crate::scope::ServiceScope;
use infrastructure_common::DependencyResult;
use std::any::TypeId;
use std::fmt;
use tracing::debug;

/// 组合服务提供者
///
/// 查找按注册顺序依次探测各个提供者，第一个非空结果胜出。
pub struct ComposedServiceProvider {
    providers: Vec<Box<dyn ServiceProvider>>,
}

impl ComposedServiceProvider {
    fn new(providers: Vec<Box<dyn ServiceProvider>>) -> Self {
        Self { providers }
    }

    /// 创建构建器
    pub fn builder() -> ComposedServiceProviderBuilder {
        ComposedServiceProviderBuilder::new()
    }

    /// 组合的提供者数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 是否没有任何提供者
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ServiceProvider for ComposedServiceProvider {
    fn get_service_by_type(&self, service_type: TypeId) -> DependencyResult<Option<ServiceInstance>> {
        for provider in &self.providers {
            if let Some(service) = provider.get_service_by_type(service_type)? {
                return Ok(Some(service));
            }
        }
        Ok(None)
    }

    fn create_scope(&self) -> ServiceScope {
        debug!("为 {} 个提供者创建组合作用域", self.providers.len());
        let scoped = self
            .providers
            .iter()
            .map(|provider| Box::new(provider.create_scope()) as Box<dyn ServiceProvider>)
            .collect();
        ServiceScope::new(Self::new(scoped))
    }

    fn dispose(&self) {
        for provider in &self.providers {
            provider.dispose();
        }
    }
}

impl fmt::Debug for ComposedServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedServiceProvider")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// 组合服务提供者构建器
#[derive(Default)]
pub struct ComposedServiceProviderBuilder {
    providers: Vec<Box<dyn ServiceProvider>>,
}

impl ComposedServiceProviderBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加提供者，注册顺序即查找顺序
    pub fn add_provider<P: ServiceProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// 构建组合提供者
    pub fn build(self) -> ComposedServiceProvider {
        ComposedServiceProvider::new(self.providers)
    }
}
