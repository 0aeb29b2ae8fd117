//! 服务提供者抽象接口
//!
//! 生成的根容器、作用域容器以及组合容器都实现 [`ServiceProvider`]。

use crate::scope::ServiceScope;
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::{Any, TypeId};
use std::rc::Rc;

/// 按类型标识查找得到的服务实例
///
/// 盒子里装的是 `Rc<K>`，其中 `K` 为服务键类型（可以是 `dyn Trait`）。
pub type ServiceInstance = Box<dyn Any>;

/// 服务提供者 trait
///
/// 对象安全，可以以 `dyn ServiceProvider` 形式传递给工厂方法和组合容器。
/// 实现是单线程的：实例以 `Rc` 共享，缓存单元不加锁。
pub trait ServiceProvider {
    /// 按服务键的 `TypeId` 查找服务
    ///
    /// 未注册时返回 `Ok(None)`；已注册但构造其依赖失败时返回错误。
    fn get_service_by_type(&self, service_type: TypeId) -> DependencyResult<Option<ServiceInstance>>;

    /// 创建新的作用域
    fn create_scope(&self) -> ServiceScope;

    /// 释放该提供者持有的可释放实例
    fn dispose(&self);
}

/// 服务提供者的泛型扩展方法
pub trait ServiceProviderExt: ServiceProvider {
    /// 获取服务，未注册时返回 `Ok(None)`
    fn get_service<T>(&self) -> DependencyResult<Option<Rc<T>>>
    where
        T: ?Sized + 'static,
    {
        match self.get_service_by_type(TypeId::of::<T>())? {
            Some(instance) => downcast_instance::<T>(instance).map(Some),
            None => Ok(None),
        }
    }

    /// 获取必需的服务，未注册时返回 [`DependencyError::ServiceNotRegistered`]
    fn get_required_service<T>(&self) -> DependencyResult<Rc<T>>
    where
        T: ?Sized + 'static,
    {
        self.get_service::<T>()?
            .ok_or_else(DependencyError::not_registered::<T>)
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

/// 将查找结果还原为 `Rc<T>`
pub fn downcast_instance<T>(instance: ServiceInstance) -> DependencyResult<Rc<T>>
where
    T: ?Sized + 'static,
{
    instance
        .downcast::<Rc<T>>()
        .map(|boxed| *boxed)
        .map_err(|_| DependencyError::type_mismatch::<T>())
}

/// 将共享实例装箱为查找结果
pub fn into_instance<T>(service: Rc<T>) -> ServiceInstance
where
    T: ?Sized + 'static,
{
    Box::new(service)
}
