//! # Dependency Injection Abstractions
//!
//! 生成的容器在运行时依赖的最小契约。
//!
//! ## 核心接口
//!
//! - [`ServiceProvider`] - 按类型标识查找服务的提供者
//! - [`ServiceProviderExt`] - 泛型的 `get_service` / `get_required_service`
//! - [`ServiceScope`] - 作用域句柄，结束时释放作用域内的实例
//! - [`Disposable`] - 可释放服务
//! - [`ComposedServiceProvider`] - 多个提供者的组合
//!
//! 所有实现都是单线程的：实例以 `Rc` 共享，缓存单元使用 [`OnceCell`]。

pub mod composed;
pub mod disposable;
pub mod provider;
pub mod scope;

pub use composed::*;
pub use disposable::*;
pub use provider::*;
pub use scope::*;

pub use infrastructure_common::{DependencyError, DependencyResult, Lifetime};
pub use once_cell::unsync::OnceCell;
