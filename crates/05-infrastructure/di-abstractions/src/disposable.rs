//! 可释放服务接口

/// 可释放服务 trait
///
/// 实现该 trait 的单例或作用域服务，会在其所属提供者释放时被调用 [`Disposable::dispose`]。
/// 瞬时服务不受容器管理，不会被释放。
pub trait Disposable {
    /// 释放服务持有的资源
    fn dispose(&self);
}
