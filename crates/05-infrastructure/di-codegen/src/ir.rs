//! 容器中间表示
//!
//! 合成器产出、渲染器消费。一个 [`ContainerUnit`] 恰好包含根提供者和作用域提供者两个定义。

use crate::declaration::TypeRef;
use proc_macro2::Ident;

/// 一次生成的完整产物
#[derive(Debug, Clone)]
pub struct ContainerUnit {
    /// 生成代码所在的模块
    pub namespace: Ident,
    /// 运行时契约 crate 的路径
    pub runtime: syn::Path,
    pub root: ProviderDecl,
    pub scoped: ProviderDecl,
}

/// 提供者种类，决定查找未命中时的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// 未命中返回 `Ok(None)`
    Root,
    /// 未命中时委托给父提供者
    Scoped,
}

/// 一个提供者定义
#[derive(Debug, Clone)]
pub struct ProviderDecl {
    pub kind: ProviderKind,
    pub name: Ident,
    /// 提供者共享状态的类型名
    pub state_name: Option<Ident>,
    pub cells: Vec<CellField>,
    pub accessors: Vec<AccessorDecl>,
    /// 按声明顺序的查找分支
    pub lookups: Vec<LookupCase>,
    /// 释放时依次调用的缓存单元
    pub disposals: Vec<DisposeStmt>,
}

/// 缓存单元字段
#[derive(Debug, Clone)]
pub struct CellField {
    pub name: Ident,
    pub implementation: TypeRef,
}

/// 服务访问器
#[derive(Debug, Clone)]
pub struct AccessorDecl {
    pub name: Ident,
    pub service_key: TypeRef,
    pub body: Stmt,
}

/// 访问器主体
#[derive(Debug, Clone)]
pub enum Stmt {
    /// 从缓存单元取出，不存在时构造并存入
    Memoized {
        cell: Ident,
        implementation: TypeRef,
        construct: ConstructExpr,
    },
    /// 每次构造新实例
    Fresh {
        implementation: TypeRef,
        construct: ConstructExpr,
    },
}

/// 构造表达式
#[derive(Debug, Clone)]
pub enum ConstructExpr {
    /// `<Impl>::method(self)`
    FactoryCall { implementation: TypeRef, method: Ident },
    /// `<Impl>::function(args..)`
    ConstructorCall {
        implementation: TypeRef,
        function: Ident,
        args: Vec<ArgExpr>,
    },
    /// 单元结构体字面量
    UnitLiteral { implementation: TypeRef },
    /// `<Impl as Default>::default()`
    DefaultValue { implementation: TypeRef },
}

/// 构造参数表达式
#[derive(Debug, Clone)]
pub enum ArgExpr {
    /// `self.get_required_service::<K>()?`
    Shared(TypeRef),
    /// `(*self.get_required_service::<T>()?).clone()`
    Cloned(TypeRef),
    /// `self`
    Provider,
}

/// 查找分支：服务键 `TypeId` 命中时调用访问器
#[derive(Debug, Clone)]
pub struct LookupCase {
    pub service_key: TypeRef,
    pub accessor: Ident,
}

/// 释放语句：缓存单元已填充时调用 `Disposable::dispose`
#[derive(Debug, Clone)]
pub struct DisposeStmt {
    pub cell: Ident,
}
