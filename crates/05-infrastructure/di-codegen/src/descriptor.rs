//! 服务描述符

use crate::declaration::TypeRef;
use crate::scanner::MarkerOrigin;
use infrastructure_common::Lifetime;
use serde::Serialize;
use std::fmt;

/// 构造函数参数的注入方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// `Rc<K>`：共享键为 `K` 的实例
    Shared(TypeRef),
    /// 其他类型 `T`：以 `T` 为键取出后克隆
    Cloned(TypeRef),
    /// `&dyn ServiceProvider`：正在解析的提供者本身
    Provider,
}

/// 构造方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construction {
    /// 带 `#[factory]` 的静态方法
    Factory { method: String },
    /// 第一个构造函数
    Constructor { function: String, args: Vec<Argument> },
    /// 单元结构体字面量
    UnitLiteral,
    /// 没有声明构造函数时使用 `Default::default()`
    Default,
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory { method } => write!(f, "factory {method}"),
            Self::Constructor { function, args } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| match arg {
                        Argument::Shared(key) => format!("Rc<{key}>"),
                        Argument::Cloned(key) => key.to_string(),
                        Argument::Provider => "&dyn ServiceProvider".to_string(),
                    })
                    .collect();
                write!(f, "{function}({})", args.join(", "))
            }
            Self::UnitLiteral => f.write_str("unit literal"),
            Self::Default => f.write_str("Default::default()"),
        }
    }
}

/// 解析后的服务描述符
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub service_key: TypeRef,
    pub implementation: TypeRef,
    pub lifetime: Lifetime,
    pub construction: Construction,
    pub disposable: bool,
    pub marker_origin: MarkerOrigin,
    /// 是否存在多条标记来源
    pub ambiguous: bool,
}

/// 描述符表的可序列化视图
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorReport {
    pub namespace: String,
    pub services: Vec<DescriptorEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptorEntry {
    pub service_key: String,
    pub implementation: String,
    pub lifetime: Lifetime,
    pub construction: String,
    pub disposable: bool,
    pub marker_origin: MarkerOrigin,
    pub ambiguous: bool,
}

impl DescriptorReport {
    pub fn new(namespace: impl Into<String>, descriptors: &[ServiceDescriptor]) -> Self {
        Self {
            namespace: namespace.into(),
            services: descriptors
                .iter()
                .map(|descriptor| DescriptorEntry {
                    service_key: descriptor.service_key.to_string(),
                    implementation: descriptor.implementation.to_string(),
                    lifetime: descriptor.lifetime,
                    construction: descriptor.construction.to_string(),
                    disposable: descriptor.disposable,
                    marker_origin: descriptor.marker_origin.clone(),
                    ambiguous: descriptor.ambiguous,
                })
                .collect(),
        }
    }
}
