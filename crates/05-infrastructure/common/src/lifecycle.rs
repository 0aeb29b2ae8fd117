//! 服务生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 每个根容器只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Lifetime {
    /// 所有已知的生命周期
    pub const ALL: [Lifetime; 3] = [Self::Singleton, Self::Scoped, Self::Transient];

    /// 从标记名称解析生命周期，未知名称返回 `None`
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lifetime| lifetime.as_str() == marker)
    }

    /// 标记名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }

    /// 是否需要缓存实例
    pub fn is_memoized(self) -> bool {
        !matches!(self, Self::Transient)
    }

    /// 是否属于根容器
    pub fn belongs_to_root(self) -> bool {
        !matches!(self, Self::Scoped)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
