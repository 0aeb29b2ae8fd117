//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn DI 各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`Lifetime`] - 服务生命周期
//! - [`DependencyError`] - 运行时依赖解析错误
//! - [`GenerationError`] - 编译期容器生成错误
//! - [`ConfigError`] - 生成配置错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 生成阶段的错误一律致命，不输出部分容器

pub mod errors;
pub mod lifecycle;

pub use errors::*;
pub use lifecycle::*;
