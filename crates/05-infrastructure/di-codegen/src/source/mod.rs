//! 声明来源
//!
//! - [`syn_source`] - 从 Rust 语法树收集声明，供过程宏使用
//! - [`manifest`] - 从 TOML/JSON 声明清单收集声明，供构建脚本和命令行使用

pub mod manifest;
pub mod syn_source;

pub use manifest::Manifest;
pub use syn_source::{strip_helper_attributes, SynDeclarationSource, HELPER_ATTRIBUTES};
