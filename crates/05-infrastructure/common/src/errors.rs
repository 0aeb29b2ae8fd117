//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 运行时依赖解析错误类型
///
/// 由生成的容器在解析服务时返回
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("服务未注册: {type_name}")]
    ServiceNotRegistered { type_name: String },

    #[error("服务实例类型不匹配: 请求 {type_name}")]
    TypeMismatch { type_name: String },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered<T: ?Sized>() -> Self {
        Self::ServiceNotRegistered {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch<T: ?Sized>() -> Self {
        Self::TypeMismatch {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

/// 容器生成错误类型
///
/// 生成阶段的错误都是致命的：出现任何一个错误时不会输出容器代码。
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("未知的服务生命周期: {type_name} 上的标记 `{marker}`")]
    UnknownLifetime { type_name: String, marker: String },

    #[error("服务标记缺少生命周期: {type_name}")]
    MissingLifetime { type_name: String },

    #[error("服务标记冲突: {type_name}, 来源: {sources}")]
    ConflictingMarkers { type_name: String, sources: String },

    #[error("服务键重复: {service_key} (实现 {first} 与 {second})")]
    DuplicateServiceKey {
        service_key: String,
        first: String,
        second: String,
    },

    #[error("生成标识符冲突: `{identifier}` 在 {partition} 中同时对应 {first} 与 {second}")]
    IdentifierCollision {
        identifier: String,
        partition: String,
        first: String,
        second: String,
    },

    #[error("无效的服务键: {service_key}, 原因: {reason}")]
    InvalidServiceKey { service_key: String, reason: String },

    #[error("无效的声明: {message}")]
    InvalidDeclaration { message: String },

    #[error("生成配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl GenerationError {
    /// 创建无效声明错误
    pub fn invalid_declaration(message: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type GenerationResult<T> = Result<T, GenerationError>;
