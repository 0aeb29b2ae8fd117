//! 生成选项
//!
//! 选项按层叠加：基础值（默认值或清单中的 `[generator]` 表）、可选的选项文件，
//! 最后是 `DI_CODEGEN_` 前缀的环境变量。

use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DI_CODEGEN";

/// 容器生成选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// 生成代码所在的模块名
    pub namespace: String,
    /// 根提供者类型名
    pub provider_name: String,
    /// 作用域提供者类型名
    pub scoped_provider_name: String,
    /// 运行时契约 crate 的路径
    pub runtime_path: String,
    /// 标记冲突是否视为错误
    pub strict_markers: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            namespace: "container".to_string(),
            provider_name: "ServiceProvider".to_string(),
            scoped_provider_name: "ScopedServiceProvider".to_string(),
            runtime_path: "::di_abstractions".to_string(),
            strict_markers: false,
        }
    }
}

impl GeneratorOptions {
    /// 验证选项
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("namespace", &self.namespace),
            ("provider_name", &self.provider_name),
            ("scoped_provider_name", &self.scoped_provider_name),
        ] {
            if syn::parse_str::<syn::Ident>(value).is_err() {
                return Err(ConfigError::validation(format!(
                    "{field} 不是合法的标识符: `{value}`"
                )));
            }
        }

        if self.provider_name == self.scoped_provider_name {
            return Err(ConfigError::validation(format!(
                "provider_name 与 scoped_provider_name 不能相同: `{}`",
                self.provider_name
            )));
        }

        if syn::parse_str::<syn::Path>(&self.runtime_path).is_err() {
            return Err(ConfigError::validation(format!(
                "runtime_path 不是合法的路径: `{}`",
                self.runtime_path
            )));
        }

        Ok(())
    }

    /// 以默认值为基础加载选项
    pub fn load() -> ConfigResult<Self> {
        OptionsLoader::new(Self::default()).load()
    }
}

/// 选项加载器
#[derive(Debug, Clone)]
pub struct OptionsLoader {
    base: GeneratorOptions,
    file: Option<PathBuf>,
    environment: Option<config::Map<String, String>>,
}

impl OptionsLoader {
    /// 以给定选项作为最底层
    pub fn new(base: GeneratorOptions) -> Self {
        Self {
            base,
            file: None,
            environment: None,
        }
    }

    /// 叠加选项文件，格式由扩展名决定
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// 用给定的变量表代替进程环境变量
    pub fn with_environment(mut self, variables: config::Map<String, String>) -> Self {
        self.environment = Some(variables);
        self
    }

    /// 合并各层并验证
    pub fn load(self) -> ConfigResult<GeneratorOptions> {
        let base = config::Config::try_from(&self.base).map_err(ConfigError::parse)?;
        let mut builder = config::Config::builder().add_source(base);

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载生成选项文件: {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(self.environment),
        );

        let settings = builder.build().map_err(|e| {
            error!("生成选项构建失败: {}", e);
            ConfigError::parse(e)
        })?;

        let options: GeneratorOptions = settings.try_deserialize().map_err(|e| {
            error!("生成选项绑定失败: {}", e);
            ConfigError::parse(e)
        })?;

        options.validate()?;
        debug!("生成选项: {:?}", options);
        Ok(options)
    }
}
