//! 声明清单
//!
//! 清单以 TOML 或 JSON 描述类型声明，格式由文件扩展名决定：
//!
//! ```toml
//! [generator]
//! namespace = "container"
//!
//! [[types]]
//! name = "Greeter"
//! trait = true
//! markers = [{ lifetime = "singleton", key = "dyn Greeter" }]
//!
//! [[types]]
//! name = "English"
//! contracts = ["Greeter"]
//! constructor = { name = "new", params = ["Rc<Clock>"] }
//! ```

use crate::declaration::{
    ConstructorDecl, Declarations, MarkerDecl, MethodDecl, ParamDecl, TypeDecl, TypeKind, TypeRef,
};
use crate::options::GeneratorOptions;
use infrastructure_common::{ConfigError, GenerationError, GenerationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 声明清单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// 生成选项的基础值
    #[serde(default)]
    pub generator: GeneratorOptions,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// 类型条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    /// 生成代码中引用该类型的路径
    pub name: String,
    #[serde(default, rename = "trait")]
    pub is_trait: bool,
    #[serde(default, rename = "enum")]
    pub is_enum: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub unit: bool,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub contracts: Vec<String>,
    #[serde(default)]
    pub disposable: bool,
    #[serde(default)]
    pub markers: Vec<MarkerEntry>,
    #[serde(default)]
    pub constructor: Option<ConstructorEntry>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerEntry {
    #[serde(default)]
    pub lifetime: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorEntry {
    #[serde(default = "default_constructor_name")]
    pub name: String,
    /// 参数类型，按声明顺序
    #[serde(default)]
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodEntry {
    pub name: String,
    #[serde(default = "default_true", rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub factory: bool,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub returns: Option<String>,
}

fn default_constructor_name() -> String {
    "new".to_string()
}

fn default_true() -> bool {
    true
}

impl Manifest {
    /// 从文件加载，`.json` 按 JSON 解析，其余按 TOML 解析
    pub fn from_path(path: impl AsRef<Path>) -> GenerationResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let manifest = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!(
            "加载声明清单: {} ({} 个类型)",
            path.display(),
            manifest.types.len()
        );
        Ok(manifest)
    }

    pub fn from_toml_str(content: &str) -> GenerationResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::parse(e).into())
    }

    pub fn from_json_str(content: &str) -> GenerationResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::parse(e).into())
    }

    /// 转换为声明图
    pub fn to_declarations(&self) -> GenerationResult<Declarations> {
        let types = self
            .types
            .iter()
            .map(TypeEntry::to_decl)
            .collect::<GenerationResult<Vec<_>>>()?;
        Ok(Declarations::new(types))
    }
}

impl TypeEntry {
    fn to_decl(&self) -> GenerationResult<TypeDecl> {
        let ty = TypeRef::parse(&self.name)?;
        if !matches!(ty.ty(), syn::Type::Path(_)) || ty.simple_name().is_none() {
            return Err(GenerationError::invalid_declaration(format!(
                "类型名必须是路径: `{}`",
                self.name
            )));
        }

        let kind = match (self.is_trait, self.is_enum) {
            (true, false) => TypeKind::Trait,
            (false, true) => TypeKind::Enum,
            (false, false) => TypeKind::Struct,
            (true, true) => {
                return Err(GenerationError::invalid_declaration(format!(
                    "`{}` 不能同时是 trait 和 enum",
                    self.name
                )))
            }
        };

        let mut decl = TypeDecl::new(ty, kind);
        decl.is_abstract = decl.is_abstract || self.is_abstract;
        decl.is_unit = self.unit;
        decl.disposable = self.disposable;
        decl.base = self.base.as_deref().map(TypeRef::parse).transpose()?;

        for contract in &self.contracts {
            let contract = TypeRef::parse(contract)?;
            if contract.simple_name().as_deref() == Some("Disposable") {
                decl.disposable = true;
            } else {
                decl.contracts.push(contract);
            }
        }

        for marker in &self.markers {
            decl.markers.push(MarkerDecl {
                lifetime: marker.lifetime.clone(),
                key: marker.key.as_deref().map(TypeRef::parse).transpose()?,
            });
        }

        if let Some(constructor) = &self.constructor {
            decl.constructor = Some(ConstructorDecl {
                name: constructor.name.clone(),
                params: params(&decl.ty, &constructor.params)?,
            });
        }

        for method in &self.methods {
            let returns = method
                .returns
                .as_deref()
                .map(TypeRef::parse)
                .transpose()?
                .map(|returns| returns.replace_self(&decl.ty));
            decl.methods.push(MethodDecl {
                name: method.name.clone(),
                is_static: method.is_static,
                is_factory: method.factory,
                params: params(&decl.ty, &method.params)?,
                returns,
            });
        }

        debug!("清单类型: {} ({:?})", decl.ty, decl.kind);
        Ok(decl)
    }
}

fn params(owner: &TypeRef, types: &[String]) -> GenerationResult<Vec<ParamDecl>> {
    types
        .iter()
        .enumerate()
        .map(|(index, source)| {
            Ok(ParamDecl {
                name: format!("arg{index}"),
                ty: TypeRef::parse(source)?.replace_self(owner),
            })
        })
        .collect()
}
