//! 代码合成器
//!
//! 把描述符划分到根提供者与作用域提供者，生成 [`ContainerUnit`]。

use crate::descriptor::{Argument, Construction, ServiceDescriptor};
use crate::diagnostics::Diagnostics;
use crate::ir::{
    AccessorDecl, ArgExpr, CellField, ConstructExpr, ContainerUnit, DisposeStmt, LookupCase,
    ProviderDecl, ProviderKind, Stmt,
};
use crate::naming::{accessor_name, cell_field_name, parse_ident, service_identifier};
use crate::options::GeneratorOptions;
use infrastructure_common::{GenerationError, GenerationResult};
use proc_macro2::Ident;
use std::collections::HashMap;
use tracing::{debug, info};

/// 代码合成器
#[derive(Debug, Clone)]
pub struct CodeSynthesizer<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> CodeSynthesizer<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// 合成容器定义
    ///
    /// 服务键重复或同一提供者内标识符冲突时中止；
    /// 根提供者与作用域提供者出现相同标识符时记录警告。
    pub fn synthesize(
        &self,
        descriptors: &[ServiceDescriptor],
        diagnostics: &mut Diagnostics,
    ) -> GenerationResult<ContainerUnit> {
        check_unique_keys(descriptors)?;

        let (root, scoped): (Vec<&ServiceDescriptor>, Vec<&ServiceDescriptor>) = descriptors
            .iter()
            .partition(|descriptor| descriptor.lifetime.belongs_to_root());
        check_shared_identifiers(&root, &scoped, diagnostics)?;

        let root_name = parse_ident(&self.options.provider_name)?;
        let root = ProviderBuilder::new(
            ProviderKind::Root,
            root_name.clone(),
            Some(quote::format_ident!("{}State", root_name)),
        )
        .build(&root)?;
        let scoped_name = parse_ident(&self.options.scoped_provider_name)?;
        let scoped = ProviderBuilder::new(
            ProviderKind::Scoped,
            scoped_name.clone(),
            Some(quote::format_ident!("{}State", scoped_name)),
        )
        .build(&scoped)?;

        let runtime = syn::parse_str::<syn::Path>(&self.options.runtime_path).map_err(|e| {
            GenerationError::invalid_declaration(format!(
                "无效的运行时路径 `{}`: {e}",
                self.options.runtime_path
            ))
        })?;

        info!(
            "合成容器: 根提供者 {} 个服务, 作用域提供者 {} 个服务",
            root.lookups.len(),
            scoped.lookups.len()
        );

        Ok(ContainerUnit {
            namespace: parse_ident(&self.options.namespace)?,
            runtime,
            root,
            scoped,
        })
    }
}

fn check_unique_keys(descriptors: &[ServiceDescriptor]) -> GenerationResult<()> {
    let mut seen: HashMap<&str, &ServiceDescriptor> = HashMap::new();
    for descriptor in descriptors {
        if let Some(first) = seen.insert(descriptor.service_key.display(), descriptor) {
            return Err(GenerationError::DuplicateServiceKey {
                service_key: descriptor.service_key.to_string(),
                first: first.implementation.to_string(),
                second: descriptor.implementation.to_string(),
            });
        }
    }
    Ok(())
}

/// 两个提供者中标识符相同的服务键，可能是同一类型的不同写法
///
/// 这种情况下作用域内的实例会遮蔽根提供者的实例。
fn check_shared_identifiers(
    root: &[&ServiceDescriptor],
    scoped: &[&ServiceDescriptor],
    diagnostics: &mut Diagnostics,
) -> GenerationResult<()> {
    let mut root_identifiers: HashMap<String, &ServiceDescriptor> = HashMap::new();
    for &descriptor in root {
        root_identifiers
            .entry(service_identifier(&descriptor.service_key)?)
            .or_insert(descriptor);
    }

    for &descriptor in scoped {
        let identifier = service_identifier(&descriptor.service_key)?;
        if let Some(first) = root_identifiers.get(&identifier) {
            diagnostics.warning(
                descriptor.implementation.to_string(),
                format!(
                    "作用域服务键 `{}` 与根服务键 `{}` 生成相同的标识符 `{identifier}`；\
                     若二者是同一类型，作用域内的实例会遮蔽根实例",
                    descriptor.service_key, first.service_key
                ),
            );
        }
    }
    Ok(())
}

struct ProviderBuilder {
    decl: ProviderDecl,
}

impl ProviderBuilder {
    fn new(kind: ProviderKind, name: Ident, state_name: Option<Ident>) -> Self {
        Self {
            decl: ProviderDecl {
                kind,
                name,
                state_name,
                cells: Vec::new(),
                accessors: Vec::new(),
                lookups: Vec::new(),
                disposals: Vec::new(),
            },
        }
    }

    fn build(mut self, descriptors: &[&ServiceDescriptor]) -> GenerationResult<ProviderDecl> {
        let mut identifiers: HashMap<String, &ServiceDescriptor> = HashMap::new();

        for &descriptor in descriptors {
            let identifier = service_identifier(&descriptor.service_key)?;
            if let Some(first) = identifiers.insert(identifier.clone(), descriptor) {
                return Err(GenerationError::IdentifierCollision {
                    identifier,
                    partition: self.decl.name.to_string(),
                    first: first.service_key.to_string(),
                    second: descriptor.service_key.to_string(),
                });
            }
            self.add_service(&identifier, descriptor)?;
        }

        Ok(self.decl)
    }

    fn add_service(&mut self, identifier: &str, descriptor: &ServiceDescriptor) -> GenerationResult<()> {
        let accessor = parse_ident(&accessor_name(identifier))?;
        let construct = construct_expr(descriptor)?;
        let implementation = descriptor.implementation.clone();

        let body = if descriptor.lifetime.is_memoized() {
            let cell = parse_ident(&cell_field_name(identifier))?;
            self.decl.cells.push(CellField {
                name: cell.clone(),
                implementation: implementation.clone(),
            });
            if descriptor.disposable {
                self.decl.disposals.push(DisposeStmt { cell: cell.clone() });
            }
            Stmt::Memoized {
                cell,
                implementation,
                construct,
            }
        } else {
            Stmt::Fresh {
                implementation,
                construct,
            }
        };

        debug!(
            "{}: {} -> {} ({})",
            self.decl.name, descriptor.service_key, accessor, descriptor.lifetime
        );

        self.decl.lookups.push(LookupCase {
            service_key: descriptor.service_key.clone(),
            accessor: accessor.clone(),
        });
        self.decl.accessors.push(AccessorDecl {
            name: accessor,
            service_key: descriptor.service_key.clone(),
            body,
        });
        Ok(())
    }
}

fn construct_expr(descriptor: &ServiceDescriptor) -> GenerationResult<ConstructExpr> {
    let implementation = descriptor.implementation.clone();
    Ok(match &descriptor.construction {
        Construction::Factory { method } => ConstructExpr::FactoryCall {
            implementation,
            method: parse_ident(method)?,
        },
        Construction::Constructor { function, args } => ConstructExpr::ConstructorCall {
            implementation,
            function: parse_ident(function)?,
            args: args
                .iter()
                .map(|arg| match arg {
                    Argument::Shared(key) => ArgExpr::Shared(key.clone()),
                    Argument::Cloned(key) => ArgExpr::Cloned(key.clone()),
                    Argument::Provider => ArgExpr::Provider,
                })
                .collect(),
        },
        Construction::UnitLiteral => ConstructExpr::UnitLiteral { implementation },
        Construction::Default => ConstructExpr::DefaultValue { implementation },
    })
}
