//! 描述符解析器
//!
//! 为每个服务候选确定服务键、生命周期与构造方式。

use crate::declaration::{DeclarationGraph, MethodDecl, ParamDecl, TypeDecl, TypeRef};
use crate::descriptor::{Argument, Construction, ServiceDescriptor};
use crate::diagnostics::Diagnostics;
use crate::scanner::{Candidate, MarkerSource};
use infrastructure_common::{GenerationError, GenerationResult, Lifetime};
use tracing::{debug, info};

/// 描述符解析器
#[derive(Debug, Default, Clone)]
pub struct DescriptorResolver {
    strict_markers: bool,
}

impl DescriptorResolver {
    /// 创建解析器；`strict_markers` 为真时标记冲突是致命错误
    pub fn new(strict_markers: bool) -> Self {
        Self { strict_markers }
    }

    /// 按候选顺序解析全部描述符，遇到第一个错误即中止
    pub fn resolve<G>(
        &self,
        graph: &G,
        candidates: &[Candidate<'_>],
        diagnostics: &mut Diagnostics,
    ) -> GenerationResult<Vec<ServiceDescriptor>>
    where
        G: DeclarationGraph + ?Sized,
    {
        let descriptors = candidates
            .iter()
            .map(|candidate| self.resolve_candidate(graph, candidate, diagnostics))
            .collect::<GenerationResult<Vec<_>>>()?;

        info!("解析完成: {} 个服务描述符", descriptors.len());
        Ok(descriptors)
    }

    fn resolve_candidate<G>(
        &self,
        graph: &G,
        candidate: &Candidate<'_>,
        diagnostics: &mut Diagnostics,
    ) -> GenerationResult<ServiceDescriptor>
    where
        G: DeclarationGraph + ?Sized,
    {
        let decl = candidate.decl;
        let primary = candidate.primary();
        let type_name = decl.ty.to_string();

        let lifetime = parse_lifetime(&type_name, primary)?;
        self.check_conflicts(candidate, diagnostics)?;

        let service_key = primary
            .marker
            .key
            .clone()
            .unwrap_or_else(|| decl.ty.clone());
        validate_service_key(&service_key)?;

        let construction = resolve_construction(graph, decl, diagnostics)?;

        debug!(
            "服务 {} -> {} ({}, {}, 来源 {})",
            service_key, decl.ty, lifetime, construction, primary.origin
        );

        Ok(ServiceDescriptor {
            service_key,
            implementation: decl.ty.clone(),
            lifetime,
            construction,
            disposable: decl.disposable,
            marker_origin: primary.origin.clone(),
            ambiguous: candidate.is_ambiguous(),
        })
    }

    /// 多条标记来源在生命周期或服务键上不一致时报告
    fn check_conflicts(
        &self,
        candidate: &Candidate<'_>,
        diagnostics: &mut Diagnostics,
    ) -> GenerationResult<()> {
        let primary = &candidate.primary().marker;
        let conflicting = candidate.sources[1..].iter().any(|source| {
            source.marker.lifetime != primary.lifetime || source.marker.key != primary.key
        });
        if !conflicting {
            return Ok(());
        }

        let type_name = candidate.decl.ty.to_string();
        let sources = candidate
            .sources
            .iter()
            .map(describe_source)
            .collect::<Vec<_>>()
            .join(", ");

        if self.strict_markers {
            return Err(GenerationError::ConflictingMarkers { type_name, sources });
        }
        diagnostics.warning(
            type_name,
            format!("存在相互冲突的服务标记，采用第一条: {sources}"),
        );
        Ok(())
    }
}

fn describe_source(source: &MarkerSource) -> String {
    let lifetime = source.marker.lifetime.as_deref().unwrap_or("?");
    match &source.marker.key {
        Some(key) => format!("{} [{lifetime}, key = {key}]", source.origin),
        None => format!("{} [{lifetime}]", source.origin),
    }
}

fn parse_lifetime(type_name: &str, source: &MarkerSource) -> GenerationResult<Lifetime> {
    let marker = source
        .marker
        .lifetime
        .as_deref()
        .ok_or_else(|| GenerationError::MissingLifetime {
            type_name: type_name.to_string(),
        })?;

    Lifetime::from_marker(marker).ok_or_else(|| GenerationError::UnknownLifetime {
        type_name: type_name.to_string(),
        marker: marker.to_string(),
    })
}

/// 服务键必须是类型路径或 trait 对象
pub fn validate_service_key(service_key: &TypeRef) -> GenerationResult<()> {
    let reason = match service_key.ty() {
        syn::Type::Path(type_path) if type_path.qself.is_some() => Some("不支持限定路径"),
        syn::Type::Path(_) if service_key.is_self() => Some("服务键不能是 `Self`"),
        syn::Type::Path(_) => None,
        syn::Type::TraitObject(_) if service_key.simple_name().is_some() => None,
        syn::Type::TraitObject(_) => Some("trait 对象缺少 trait 约束"),
        _ => Some("服务键必须是类型路径或 `dyn Trait`"),
    };

    match reason {
        Some(reason) => Err(GenerationError::InvalidServiceKey {
            service_key: service_key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn resolve_construction<G>(
    graph: &G,
    decl: &TypeDecl,
    diagnostics: &mut Diagnostics,
) -> GenerationResult<Construction>
where
    G: DeclarationGraph + ?Sized,
{
    if let Some(method) = find_factory(graph, decl, diagnostics) {
        return Ok(Construction::Factory {
            method: method.name.clone(),
        });
    }

    if let Some(constructor) = graph.constructor_params_of(decl) {
        let args = constructor
            .params
            .iter()
            .map(|param| classify_argument(decl, param))
            .collect::<GenerationResult<Vec<_>>>()?;
        return Ok(Construction::Constructor {
            function: constructor.name.clone(),
            args,
        });
    }

    if decl.is_unit {
        Ok(Construction::UnitLiteral)
    } else {
        Ok(Construction::Default)
    }
}

/// 第一个签名正确的工厂方法；签名不符的工厂方法被忽略
fn find_factory<'a, G>(
    graph: &'a G,
    decl: &'a TypeDecl,
    diagnostics: &mut Diagnostics,
) -> Option<&'a MethodDecl>
where
    G: DeclarationGraph + ?Sized,
{
    for method in graph.static_methods_of(decl) {
        if !method.is_factory {
            continue;
        }
        if is_factory_shape(decl, method) {
            return Some(method);
        }
        debug!("忽略签名不匹配的工厂方法: {}::{}", decl.ty, method.name);
        diagnostics.note(
            decl.ty.to_string(),
            format!(
                "工厂方法 `{}` 必须只接受一个 `&dyn ServiceProvider` 参数并返回 `{}`，已忽略",
                method.name, decl.ty
            ),
        );
    }
    None
}

fn is_factory_shape(decl: &TypeDecl, method: &MethodDecl) -> bool {
    let returns_implementation = method
        .returns
        .as_ref()
        .map(|returns| returns.replace_self(&decl.ty) == decl.ty)
        .unwrap_or(false);

    returns_implementation
        && method.params.len() == 1
        && is_provider_reference(method.params[0].ty.ty())
}

fn classify_argument(decl: &TypeDecl, param: &ParamDecl) -> GenerationResult<Argument> {
    let ty = param.ty.replace_self(&decl.ty);

    if is_provider_reference(ty.ty()) {
        return Ok(Argument::Provider);
    }
    if let syn::Type::Reference(_) = ty.ty() {
        return Err(GenerationError::invalid_declaration(format!(
            "{} 的构造函数参数 `{}: {}` 无法注入：只支持 `Rc<T>`、可克隆的值类型或 `&dyn ServiceProvider`",
            decl.ty, param.name, ty
        )));
    }
    if let Some(inner) = rc_inner(&ty) {
        return Ok(Argument::Shared(inner));
    }
    Ok(Argument::Cloned(ty))
}

/// `&dyn ServiceProvider`，允许带路径前缀
fn is_provider_reference(ty: &syn::Type) -> bool {
    let syn::Type::Reference(reference) = ty else {
        return false;
    };
    if reference.mutability.is_some() {
        return false;
    }
    let elem = match reference.elem.as_ref() {
        syn::Type::Paren(inner) => inner.elem.as_ref(),
        other => other,
    };
    let syn::Type::TraitObject(object) = elem else {
        return false;
    };
    object.bounds.iter().any(|bound| match bound {
        syn::TypeParamBound::Trait(trait_bound) => trait_bound
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "ServiceProvider")
            .unwrap_or(false),
        _ => false,
    })
}

/// `Rc<K>` 的 `K`
fn rc_inner(ty: &TypeRef) -> Option<TypeRef> {
    let segment = ty.last_segment()?;
    if segment.ident != "Rc" {
        return None;
    }
    match ty.generic_args().as_slice() {
        [inner] => Some(inner.clone()),
        _ => None,
    }
}
