//! 基于 `syn` 语法树的声明来源
//!
//! 识别的辅助属性：
//!
//! - `#[service(singleton | transient | scoped[, key = Type])]` - 服务标记
//! - `#[factory]` - 工厂方法
//! - `#[extends(Base)]` - 声明基类型
//! - `#[abstract_service]` - 只提供标记、自身不注册的类型

use crate::declaration::{
    ConstructorDecl, Declarations, MarkerDecl, MethodDecl, ParamDecl, TypeDecl, TypeKind, TypeRef,
};
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Ident, Item, ItemImpl, Meta, Result, Token};

/// 生成器消费的辅助属性名
pub const HELPER_ATTRIBUTES: [&str; 4] = ["service", "factory", "extends", "abstract_service"];

/// 释放契约的 trait 名
const DISPOSABLE_TRAIT: &str = "Disposable";

/// 服务标记参数
struct ServiceMarkerArgs {
    lifetime: Option<String>,
    key: Option<syn::Type>,
}

impl Parse for ServiceMarkerArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ServiceMarkerArgs {
            lifetime: None,
            key: None,
        };

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            if input.peek(Token![=]) {
                input.parse::<Token![=]>()?;
                if ident != "key" {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("未知的服务标记参数 `{ident}`"),
                    ));
                }
                if args.key.is_some() {
                    return Err(syn::Error::new(ident.span(), "重复的 `key` 参数"));
                }
                args.key = Some(input.parse()?);
            } else {
                if args.lifetime.is_some() {
                    return Err(syn::Error::new(ident.span(), "服务标记只能声明一个生命周期"));
                }
                args.lifetime = Some(ident.to_string());
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// 从语法树收集声明
#[derive(Debug, Default, Clone, Copy)]
pub struct SynDeclarationSource;

impl SynDeclarationSource {
    /// 从一组条目（通常是模块的内容）收集声明
    pub fn from_items(items: &[Item]) -> Result<Declarations> {
        let mut types = Vec::new();
        for item in items {
            if let Some(decl) = declare(item)? {
                types.push(decl);
            }
        }

        for item in items {
            if let Item::Impl(item_impl) = item {
                collect_impl(&mut types, item_impl);
            }
        }

        Ok(Declarations::new(types))
    }
}

fn declare(item: &Item) -> Result<Option<TypeDecl>> {
    let (ident, attrs, kind, generic, unit) = match item {
        Item::Struct(item) => (
            &item.ident,
            &item.attrs,
            TypeKind::Struct,
            !item.generics.params.is_empty(),
            matches!(item.fields, syn::Fields::Unit),
        ),
        Item::Enum(item) => (
            &item.ident,
            &item.attrs,
            TypeKind::Enum,
            !item.generics.params.is_empty(),
            false,
        ),
        Item::Trait(item) => (
            &item.ident,
            &item.attrs,
            TypeKind::Trait,
            !item.generics.params.is_empty(),
            false,
        ),
        _ => return Ok(None),
    };

    let mut decl = TypeDecl::new(TypeRef::from_path(ident.clone().into()), kind);
    decl.is_unit = unit;
    decl.is_abstract = decl.is_abstract || generic;

    for attr in attrs {
        if attr.path().is_ident("service") {
            decl.markers.push(parse_marker(attr)?);
        } else if attr.path().is_ident("extends") {
            if decl.base.is_some() {
                return Err(syn::Error::new_spanned(attr, "一个类型只能声明一个基类型"));
            }
            decl.base = Some(TypeRef::from_type(attr.parse_args::<syn::Type>()?));
        } else if attr.path().is_ident("abstract_service") {
            attr.meta.require_path_only()?;
            decl.is_abstract = true;
        }
    }

    Ok(Some(decl))
}

fn parse_marker(attr: &Attribute) -> Result<MarkerDecl> {
    match &attr.meta {
        Meta::Path(_) => Ok(MarkerDecl {
            lifetime: None,
            key: None,
        }),
        Meta::List(_) => {
            let args = attr.parse_args::<ServiceMarkerArgs>()?;
            Ok(MarkerDecl {
                lifetime: args.lifetime,
                key: args.key.map(TypeRef::from_type),
            })
        }
        Meta::NameValue(_) => Err(syn::Error::new_spanned(
            attr,
            "服务标记的写法为 #[service(singleton | transient | scoped[, key = Type])]",
        )),
    }
}

/// impl 块提供契约、释放能力与关联函数；目标类型不在本组声明中时忽略
fn collect_impl(types: &mut [TypeDecl], item_impl: &ItemImpl) {
    let self_ty = TypeRef::from_type((*item_impl.self_ty).clone());
    let Some(name) = self_ty.simple_name() else {
        return;
    };
    let Some(decl) = types
        .iter_mut()
        .find(|decl| decl.kind != TypeKind::Trait && decl.definition_name() == name)
    else {
        return;
    };

    if let Some((negative, path, _)) = &item_impl.trait_ {
        if negative.is_some() {
            return;
        }
        let contract = TypeRef::from_path(path.clone());
        if contract.simple_name().as_deref() == Some(DISPOSABLE_TRAIT) {
            decl.disposable = true;
        } else if !decl.contracts.contains(&contract) {
            decl.contracts.push(contract);
        }
        return;
    }

    for impl_item in &item_impl.items {
        let syn::ImplItem::Fn(function) = impl_item else {
            continue;
        };
        let method = method_decl(&decl.ty, function);

        let is_constructor = decl.constructor.is_none()
            && method.is_static
            && !method.is_factory
            && method.returns.as_ref() == Some(&decl.ty);
        if is_constructor {
            decl.constructor = Some(ConstructorDecl {
                name: method.name.clone(),
                params: method.params.clone(),
            });
        }
        decl.methods.push(method);
    }
}

fn method_decl(owner: &TypeRef, function: &syn::ImplItemFn) -> MethodDecl {
    let is_factory = function
        .attrs
        .iter()
        .any(|attr| attr.path().is_ident("factory"));

    let params = function
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            syn::FnArg::Typed(pat_type) => Some(pat_type),
            syn::FnArg::Receiver(_) => None,
        })
        .map(|pat_type| {
            let name = match pat_type.pat.as_ref() {
                syn::Pat::Ident(pat) => pat.ident.to_string(),
                _ => "_".to_string(),
            };
            ParamDecl {
                name,
                ty: TypeRef::from_type((*pat_type.ty).clone()).replace_self(owner),
            }
        })
        .collect();

    let returns = match &function.sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(TypeRef::from_type((**ty).clone()).replace_self(owner)),
    };

    MethodDecl {
        name: function.sig.ident.to_string(),
        is_static: function.sig.receiver().is_none(),
        is_factory,
        params,
        returns,
    }
}

/// 移除生成器消费的辅助属性
pub fn strip_helper_attributes(items: &mut [Item]) {
    for item in items {
        match item {
            Item::Struct(item) => strip(&mut item.attrs),
            Item::Enum(item) => strip(&mut item.attrs),
            Item::Trait(item) => strip(&mut item.attrs),
            Item::Impl(item) => {
                for impl_item in &mut item.items {
                    if let syn::ImplItem::Fn(function) = impl_item {
                        strip(&mut function.attrs);
                    }
                }
            }
            _ => {}
        }
    }
}

fn strip(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| {
        !HELPER_ATTRIBUTES
            .iter()
            .any(|helper| attr.path().is_ident(helper))
    });
}
