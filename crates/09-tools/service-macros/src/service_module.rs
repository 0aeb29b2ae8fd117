//! 服务容器生成宏实现

use di_codegen::source::{strip_helper_attributes, SynDeclarationSource};
use di_codegen::{ContainerGenerator, GeneratorOptions};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Expr, ItemMod, Lit,
    Meta, Result, Token,
};

/// 宏参数
#[derive(Debug, Clone, Default)]
pub struct ServiceModuleArgs {
    pub options: GeneratorOptions,
}

impl Parse for ServiceModuleArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut options = GeneratorOptions::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::Path(path) if path.is_ident("strict") => {
                    options.strict_markers = true;
                }
                Meta::NameValue(nv) => {
                    let value = string_value(&nv.value)?;
                    if nv.path.is_ident("namespace") {
                        options.namespace = value;
                    } else if nv.path.is_ident("provider") {
                        options.provider_name = value;
                    } else if nv.path.is_ident("scoped_provider") {
                        options.scoped_provider_name = value;
                    } else if nv.path.is_ident("runtime") {
                        options.runtime_path = value;
                    } else {
                        return Err(syn::Error::new_spanned(nv.path, "未知的 service_module 参数"));
                    }
                }
                other => {
                    return Err(syn::Error::new_spanned(other, "未知的 service_module 参数"));
                }
            }
        }

        Ok(Self { options })
    }
}

fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(syn::Error::new_spanned(other, "参数值必须是字符串")),
        },
        other => Err(syn::Error::new_spanned(other, "参数值必须是字符串")),
    }
}

pub fn service_module_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ServiceModuleArgs);
    let module = parse_macro_input!(input as ItemMod);

    match expand(args, module) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(args: ServiceModuleArgs, mut module: ItemMod) -> Result<proc_macro2::TokenStream> {
    let span = module.ident.span();
    let (_, items) = module.content.as_mut().ok_or_else(|| {
        syn::Error::new(span, "#[service_module] 只能用于内联模块 `mod name { ... }`")
    })?;

    let declarations = SynDeclarationSource::from_items(items)?;
    let unit = ContainerGenerator::new(args.options)
        .generate(&declarations)
        .map_err(|e| syn::Error::new(span, e.to_string()))?;

    strip_helper_attributes(items);
    items.push(syn::parse2::<syn::Item>(unit.tokens)?);

    Ok(quote!(#module))
}
