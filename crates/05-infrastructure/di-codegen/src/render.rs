//! 渲染器：把 [`ContainerUnit`] 转换为 token 流

use crate::ir::{
    AccessorDecl, ArgExpr, ConstructExpr, ContainerUnit, ProviderDecl, ProviderKind, Stmt,
};
use proc_macro2::TokenStream;
use quote::quote;

/// 渲染整个生成单元
pub fn render(unit: &ContainerUnit) -> TokenStream {
    let namespace = &unit.namespace;
    let root = render_root(unit);
    let scoped = render_scoped(unit);

    quote! {
        /// 编译期生成的服务容器
        pub mod #namespace {
            #![allow(
                dead_code,
                unused_imports,
                unused_variables,
                missing_docs,
                non_snake_case,
                clippy::all
            )]

            use super::*;

            #root

            #scoped
        }
    }
}

fn render_root(unit: &ContainerUnit) -> TokenStream {
    let rt = &unit.runtime;
    let provider = &unit.root;
    let scoped_name = &unit.scoped.name;
    let name = &provider.name;
    let state = state_name(provider);

    let cell_names = provider.cells.iter().map(|cell| &cell.name);
    let cell_types = provider.cells.iter().map(|cell| &cell.implementation);
    let accessors = provider
        .accessors
        .iter()
        .map(|accessor| render_accessor(rt, accessor));
    let lookup = render_lookup(rt, provider);
    let dispose = render_dispose(rt, provider);
    let common = render_common_methods(rt);

    quote! {
        /// 根服务提供者，持有单例与瞬时服务
        ///
        /// 克隆得到的句柄共享同一组单例。提供者是单线程的。
        #[derive(Clone)]
        pub struct #name {
            state: ::std::rc::Rc<#state>,
        }

        #[derive(Default)]
        struct #state {
            #( #cell_names: #rt::OnceCell<::std::rc::Rc<#cell_types>>, )*
        }

        impl #name {
            /// 创建新的根服务提供者
            pub fn new() -> Self {
                Self {
                    state: ::std::rc::Rc::new(::std::default::Default::default()),
                }
            }

            #common

            #( #accessors )*
        }

        impl ::std::default::Default for #name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl #rt::ServiceProvider for #name {
            #lookup

            fn create_scope(&self) -> #rt::ServiceScope {
                #rt::ServiceScope::new(#scoped_name::new(::std::rc::Rc::new(self.clone())))
            }

            #dispose
        }
    }
}

fn render_scoped(unit: &ContainerUnit) -> TokenStream {
    let rt = &unit.runtime;
    let provider = &unit.scoped;
    let name = &provider.name;
    let state = state_name(provider);

    let cell_names = provider.cells.iter().map(|cell| &cell.name);
    let cell_types = provider.cells.iter().map(|cell| &cell.implementation);
    let accessors = provider
        .accessors
        .iter()
        .map(|accessor| render_accessor(rt, accessor));
    let lookup = render_lookup(rt, provider);
    let dispose = render_dispose(rt, provider);
    let common = render_common_methods(rt);

    quote! {
        /// 作用域服务提供者，持有作用域服务并把其余请求委托给父提供者
        ///
        /// 克隆得到的句柄共享同一组作用域实例。
        #[derive(Clone)]
        pub struct #name {
            parent: ::std::rc::Rc<dyn #rt::ServiceProvider>,
            state: ::std::rc::Rc<#state>,
        }

        #[derive(Default)]
        struct #state {
            #( #cell_names: #rt::OnceCell<::std::rc::Rc<#cell_types>>, )*
        }

        impl #name {
            /// 在给定父提供者之上创建作用域提供者
            pub fn new(parent: ::std::rc::Rc<dyn #rt::ServiceProvider>) -> Self {
                Self {
                    parent,
                    state: ::std::rc::Rc::new(::std::default::Default::default()),
                }
            }

            #common

            #( #accessors )*
        }

        impl #rt::ServiceProvider for #name {
            #lookup

            /// 嵌套作用域与本作用域共享作用域实例，释放仍由本作用域负责
            fn create_scope(&self) -> #rt::ServiceScope {
                #rt::ServiceScope::nested(self.clone())
            }

            #dispose
        }
    }
}

fn state_name(provider: &ProviderDecl) -> proc_macro2::Ident {
    match &provider.state_name {
        Some(state) => state.clone(),
        None => quote::format_ident!("{}State", provider.name),
    }
}

/// 泛型查找方法，转发到 `ServiceProviderExt`
fn render_common_methods(rt: &syn::Path) -> TokenStream {
    quote! {
        /// 获取服务，未注册时返回 `Ok(None)`
        pub fn get_service<T>(&self) -> #rt::DependencyResult<::std::option::Option<::std::rc::Rc<T>>>
        where
            T: ?Sized + 'static,
        {
            #rt::ServiceProviderExt::get_service::<T>(self)
        }

        /// 获取必需的服务，未注册时返回 `ServiceNotRegistered`
        pub fn get_required_service<T>(&self) -> #rt::DependencyResult<::std::rc::Rc<T>>
        where
            T: ?Sized + 'static,
        {
            #rt::ServiceProviderExt::get_required_service::<T>(self)
        }
    }
}

fn render_accessor(rt: &syn::Path, accessor: &AccessorDecl) -> TokenStream {
    let name = &accessor.name;
    let key = &accessor.service_key;

    let body = match &accessor.body {
        Stmt::Memoized {
            cell,
            implementation,
            construct,
        } => {
            let construct = render_construct(construct);
            quote! {
                let instance: ::std::rc::Rc<#implementation> = self.state.#cell
                    .get_or_try_init(|| -> #rt::DependencyResult<::std::rc::Rc<#implementation>> {
                        ::std::result::Result::Ok(::std::rc::Rc::new(#construct))
                    })?
                    .clone();
            }
        }
        Stmt::Fresh {
            implementation,
            construct,
        } => {
            let construct = render_construct(construct);
            quote! {
                let instance: ::std::rc::Rc<#implementation> = ::std::rc::Rc::new(#construct);
            }
        }
    };

    quote! {
        fn #name(&self) -> #rt::DependencyResult<::std::rc::Rc<#key>> {
            #body
            let service: ::std::rc::Rc<#key> = instance;
            ::std::result::Result::Ok(service)
        }
    }
}

fn render_construct(construct: &ConstructExpr) -> TokenStream {
    match construct {
        ConstructExpr::FactoryCall {
            implementation,
            method,
        } => quote!(<#implementation>::#method(self)),
        ConstructExpr::ConstructorCall {
            implementation,
            function,
            args,
        } => {
            let args = args.iter().map(render_arg);
            quote!(<#implementation>::#function(#(#args),*))
        }
        ConstructExpr::UnitLiteral { implementation } => match implementation.to_expr_path() {
            Some(path) => quote!(#path),
            None => quote!(<#implementation as ::std::default::Default>::default()),
        },
        ConstructExpr::DefaultValue { implementation } => {
            quote!(<#implementation as ::std::default::Default>::default())
        }
    }
}

fn render_arg(arg: &ArgExpr) -> TokenStream {
    match arg {
        ArgExpr::Shared(key) => quote!(self.get_required_service::<#key>()?),
        ArgExpr::Cloned(key) => {
            quote!(::std::clone::Clone::clone(&*self.get_required_service::<#key>()?))
        }
        ArgExpr::Provider => quote!(self),
    }
}

fn render_lookup(rt: &syn::Path, provider: &ProviderDecl) -> TokenStream {
    let cases = provider.lookups.iter().map(|case| {
        let key = &case.service_key;
        let accessor = &case.accessor;
        quote! {
            if service_type == ::std::any::TypeId::of::<#key>() {
                return self
                    .#accessor()
                    .map(|service| ::std::option::Option::Some(#rt::into_instance(service)));
            }
        }
    });

    let fallback = match provider.kind {
        ProviderKind::Root => quote!(::std::result::Result::Ok(::std::option::Option::None)),
        ProviderKind::Scoped => {
            quote!(#rt::ServiceProvider::get_service_by_type(&*self.parent, service_type))
        }
    };

    quote! {
        fn get_service_by_type(
            &self,
            service_type: ::std::any::TypeId,
        ) -> #rt::DependencyResult<::std::option::Option<#rt::ServiceInstance>> {
            #( #cases )*
            #fallback
        }
    }
}

fn render_dispose(rt: &syn::Path, provider: &ProviderDecl) -> TokenStream {
    let statements = provider.disposals.iter().map(|disposal| {
        let cell = &disposal.cell;
        quote! {
            if let ::std::option::Option::Some(instance) = self.state.#cell.get() {
                #rt::Disposable::dispose(&**instance);
            }
        }
    });

    quote! {
        fn dispose(&self) {
            #( #statements )*
        }
    }
}
