//! 声明图模型
//!
//! 生成器只通过 [`DeclarationGraph`] 读取类型声明，
//! 具体来源可以是 `syn` 语法树，也可以是声明清单。

use infrastructure_common::{GenerationError, GenerationResult};
use proc_macro2::TokenStream;
use quote::ToTokens;
use std::fmt;
use std::hash::{Hash, Hasher};
use syn::visit_mut::{self, VisitMut};

/// 类型引用
///
/// 同时保存解析后的 `syn::Type` 和规范化的显示文本，
/// 相等性与哈希只看显示文本。
#[derive(Clone)]
pub struct TypeRef {
    ty: syn::Type,
    display: String,
}

impl TypeRef {
    /// 从源码文本解析类型
    pub fn parse(source: &str) -> GenerationResult<Self> {
        let ty = syn::parse_str::<syn::Type>(source).map_err(|e| {
            GenerationError::invalid_declaration(format!("无法解析类型 `{source}`: {e}"))
        })?;
        Ok(Self::from_type(ty))
    }

    /// 由语法树类型构造
    pub fn from_type(ty: syn::Type) -> Self {
        let display = normalize_display(&ty.to_token_stream().to_string());
        Self { ty, display }
    }

    /// 由路径构造
    pub fn from_path(path: syn::Path) -> Self {
        Self::from_type(syn::Type::Path(syn::TypePath { qself: None, path }))
    }

    /// 规范化的显示文本
    pub fn display(&self) -> &str {
        &self.display
    }

    /// 语法树类型
    pub fn ty(&self) -> &syn::Type {
        &self.ty
    }

    /// 最后一段路径；`dyn Trait` 取第一个 trait 约束
    pub fn last_segment(&self) -> Option<&syn::PathSegment> {
        match strip_parens(&self.ty) {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                type_path.path.segments.last()
            }
            syn::Type::TraitObject(object) => object.bounds.iter().find_map(|bound| match bound {
                syn::TypeParamBound::Trait(trait_bound) => trait_bound.path.segments.last(),
                _ => None,
            }),
            _ => None,
        }
    }

    /// 不带路径和泛型参数的简单名称，例如 `Handler<Order>` 的 `Handler`
    pub fn simple_name(&self) -> Option<String> {
        self.last_segment().map(|segment| segment.ident.to_string())
    }

    /// 最后一段上的泛型类型参数
    pub fn generic_args(&self) -> Vec<TypeRef> {
        let Some(segment) = self.last_segment() else {
            return Vec::new();
        };
        match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(ty) => Some(Self::from_type(ty.clone())),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 是否为 `Self`
    pub fn is_self(&self) -> bool {
        self.display == "Self"
    }

    /// 将其中出现的 `Self` 替换为给定类型
    pub fn replace_self(&self, target: &TypeRef) -> TypeRef {
        let mut ty = self.ty.clone();
        ReplaceSelf { target: &target.ty }.visit_type_mut(&mut ty);
        Self::from_type(ty)
    }

    /// 转换为表达式位置可用的路径（泛型参数改写为 turbofish）
    pub fn to_expr_path(&self) -> Option<syn::ExprPath> {
        let syn::Type::Path(type_path) = strip_parens(&self.ty) else {
            return None;
        };
        let mut path = type_path.path.clone();
        for segment in &mut path.segments {
            if let syn::PathArguments::AngleBracketed(args) = &mut segment.arguments {
                args.colon2_token = Some(Default::default());
            }
        }
        Some(syn::ExprPath {
            attrs: Vec::new(),
            qself: type_path.qself.clone(),
            path,
        })
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.display)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl ToTokens for TypeRef {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.ty.to_tokens(tokens);
    }
}

fn strip_parens(ty: &syn::Type) -> &syn::Type {
    match ty {
        syn::Type::Paren(inner) => strip_parens(&inner.elem),
        syn::Type::Group(inner) => strip_parens(&inner.elem),
        other => other,
    }
}

/// 去掉 token 之间多余的空格，只保留两个标识符字符之间的空格
fn normalize_display(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut result = String::with_capacity(raw.len());

    for (i, &ch) in chars.iter().enumerate() {
        if ch == ' ' {
            let prev = result.chars().last();
            let next = chars.get(i + 1).copied();
            let keeps = matches!(
                (prev, next),
                (Some(p), Some(n)) if is_ident_char(p) && is_ident_char(n)
            );
            if keeps {
                result.push(' ');
            }
            continue;
        }
        result.push(ch);
        if ch == ',' {
            result.push(' ');
        }
    }

    result.trim_end().to_string()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

struct ReplaceSelf<'a> {
    target: &'a syn::Type,
}

impl VisitMut for ReplaceSelf<'_> {
    fn visit_type_mut(&mut self, ty: &mut syn::Type) {
        if let syn::Type::Path(type_path) = ty {
            if type_path.qself.is_none() && type_path.path.is_ident("Self") {
                *ty = self.target.clone();
                return;
            }
        }
        visit_mut::visit_type_mut(self, ty);
    }
}

/// 类型声明的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Struct,
    Enum,
    Trait,
}

/// 服务标记
///
/// `lifetime` 保留原始文本，由解析器负责识别。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDecl {
    pub lifetime: Option<String>,
    pub key: Option<TypeRef>,
}

impl MarkerDecl {
    pub fn new(lifetime: impl Into<String>) -> Self {
        Self {
            lifetime: Some(lifetime.into()),
            key: None,
        }
    }

    pub fn with_key(mut self, key: TypeRef) -> Self {
        self.key = Some(key);
        self
    }
}

/// 函数参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeRef,
}

/// 关联函数声明
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub is_static: bool,
    pub is_factory: bool,
    pub params: Vec<ParamDecl>,
    pub returns: Option<TypeRef>,
}

/// 构造函数声明
#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
}

/// 类型声明
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// 生成代码中引用该类型所用的路径
    pub ty: TypeRef,
    pub kind: TypeKind,
    pub is_abstract: bool,
    /// 单元结构体可以直接以字面量构造
    pub is_unit: bool,
    pub base: Option<TypeRef>,
    /// 按声明顺序实现的契约
    pub contracts: Vec<TypeRef>,
    pub disposable: bool,
    pub markers: Vec<MarkerDecl>,
    pub constructor: Option<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(ty: TypeRef, kind: TypeKind) -> Self {
        Self {
            is_abstract: kind == TypeKind::Trait,
            ty,
            kind,
            is_unit: false,
            base: None,
            contracts: Vec::new(),
            disposable: false,
            markers: Vec::new(),
            constructor: None,
            methods: Vec::new(),
        }
    }

    /// 用于在声明图中查找的定义名
    pub fn definition_name(&self) -> String {
        self.ty
            .simple_name()
            .unwrap_or_else(|| self.ty.display().to_string())
    }

    /// 是否不能作为实现类型
    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.kind == TypeKind::Trait
    }
}

/// 声明图
///
/// 生成器所需的全部类型信息都从这里读取。
pub trait DeclarationGraph {
    /// 按声明顺序列出所有类型
    fn list_types(&self) -> &[TypeDecl];

    /// 按定义名查找类型（忽略路径前缀和泛型参数）
    fn find_type(&self, reference: &TypeRef) -> Option<&TypeDecl> {
        let name = reference.simple_name()?;
        self.list_types()
            .iter()
            .find(|decl| decl.definition_name() == name)
    }

    /// 类型上直接声明的服务标记
    fn attributes_of<'a>(&'a self, decl: &'a TypeDecl) -> &'a [MarkerDecl] {
        &decl.markers
    }

    /// 第一个构造函数的参数列表
    fn constructor_params_of<'a>(&'a self, decl: &'a TypeDecl) -> Option<&'a ConstructorDecl> {
        decl.constructor.as_ref()
    }

    /// 类型的静态方法，按声明顺序
    fn static_methods_of<'a>(&'a self, decl: &'a TypeDecl) -> Vec<&'a MethodDecl> {
        decl.methods.iter().filter(|method| method.is_static).collect()
    }
}

/// 内存中的声明集合
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    types: Vec<TypeDecl>,
}

impl Declarations {
    pub fn new(types: Vec<TypeDecl>) -> Self {
        Self { types }
    }

    pub fn push(&mut self, decl: TypeDecl) {
        self.types.push(decl);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DeclarationGraph for Declarations {
    fn list_types(&self) -> &[TypeDecl] {
        &self.types
    }
}
