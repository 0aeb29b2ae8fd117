//! # DI Codegen
//!
//! 编译期依赖注入容器生成器。
//!
//! 生成过程是一条单向流水线：
//!
//! 1. [`DeclarationScanner`] - 从声明图中筛选带服务标记的具体类型
//! 2. [`DescriptorResolver`] - 确定服务键、生命周期与构造方式
//! 3. [`CodeSynthesizer`] - 划分根提供者与作用域提供者，生成中间表示
//! 4. [`render`] - 把中间表示渲染为 token 流
//!
//! 声明图可以来自 `syn` 语法树（[`source::SynDeclarationSource`]）
//! 或声明清单（[`source::Manifest`]）。

pub mod build_support;
pub mod declaration;
pub mod descriptor;
pub mod diagnostics;
pub mod ir;
pub mod naming;
pub mod options;
pub mod render;
pub mod resolver;
pub mod scanner;
pub mod source;
pub mod synthesizer;

pub use declaration::{DeclarationGraph, Declarations, TypeRef};
pub use descriptor::{DescriptorReport, ServiceDescriptor};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use infrastructure_common::{GenerationError, GenerationResult};
pub use options::{GeneratorOptions, OptionsLoader};
pub use render::render;
pub use resolver::DescriptorResolver;
pub use scanner::DeclarationScanner;
pub use synthesizer::CodeSynthesizer;

use proc_macro2::TokenStream;
use tracing::info;

/// 生成文件的头部注释
pub const GENERATED_HEADER: &str = "// @generated by di-codegen. 请勿手动修改。\n";

/// 一次生成的结果
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    /// 生成的容器模块
    pub tokens: TokenStream,
    pub descriptors: Vec<ServiceDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
    namespace: String,
}

impl GeneratedUnit {
    /// 写入文件用的源码文本
    pub fn source(&self) -> String {
        format!("{GENERATED_HEADER}{}\n", self.tokens)
    }

    /// 描述符表
    pub fn report(&self) -> DescriptorReport {
        DescriptorReport::new(self.namespace.clone(), &self.descriptors)
    }
}

/// 容器生成器
#[derive(Debug, Clone, Default)]
pub struct ContainerGenerator {
    options: GeneratorOptions,
}

impl ContainerGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// 对声明图执行完整的生成流水线
    ///
    /// 任何错误都会中止生成，不产生部分输出。
    pub fn generate<G>(&self, graph: &G) -> GenerationResult<GeneratedUnit>
    where
        G: DeclarationGraph + ?Sized,
    {
        self.options.validate()?;

        let candidates = DeclarationScanner::new().scan(graph);
        let mut diagnostics = Diagnostics::new();
        let descriptors = DescriptorResolver::new(self.options.strict_markers).resolve(
            graph,
            &candidates,
            &mut diagnostics,
        )?;
        let unit = CodeSynthesizer::new(&self.options).synthesize(&descriptors, &mut diagnostics)?;
        let tokens = render(&unit);

        info!(
            "生成容器模块 `{}`: {} 个服务, {} 条诊断",
            self.options.namespace,
            descriptors.len(),
            diagnostics.len()
        );

        Ok(GeneratedUnit {
            tokens,
            descriptors,
            diagnostics: diagnostics.into_vec(),
            namespace: self.options.namespace.clone(),
        })
    }
}
