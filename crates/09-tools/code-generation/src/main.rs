//! # di-codegen
//!
//! 由声明清单（TOML 或 JSON）生成服务容器源码，或输出描述符表。

use anyhow::Context;
use clap::{Parser, ValueEnum};
use di_codegen::build_support::write_if_changed;
use di_codegen::source::Manifest;
use di_codegen::{ContainerGenerator, OptionsLoader};
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "di-codegen")]
#[command(about = "编译期依赖注入容器生成器")]
struct Args {
    /// 声明清单路径
    manifest: PathBuf,

    /// 输出文件，省略时写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 叠加在清单 `[generator]` 之上的选项文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 覆盖生成模块名
    #[arg(long)]
    namespace: Option<String>,

    /// 标记冲突视为错误
    #[arg(long)]
    strict: bool,

    /// 输出内容
    #[arg(long, value_enum, default_value_t = Emit::Source)]
    emit: Emit,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// 容器源码
    Source,
    /// JSON 描述符表
    Descriptors,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 日志写到标准错误，标准输出留给生成结果
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let output = generate(&args)?;

    match &args.output {
        Some(path) => {
            let written = write_if_changed(path, &output)
                .with_context(|| format!("无法写入 {}", path.display()))?;
            info!(
                "{} {}",
                if written { "已写入" } else { "内容未变化" },
                path.display()
            );
        }
        None => print!("{output}"),
    }

    Ok(())
}

/// 执行生成并返回要输出的文本
fn generate(args: &Args) -> anyhow::Result<String> {
    let manifest = Manifest::from_path(&args.manifest)
        .with_context(|| format!("无法加载声明清单 {}", args.manifest.display()))?;

    let mut loader = OptionsLoader::new(manifest.generator.clone());
    if let Some(config) = &args.config {
        loader = loader.with_file(config);
    }
    let mut options = loader.load().context("生成选项无效")?;
    if let Some(namespace) = &args.namespace {
        options.namespace = namespace.clone();
    }
    if args.strict {
        options.strict_markers = true;
    }

    let declarations = manifest.to_declarations()?;
    let unit = ContainerGenerator::new(options)
        .generate(&declarations)
        .with_context(|| format!("容器生成失败: {}", args.manifest.display()))?;

    match args.emit {
        Emit::Source => Ok(unit.source()),
        Emit::Descriptors => {
            let mut json = serde_json::to_string_pretty(&unit.report())?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
