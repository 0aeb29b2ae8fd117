//! 构建脚本辅助
//!
//! ```no_run
//! // build.rs
//! fn main() -> anyhow::Result<()> {
//!     let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
//!     di_codegen::build_support::generate_from_manifest("services.toml", out_dir.join("services.rs"))?;
//!     Ok(())
//! }
//! ```

use crate::options::{OptionsLoader, ENV_PREFIX};
use crate::source::Manifest;
use crate::{ContainerGenerator, GeneratedUnit};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// 影响生成结果的环境变量
const OPTION_VARIABLES: [&str; 5] = [
    "NAMESPACE",
    "PROVIDER_NAME",
    "SCOPED_PROVIDER_NAME",
    "RUNTIME_PATH",
    "STRICT_MARKERS",
];

/// 由清单生成容器代码并写入 `out_file`
///
/// 只有内容变化时才写文件；非致命诊断以 `cargo:warning=` 输出。
pub fn generate_from_manifest(
    manifest: impl AsRef<Path>,
    out_file: impl AsRef<Path>,
) -> anyhow::Result<GeneratedUnit> {
    let manifest_path = manifest.as_ref();
    let out_file = out_file.as_ref();

    println!("cargo:rerun-if-changed={}", manifest_path.display());
    for variable in OPTION_VARIABLES {
        println!("cargo:rerun-if-env-changed={ENV_PREFIX}_{variable}");
    }

    let manifest = Manifest::from_path(manifest_path)
        .with_context(|| format!("无法加载声明清单 {}", manifest_path.display()))?;
    let options = OptionsLoader::new(manifest.generator.clone())
        .load()
        .context("生成选项无效")?;
    let declarations = manifest.to_declarations()?;

    let unit = ContainerGenerator::new(options)
        .generate(&declarations)
        .with_context(|| format!("容器生成失败: {}", manifest_path.display()))?;

    for diagnostic in &unit.diagnostics {
        println!("cargo:warning={diagnostic}");
    }

    let written = write_if_changed(out_file, &unit.source())
        .with_context(|| format!("无法写入 {}", out_file.display()))?;
    debug!(
        "生成文件 {} ({})",
        out_file.display(),
        if written { "已更新" } else { "未变化" }
    );

    Ok(unit)
}

/// 内容与现有文件不同时才写入，返回是否写入
pub fn write_if_changed(path: impl AsRef<Path>, contents: &str) -> std::io::Result<bool> {
    let path = path.as_ref();
    if let Ok(existing) = std::fs::read_to_string(path) {
        if existing == contents {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(true)
}
