use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    di_codegen::build_support::generate_from_manifest("services.toml", out_dir.join("services.rs"))?;
    Ok(())
}
