//! 清单的描述符表与生成结果

use di_codegen::source::Manifest;
use di_codegen::ContainerGenerator;

fn manifest() -> Manifest {
    Manifest::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/services.toml")).unwrap()
}

#[test]
fn test_descriptor_report_matches_manifest() {
    let manifest = manifest();
    let declarations = manifest.to_declarations().unwrap();
    let unit = ContainerGenerator::new(manifest.generator.clone())
        .generate(&declarations)
        .unwrap();

    let report = serde_json::to_value(unit.report()).unwrap();
    assert_eq!(report["namespace"], "services");

    let rows: Vec<(String, String, String)> = report["services"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["service_key"].as_str().unwrap().to_string(),
                row["lifetime"].as_str().unwrap().to_string(),
                row["construction"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    let expected = [
        ("Clock", "singleton", "unit literal"),
        ("Config", "singleton", "Default::default()"),
        ("dyn Logger", "singleton", "new(Rc<Clock>)"),
        ("Connection", "scoped", "factory open"),
        ("Request", "scoped", "new(Rc<Connection>, Rc<dyn Logger>, Config)"),
        ("Stamp", "transient", "now(Rc<Clock>)"),
    ];
    let expected: Vec<(String, String, String)> = expected
        .iter()
        .map(|(key, lifetime, construction)| {
            (key.to_string(), lifetime.to_string(), construction.to_string())
        })
        .collect();
    assert_eq!(rows, expected);

    assert_eq!(report["services"][2]["marker_origin"]["kind"], "contract");
    assert_eq!(report["services"][2]["marker_origin"]["from"], "Logger");
    assert_eq!(report["services"][3]["disposable"], true);
}

#[test]
fn test_generation_is_stable() {
    let manifest = manifest();
    let declarations = manifest.to_declarations().unwrap();
    let generator = ContainerGenerator::new(manifest.generator.clone());

    let first = generator.generate(&declarations).unwrap();
    let second = generator.generate(&declarations).unwrap();
    assert_eq!(first.source(), second.source());
    assert!(first.diagnostics.is_empty());
}
