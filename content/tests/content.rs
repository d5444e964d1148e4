use dust_devil_content::{load_catalog, load_curves, load_settings, ContentError};
use dust_devil_core::{CurveName, CurveProvider, Tier, TypeMask};

const CATALOG: &str = r#"
[[templates]]
name = "crawler"
cost = 1.0
tier = "fodder"
types = "GROUND"

[templates.stats]
health = 40.0
base_speed = 650.0
chitin_chance = 1.5

[[templates]]
name = "skimmer"
cost = 1.5
tier = "standard"
types = "AIR | GROUND"
difficulty_coefficient = 1.25
scale = 1.4

[[templates]]
name = "hive_queen"
cost = 12.0
tier = "boss"
types = "BURROW"
"#;

#[test]
fn loads_catalog_rows() {
    let catalog = load_catalog(CATALOG).expect("catalog parses");

    assert_eq!(catalog.len(), 3);
    let crawler = catalog.find("crawler").expect("crawler present");
    assert_eq!(crawler.tier, Tier::Fodder);
    assert_eq!(crawler.types, TypeMask::GROUND);
    assert_eq!(crawler.stats.health, 40.0);
    assert_eq!(crawler.stats.chitin_chance, 1.0, "chances are clamped");
    assert_eq!(crawler.difficulty_coefficient, 1.0);

    let skimmer = catalog.find("skimmer").expect("skimmer present");
    assert_eq!(skimmer.types, TypeMask::AIR | TypeMask::GROUND);
    assert_eq!(skimmer.scale, 1.4);
    assert_eq!(skimmer.stats.base_speed, 600.0, "unspecified stats use defaults");
}

#[test]
fn rejects_duplicate_template_names() {
    let text = r#"
[[templates]]
name = "crawler"
cost = 1.0

[[templates]]
name = "crawler"
cost = 2.0
"#;
    assert!(matches!(
        load_catalog(text),
        Err(ContentError::DuplicateTemplate(name)) if name == "crawler"
    ));
}

#[test]
fn rejects_negative_costs() {
    let text = r#"
[[templates]]
name = "debt"
cost = -1.0
"#;
    assert!(matches!(
        load_catalog(text),
        Err(ContentError::InvalidTemplate { field: "cost", .. })
    ));
}

#[test]
fn reports_parse_errors() {
    assert!(matches!(
        load_catalog("templates = 3"),
        Err(ContentError::Parse { kind: "catalog", .. })
    ));
}

#[test]
fn loads_and_sorts_curve_rows() {
    let text = r#"
[EnemyGroupSize]
keys = [{ time = 10.0, value = 20.0 }, { time = 0.0, value = 4.0 }]

[EnemyHealthScale]
interpolation = "constant"
keys = [{ time = 0.0, value = 1.0 }, { time = 5.0, value = 3.0 }]
"#;
    let table = load_curves(text).expect("curves parse");

    assert_eq!(table.evaluate(CurveName::EnemyGroupSize, 5.0), Some(12.0));
    assert_eq!(table.evaluate(CurveName::EnemyHealthScale, 4.0), Some(1.0));
    assert_eq!(table.evaluate(CurveName::EnemySpeedScale, 4.0), None);
}

#[test]
fn rejects_empty_curves() {
    let text = r#"
[EnemySpeedScale]
keys = []
"#;
    assert!(matches!(
        load_curves(text),
        Err(ContentError::EmptyCurve(name)) if name == "EnemySpeedScale"
    ));
}

#[test]
fn settings_default_missing_fields() {
    let config = load_settings("global_difficulty = 2.5\nseed = 9\n").expect("settings parse");

    assert_eq!(config.global_difficulty, 2.5);
    assert_eq!(config.seed, 9);
    assert_eq!(config.max_retries, 128);
    assert_eq!(config.tick_interval_ms, 100);
    assert_eq!(config.max_leash_distance, 10_000.0);
}

#[test]
fn rejects_negative_settings() {
    assert!(matches!(
        load_settings("detection_radius = -1.0"),
        Err(ContentError::InvalidSetting {
            field: "detection_radius",
            ..
        })
    ));
}
