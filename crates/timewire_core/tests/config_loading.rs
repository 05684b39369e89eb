use std::fs;
use timewire_core::db::open_db_in_memory;
use timewire_core::{
    ConfigError, EngineConfig, FieldService, FieldServiceError, FractionOverflow,
    SqliteColumnRepository, TemporalError,
};

const FULL_CONFIG: &str = r#"{
    "logging": { "level": "warn" },
    "parse": { "fraction_overflow": "truncate" },
    "connectors": [
        { "name": "primary", "provider": "postgresql", "precision": 6 },
        { "name": "archive", "provider": "mongodb" },
        { "name": "legacy", "provider": "sqlite" }
    ],
    "active_connector": "legacy"
}"#;

#[test]
fn load_reads_file_and_builds_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timewire.json");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.parse_options().fraction_overflow,
        FractionOverflow::Truncate
    );

    let registry = config.build_registry().unwrap();
    assert_eq!(registry.names(), vec!["archive", "legacy", "primary"]);
    assert_eq!(registry.active_name(), Some("legacy"));
    assert_eq!(registry.active_supports_negative_epoch(), Ok(false));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn duplicate_connector_names_are_rejected() {
    let config = EngineConfig::from_json_str(
        r#"{"connectors":[
            {"name":"pg","provider":"postgresql"},
            {"name":"pg","provider":"mysql"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::Registry(_))
    ));
}

#[test]
fn configured_parse_policy_reaches_the_write_path() {
    let config = EngineConfig::from_json_str(FULL_CONFIG).unwrap();
    let registry = config.build_registry().unwrap();
    let conn = open_db_in_memory().unwrap();

    let truncating = FieldService::new(
        SqliteColumnRepository::new(&conn),
        registry.get("primary").unwrap(),
    )
    .with_parse_options(config.parse_options());
    let (column, instant) = truncating
        .create_record("events", "occurred_at", "1969-01-01T10:33:59.828999Z")
        .unwrap();
    assert_eq!(instant.to_string(), "1969-01-01T10:33:59.828Z");
    assert_eq!(
        truncating.read_field_literal(&column).unwrap().as_deref(),
        Some("1969-01-01T10:33:59.828Z")
    );

    let strict = FieldService::new(
        SqliteColumnRepository::new(&conn),
        registry.get("primary").unwrap(),
    );
    let err = strict
        .create_record("events", "occurred_at", "1969-01-01T10:33:59.828999Z")
        .unwrap_err();
    assert!(matches!(
        err,
        FieldServiceError::Temporal(TemporalError::MalformedLiteral { .. })
    ));
}
