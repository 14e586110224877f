// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests composing several providers, sections and binding.

mod common;

use common::temp_file;
use layercfg::prelude::*;

#[test]
fn test_sections_are_live_views() {
    let root = ConfigBuilder::new()
        .with_in_memory([("App:Name", "demo"), ("App:Db:Url", "postgres://a")])
        .build()
        .unwrap();

    let app = root.section("app");
    let db = app.section("DB");
    assert_eq!(db.path(), "app:DB");
    assert_eq!(db.key(), "DB");
    assert_eq!(db.get("url").as_deref(), Some("postgres://a"));

    root.set("App:Db:Url", Some("postgres://b")).unwrap();
    assert_eq!(db.get("url").as_deref(), Some("postgres://b"));

    db.set("Pool", Some("4")).unwrap();
    assert_eq!(root.get("app:db:pool").as_deref(), Some("4"));
}

#[test]
fn test_section_value_and_existence() {
    let root = ConfigBuilder::new()
        .with_in_memory([("Mode", "fast"), ("Nested:Leaf", "1")])
        .build()
        .unwrap();

    assert_eq!(root.section("mode").value().as_deref(), Some("fast"));
    assert!(root.section("nested").value().is_none());
    assert!(root.section("nested").exists());
    assert!(!root.section("missing").exists());

    assert!(root.required_section("nested").is_ok());
    assert!(matches!(
        root.required_section("missing"),
        Err(ConfigError::ConfigKeyNotFound { .. })
    ));
}

#[test]
fn test_entries_and_debug_view() {
    let root = ConfigBuilder::new()
        .with_in_memory([("Logging:Level", "info"), ("Port", "80")])
        .with_in_memory([("Port", "8080")])
        .build()
        .unwrap();

    assert_eq!(
        root.entries(),
        vec![
            ("Logging:Level".to_string(), "info".to_string()),
            ("Port".to_string(), "8080".to_string()),
        ]
    );

    let view = root.debug_view();
    assert!(view.contains("Logging:\n"));
    assert!(view.contains("  Level=info (memory)\n"));
    assert!(view.contains("Port=8080 (memory)\n"));

    let section_entries = root.section("logging").entries(true);
    assert_eq!(section_entries, vec![("Level".to_string(), "info".to_string())]);
}

#[test]
#[cfg(feature = "json")]
fn test_debug_entries_serialize() {
    let root = ConfigBuilder::new()
        .with_in_memory([("a:b", "1")])
        .build()
        .unwrap();

    let json = serde_json::to_string(&root.debug_entries()).unwrap();
    assert!(json.contains("\"path\":\"a:b\""));
    assert!(json.contains("\"provider\":\"memory\""));
}

#[test]
#[cfg(all(feature = "yaml", feature = "env", feature = "cli"))]
fn test_layered_application_config() {
    #[derive(Debug, Default)]
    struct Database {
        url: String,
        pool_size: u32,
        timeout: std::time::Duration,
    }

    bind_object!(Database {
        "Url" => url,
        "PoolSize" => pool_size,
        "Timeout" => timeout,
    });

    let yaml = temp_file(
        "database:\n  url: postgres://localhost/app\n  poolSize: 5\n  timeout: 2s\n",
        ".yaml",
    );
    std::env::set_var("LAYERCFG_IT_DATABASE__POOLSIZE", "10");

    let root = ConfigBuilder::new()
        .with_yaml_file(yaml.path())
        .with_env_prefix("LAYERCFG_IT_")
        .with_cli_args(["--database:timeout", "30s"])
        .build()
        .unwrap();
    std::env::remove_var("LAYERCFG_IT_DATABASE__POOLSIZE");

    let db: Database = root.section("database").get_as().unwrap().unwrap();
    assert_eq!(db.url, "postgres://localhost/app");
    assert_eq!(db.pool_size, 10);
    assert_eq!(db.timeout, std::time::Duration::from_secs(30));
}

#[test]
#[cfg(feature = "cli")]
fn test_cli_switch_mappings() {
    let root = ConfigBuilder::new()
        .add(
            CommandLineSource::new(["-p", "9000", "--verbose=true"])
                .with_switch_mappings([("-p", "Server:Port"), ("--verbose", "Logging:Verbose")]),
        )
        .build()
        .unwrap();

    assert_eq!(root.get("server:port").as_deref(), Some("9000"));
    assert_eq!(root.get("logging:verbose").as_deref(), Some("true"));
}

#[test]
#[cfg(feature = "cli")]
fn test_cli_duplicate_key_is_an_error() {
    let result = ConfigBuilder::new()
        .with_cli_args(["--key=1", "--KEY=2"])
        .build();
    assert!(matches!(result, Err(ConfigError::DuplicateKey { .. })));
}

#[test]
#[cfg(feature = "cli")]
fn test_cli_from_clap_matches() {
    use clap::{Arg, Command};

    let matches = Command::new("app")
        .arg(Arg::new("level").long("level"))
        .arg(Arg::new("unused").long("unused"))
        .get_matches_from(["app", "--level", "debug"]);

    let root = ConfigBuilder::new()
        .with_in_memory([("Logging:Level", "info")])
        .add(CommandLineSource::from_arg_matches(
            &matches,
            [("level", "Logging:Level"), ("unused", "Other")],
        ))
        .build()
        .unwrap();

    assert_eq!(root.get("logging:level").as_deref(), Some("debug"));
    assert_eq!(root.get("other"), None);
}

#[test]
#[cfg(feature = "json")]
fn test_relative_json_file_uses_base_path() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{"Feature": {"Enabled": true}}"#)
        .unwrap();

    let root = ConfigBuilder::new()
        .set_base_path(dir.path())
        .with_json_file("settings.json")
        .build()
        .unwrap();

    assert!(root.get_value_or("feature:enabled", false).unwrap());
}

#[test]
fn test_duplicate_in_memory_keys_fail_build() {
    let result = ConfigBuilder::new()
        .with_in_memory([("Key", "1"), ("key", "2")])
        .build();
    assert!(matches!(result, Err(ConfigError::DuplicateKey { .. })));
}
