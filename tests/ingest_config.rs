// tests/ingest_config.rs
use euromillions::ingest::config::{
    IngestConfig, DEFAULT_FETCH_TIMEOUT_SECS, ENV_CONFIG_PATH, ENV_FETCH_TIMEOUT_SECS,
    ENV_POLITENESS_DELAY_MS,
};
use std::time::Duration;
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_FETCH_TIMEOUT_SECS);
    env::remove_var(ENV_POLITENESS_DELAY_MS);
}

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("ingest.toml");
    fs::write(
        &p_toml,
        r#"
fetch_timeout_secs = 30
referer = ""
user_agents = [" UA-1 ", ""]
"#,
    )
    .unwrap();
    let t = IngestConfig::load_from(&p_toml).unwrap();
    assert_eq!(t.fetch_timeout_secs, 30);
    assert_eq!(t.politeness_delay_ms, 1_000);
    assert!(t.referer.is_empty());
    assert_eq!(t.user_agents, vec!["UA-1".to_string()]);

    let p_json = dir.path().join("ingest.json");
    fs::write(&p_json, r#"{"politeness_delay_ms": 0}"#).unwrap();
    let j = IngestConfig::load_from(&p_json).unwrap();
    assert_eq!(j.politeness_delay(), Duration::ZERO);
    assert_eq!(j.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the test never reads a real config/ directory.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing anywhere: built-in defaults
    assert_eq!(IngestConfig::load_default().unwrap(), IngestConfig::default());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("ingest.toml"), "politeness_delay_ms = 250").unwrap();
    assert_eq!(IngestConfig::load_default().unwrap().politeness_delay_ms, 250);

    // 3) Explicit path wins over ./config/
    let p_env = tmp.path().join("custom.json");
    fs::write(&p_env, r#"{"politeness_delay_ms": 5}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(IngestConfig::load_default().unwrap().politeness_delay_ms, 5);

    // 4) Scalar overrides win over any file
    env::set_var(ENV_POLITENESS_DELAY_MS, "0");
    env::set_var(ENV_FETCH_TIMEOUT_SECS, "15");
    let cfg = IngestConfig::load_default().unwrap();
    assert_eq!(cfg.politeness_delay_ms, 0);
    assert_eq!(cfg.fetch_timeout_secs, 15);

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn bad_env_values_are_errors() {
    clear_env();

    env::set_var(ENV_CONFIG_PATH, "/definitely/not/here.toml");
    assert!(IngestConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_var(ENV_FETCH_TIMEOUT_SECS, "soon");
    let err = IngestConfig::load_default().unwrap_err();
    assert!(format!("{err:#}").contains(ENV_FETCH_TIMEOUT_SECS));

    clear_env();
}
