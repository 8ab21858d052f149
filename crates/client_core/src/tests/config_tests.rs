use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("tasks_client_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("tasks.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config("api_url = \"https://tasks.example.com/api\"\nrequest_timeout_secs = 3\n");
    let mut settings = Settings::default();

    apply_file(&mut settings, &path).expect("apply file");

    assert_eq!(settings.api_url, "https://tasks.example.com/api");
    assert_eq!(settings.request_timeout_secs, 3);
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let missing = env::temp_dir().join("tasks_client_config_test_missing/tasks.toml");
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("TASKS_API_URL", "http://plain.example.com"),
        ("APP__API_URL", "http://prefixed.example.com"),
        ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]);
    let mut settings = Settings::default();

    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.api_url, "http://prefixed.example.com");
    assert_eq!(settings.request_timeout_secs, 10);
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let config = ClientConfig::from_settings(&Settings {
        api_url: "http://127.0.0.1:8000/api/".to_string(),
        request_timeout_secs: 5,
    })
    .expect("config");

    assert_eq!(config.endpoint(["tasks"]).as_str(), "http://127.0.0.1:8000/api/tasks");
    assert_eq!(
        config.endpoint(["tasks", "7"]).as_str(),
        "http://127.0.0.1:8000/api/tasks/7"
    );
    assert_eq!(config.request_timeout, Duration::from_secs(5));
}

#[test]
fn rejects_non_http_urls_and_zero_timeout() {
    let bad_scheme = Settings {
        api_url: "ftp://tasks.example.com".to_string(),
        ..Settings::default()
    };
    assert!(ClientConfig::from_settings(&bad_scheme).is_err());

    let not_a_url = Settings {
        api_url: "tasks".to_string(),
        ..Settings::default()
    };
    assert!(ClientConfig::from_settings(&not_a_url).is_err());

    let zero_timeout = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert!(ClientConfig::from_settings(&zero_timeout).is_err());
}

#[test]
fn endpoint_encodes_reserved_characters_inside_a_segment() {
    let config = ClientConfig::from_settings(&Settings {
        api_url: "http://127.0.0.1:8000/api".to_string(),
        request_timeout_secs: 5,
    })
    .expect("config");

    assert_eq!(
        config.endpoint(["tasks", "5/../9"]).as_str(),
        "http://127.0.0.1:8000/api/tasks/5%2F..%2F9"
    );
    assert_eq!(
        config.endpoint(["tasks", "7?x=1#top"]).as_str(),
        "http://127.0.0.1:8000/api/tasks/7%3Fx=1%23top"
    );
}
