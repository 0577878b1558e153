use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    ("LOOKUP_API_URL", "https://lookup.example.test/api/"),
    ("GOOGLE_MAPS_API_KEY", "maps-key"),
    ("FIREBASE_API_KEY", "fb-key"),
];

#[test]
fn from_lookup_applies_defaults() {
    let cfg = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    assert_eq!(cfg.lookup_api_url, "https://lookup.example.test/api");
    assert_eq!(cfg.maps_api_key, "maps-key");
    assert_eq!(cfg.firebase_api_key, "fb-key");
    assert_eq!(cfg.google_client_id, None);
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn from_lookup_reads_optional_values() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("GOOGLE_OAUTH_CLIENT_ID", "client.apps.googleusercontent.com"));
    pairs.push(("PORT", "8080"));
    let cfg = AppConfig::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(cfg.google_client_id.as_deref(), Some("client.apps.googleusercontent.com"));
    assert_eq!(cfg.port, 8080);
}

#[test]
fn missing_required_value_names_variable() {
    let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != "FIREBASE_API_KEY").collect();
    assert_eq!(AppConfig::from_lookup(lookup(&pairs)), Err(ConfigError::Missing { var: "FIREBASE_API_KEY" }));
}

#[test]
fn blank_value_counts_as_missing() {
    let mut pairs = REQUIRED.to_vec();
    pairs[1] = ("GOOGLE_MAPS_API_KEY", "   ");
    assert_eq!(AppConfig::from_lookup(lookup(&pairs)), Err(ConfigError::Missing { var: "GOOGLE_MAPS_API_KEY" }));
}

#[test]
fn relative_lookup_url_is_invalid() {
    let mut pairs = REQUIRED.to_vec();
    pairs[0] = ("LOOKUP_API_URL", "/api");
    assert!(matches!(
        AppConfig::from_lookup(lookup(&pairs)),
        Err(ConfigError::Invalid { var: "LOOKUP_API_URL", .. })
    ));
}

#[test]
fn non_http_lookup_url_is_invalid() {
    let mut pairs = REQUIRED.to_vec();
    pairs[0] = ("LOOKUP_API_URL", "ftp://lookup.example.test");
    assert!(matches!(
        AppConfig::from_lookup(lookup(&pairs)),
        Err(ConfigError::Invalid { var: "LOOKUP_API_URL", .. })
    ));
}

#[test]
fn bad_port_is_invalid() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("PORT", "eighty"));
    assert!(matches!(AppConfig::from_lookup(lookup(&pairs)), Err(ConfigError::Invalid { var: "PORT", .. })));
}

#[test]
fn client_config_mirrors_browser_values() {
    let cfg = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    let client = cfg.client_config();
    assert_eq!(client.lookup_api_url, cfg.lookup_api_url);
    assert_eq!(client.maps_api_key, "maps-key");
    assert_eq!(client.firebase_api_key, "fb-key");
    assert_eq!(client.google_client_id, None);
}

#[test]
fn from_env_reads_process_environment() {
    // Only asserts on a variable no other test touches.
    unsafe {
        std::env::remove_var("LOOKUP_API_URL");
    }
    assert!(matches!(AppConfig::from_env(), Err(ConfigError::Missing { var: "LOOKUP_API_URL" })));
}
