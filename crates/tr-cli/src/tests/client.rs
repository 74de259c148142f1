use crate::HttpClient;

use std::time::Duration;

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(base_url, "qa@example.com", "secret", Duration::from_secs(5)).unwrap()
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = client("https://example.testrail.io/");
    assert_eq!(client.base_url, "https://example.testrail.io");
}

#[test]
fn test_base_url_no_trailing_slash() {
    let client = client("https://example.testrail.io");
    assert_eq!(client.base_url, "https://example.testrail.io");
}

#[test]
fn test_user_stored() {
    let client = client("https://example.testrail.io");
    assert_eq!(client.user, "qa@example.com");
}

#[test]
fn test_endpoint_url_uses_api_v2_query_path() {
    let client = client("https://example.testrail.io/");
    assert_eq!(
        client.url("get_cases/3&suite_id=7"),
        "https://example.testrail.io/index.php?/api/v2/get_cases/3&suite_id=7"
    );
}
