use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", base_url, 5, 0, 0)
        .expect("client construction should not fail")
}

#[test]
fn first_page_url_without_anchor() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client.text_search_request_url(&PageRequest::First {
        query: "pizza",
        anchor: None,
        radius_m: 50_000,
    });
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/maps/api/place/textsearch/json?query=pizza&key=test-key"
    );
}

#[test]
fn first_page_url_with_anchor_adds_location_and_radius() {
    let client = test_client("https://maps.example.com/maps/api/");
    let url = client.text_search_request_url(&PageRequest::First {
        query: "coffee",
        anchor: Some(Coordinate::new(40.758, -73.9855)),
        radius_m: 50_000,
    });
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/maps/api/place/textsearch/json?query=coffee&location=40.758%2C-73.9855&radius=50000&key=test-key"
    );
}

#[test]
fn continuation_url_carries_only_token_and_key() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client.text_search_request_url(&PageRequest::Continuation { token: "tok-2" });
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/maps/api/place/textsearch/json?pagetoken=tok-2&key=test-key"
    );
}

#[test]
fn query_is_percent_encoded() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client.text_search_request_url(&PageRequest::First {
        query: "fish & chips",
        anchor: None,
        radius_m: 50_000,
    });
    assert!(
        url.as_str().contains("query=fish+%26+chips"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn base_url_without_path_resolves_endpoints_at_root() {
    let client = test_client("http://127.0.0.1:8080");
    assert_eq!(
        client.geocode_url.as_str(),
        "http://127.0.0.1:8080/geocode/json"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("k", "not a url", 5, 0, 0);
    assert!(
        matches!(result, Err(SearchError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}
