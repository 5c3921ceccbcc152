//! Tests for the HTTP fetcher against a local mock server

use ersync_core::{ArchiveIdentifier, Error, HttpFetcher, ResourceFetcher, SyncConfig};
use pretty_assertions::assert_eq;

fn fetcher_for(server: &mockito::Server) -> HttpFetcher {
    let config = SyncConfig {
        api_base_url: format!("{}/", server.url()),
        cdn_base_url: format!("{}/cdn/", server.url()),
        api_key: "test-key".to_string(),
        ..SyncConfig::default()
    };
    HttpFetcher::new(&config).unwrap()
}

#[test]
fn test_latest_version_reads_manifest() {
    let mut server = mockito::Server::new();
    let manifest = server
        .mock("GET", "/cdn/gameDb/gamedata-steam.txt")
        .with_status(200)
        .with_body("gamedata-20240102000000.zip\n")
        .create();

    let version = fetcher_for(&server).latest_game_data_version().unwrap();

    assert_eq!(version, "gamedata-20240102000000.zip");
    manifest.assert();
}

#[test]
fn test_game_data_url_is_relative_to_cdn() {
    let server = mockito::Server::new();
    let id = ArchiveIdentifier::game_data("gameDb/gamedata-20240102000000.zip").unwrap();

    let url = fetcher_for(&server).game_data_url(&id).unwrap();

    assert_eq!(
        url,
        format!("{}/cdn/gameDb/gamedata-20240102000000.zip", server.url())
    );
}

#[test]
fn test_download_returns_bytes() {
    let mut server = mockito::Server::new();
    let _archive = server
        .mock("GET", "/cdn/gameDb/gamedata-20240102000000.zip")
        .with_status(200)
        .with_body(vec![0x50, 0x4b, 0x05, 0x06])
        .create();

    let bytes = fetcher_for(&server)
        .download(&format!(
            "{}/cdn/gameDb/gamedata-20240102000000.zip",
            server.url()
        ))
        .unwrap();

    assert_eq!(bytes, vec![0x50, 0x4b, 0x05, 0x06]);
}

#[test]
fn test_download_non_2xx_is_fatal() {
    let mut server = mockito::Server::new();
    let _missing = server
        .mock("GET", "/cdn/gameDb/gamedata-20240102000000.zip")
        .with_status(403)
        .create();

    let result = fetcher_for(&server).download(&format!(
        "{}/cdn/gameDb/gamedata-20240102000000.zip",
        server.url()
    ));

    assert!(matches!(result, Err(Error::HttpStatus { status: 403, .. })));
}

#[test]
fn test_api_requests_carry_key_and_accept_json() {
    let mut server = mockito::Server::new();
    let l10n = server
        .mock("GET", "/v1/l10n/Korean")
        .match_header("x-api-key", "test-key")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"code":200,"message":"Success","data":{"l10Path":"https://cdn.test/l10n/l10n-Korean-20240101120000.txt"}}"#,
        )
        .create();

    let envelope = fetcher_for(&server).localization("Korean").unwrap();

    l10n.assert();
    assert!(envelope.is_success());
    assert_eq!(
        envelope.payload.data.unwrap().l10n_path,
        "https://cdn.test/l10n/l10n-Korean-20240101120000.txt"
    );
}

#[test]
fn test_api_error_status_is_not_an_error() {
    let mut server = mockito::Server::new();
    let _unauthorized = server
        .mock("GET", "/v1/freeCharacters/2")
        .with_status(403)
        .with_body(r#"{"message":"Forbidden"}"#)
        .create();

    let envelope = fetcher_for(&server).free_characters("2").unwrap();

    assert!(!envelope.is_success());
    assert_eq!(envelope.status, 403);
    assert_eq!(envelope.code, 403);
}

#[test]
fn test_free_characters_payload() {
    let mut server = mockito::Server::new();
    let _rotation = server
        .mock("GET", "/v1/freeCharacters/3")
        .with_status(200)
        .with_body(r#"{"code":200,"message":"Success","freeCharacters":[4,18,33]}"#)
        .create();

    let envelope = fetcher_for(&server).free_characters("3").unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.payload.characters().map(Vec::len), Some(3));
}
