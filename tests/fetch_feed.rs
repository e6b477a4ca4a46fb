//! Integration tests for downloading Atom documents over HTTP.
//!
//! Each test serves a document from its own wiremock server.

use atomfeed::atom::{download_atom_feed, AtomError};
use atomfeed::config::Config;
use atomfeed::feed::{Feed, Item, Link};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn served_feed() -> Feed {
    let mut feed = Feed {
        title: "Served".to_string(),
        link: Link::new("https://example.com/", "alternate"),
        ..Default::default()
    };
    feed.add(Item {
        id: "urn:example:1".to_string(),
        title: "One".to_string(),
        description: "<em>first</em>".to_string(),
        link: Link::new("https://example.com/1", "alternate"),
        ..Default::default()
    });
    feed
}

#[tokio::test]
async fn test_fetch_generated_feed() {
    let xml = served_feed().to_atom().unwrap();

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/atom.xml"))
        .and(header("Accept", "application/atom+xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(xml)
                .insert_header("Content-Type", "application/atom+xml"),
        )
        .mount(&mock_server)
        .await;

    let client = Config::default().http_client().unwrap();
    let feed = download_atom_feed(&client, &format!("{}/atom.xml", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(feed.title, "Served");
    assert_eq!(feed.id, "https://example.com/");
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(feed.entries[0].id, "urn:example:1");
    assert_eq!(feed.entries[0].link("alternate"), Some("https://example.com/1"));
    assert_eq!(
        feed.entries[0].content.as_ref().map(|c| c.content.as_str()),
        Some("<em>first</em>")
    );
}

#[tokio::test]
async fn test_fetch_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let result = download_atom_feed(&client, &format!("{}/atom.xml", mock_server.uri())).await;

    match result {
        Err(AtomError::Transport(e)) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_html_body_is_malformed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Not a feed</body></html>")
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let result = download_atom_feed(&client, &format!("{}/atom.xml", mock_server.uri())).await;

    assert!(matches!(result, Err(AtomError::MalformedDocument(_))));
}

#[tokio::test]
async fn test_fetch_invalid_url_is_transport_error() {
    let client = reqwest::Client::new();
    let result = download_atom_feed(&client, "not a url").await;

    assert!(matches!(result, Err(AtomError::Transport(_))));
}
