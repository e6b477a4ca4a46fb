use reqwest::header::ACCEPT;

use super::codec::parse_atom_bytes;
use super::document::AtomFeed;
use super::error::AtomError;

const ATOM_MEDIA_TYPE: &str = "application/atom+xml";

/// Downloads and parses an Atom document.
///
/// Issues a single GET with `Accept: application/atom+xml`. There is no retry
/// or caching, and timeouts are whatever `client` was built with.
///
/// # Errors
///
/// - [`AtomError::Transport`] for connection failures and non-2xx responses
/// - [`AtomError::MalformedDocument`] when the body is not a well-formed Atom feed
pub async fn download_atom_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<AtomFeed, AtomError> {
    tracing::debug!(url = %url, "Fetching Atom feed");

    let response = client
        .get(url)
        .header(ACCEPT, ATOM_MEDIA_TYPE)
        .send()
        .await?
        .error_for_status()?;

    let bytes = response.bytes().await?;
    tracing::debug!(url = %url, bytes = bytes.len(), "Received Atom feed body");

    parse_atom_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_ATOM: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Test</title>
    <id>https://example.com/</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <entry><title>One</title><updated>2024-01-01T00:00:00Z</updated><id>1</id></entry>
</feed>"#;

    #[tokio::test]
    async fn test_fetch_success_sends_accept_header() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(header("Accept", "application/atom+xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_ATOM)
                    .insert_header("Content-Type", "application/atom+xml"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let feed = download_atom_feed(&client, &format!("{}/feed", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(feed.title, "Test");
        assert_eq!(feed.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_404_is_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = download_atom_feed(&client, &format!("{}/feed", mock_server.uri())).await;

        match result {
            Err(AtomError::Transport(e)) => {
                assert_eq!(e.status().map(|s| s.as_u16()), Some(404));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<feed><title>x</feed>"))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = download_atom_feed(&client, &format!("{}/feed", mock_server.uri())).await;

        assert!(matches!(result, Err(AtomError::MalformedDocument(_))));
    }

    #[tokio::test]
    async fn test_fetch_unavailable_server() {
        // A dropped server either refuses the connection or answers 404 with no mocks
        let uri = {
            let mock_server = MockServer::start().await;
            mock_server.uri()
        };

        let client = reqwest::Client::new();
        let result = download_atom_feed(&client, &format!("{}/feed", uri)).await;

        assert!(matches!(result, Err(AtomError::Transport(_))));
    }
}
