//! Nominatim Geocoder
//!
//! Implements Geocoder against a Nominatim HTTP endpoint using reqwest.
//!
//! See: https://nominatim.org/release-docs/latest/api/Overview/

use super::nominatim_document::parse_document;
use crate::config::Config;
use crate::domain::entities::ParsedDocument;
use crate::domain::error::GeocodeError;
use crate::domain::ports::{Clock, GeocodeQuery, Geocoder};
use crate::domain::value_objects::GeocodeMethod;
use crate::infrastructure::BackoffWindow;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// User-Agent sent with every request (required by the Nominatim usage policy).
pub const USER_AGENT: &str = concat!("nominatim-locator/", env!("CARGO_PKG_VERSION"));

/// Nominatim-backed geocoder.
///
/// Every request is bounded by one timeout for both connect and total time.
/// Any transport failure opens the back-off window, during which queries
/// fail immediately with [`GeocodeError::RecentFailureBackoff`].
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    backoff: BackoffWindow,
}

impl NominatimClient {
    /// Create a client for `host`.
    ///
    /// `host` may be a bare host/path (`nominatim.openstreetmap.org`), in
    /// which case https is used, or a full base URL.
    pub fn new(host: &str, timeout: Duration, backoff: BackoffWindow) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(host),
            backoff,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(cfg: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let backoff = BackoffWindow::new(Duration::from_secs(cfg.timeout_window_secs), clock);
        Self::new(&cfg.host, Duration::from_secs(cfg.timeout_secs), backoff)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn backoff(&self) -> &BackoffWindow {
        &self.backoff
    }

    /// Endpoint URL of a service method.
    pub fn endpoint(&self, method: GeocodeMethod) -> String {
        format!("{}/{}", self.base_url, method.as_str())
    }

    /// Perform the HTTP call and return the raw body.
    async fn fetch(&self, query: &GeocodeQuery) -> Result<String, GeocodeError> {
        let url = self.endpoint(query.method);

        let response = self
            .client
            .get(&url)
            .query(&query.params)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| self.transport_failure(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(&url, e))?;

        if body.trim().is_empty() {
            return Err(GeocodeError::EmptyResponse);
        }

        Ok(body)
    }

    fn transport_failure(&self, url: &str, e: reqwest::Error) -> GeocodeError {
        tracing::error!("nominatim request to {} failed: {}", url, e);
        self.backoff.record_failure();

        if e.is_timeout() {
            GeocodeError::TransportTimeout(e.to_string())
        } else {
            GeocodeError::TransportError(e.to_string())
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn query(&self, query: &GeocodeQuery) -> Result<ParsedDocument, GeocodeError> {
        if let Some(remaining) = self.backoff.remaining() {
            return Err(GeocodeError::RecentFailureBackoff { remaining });
        }

        let body = self.fetch(query).await?;
        let document = parse_document(&body)?;

        if let Some(error) = document.error {
            return Err(GeocodeError::ServiceReported(error));
        }

        Ok(document)
    }
}

fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(uri: &str, timeout: Duration) -> (NominatimClient, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let backoff = BackoffWindow::new(Duration::from_secs(60), clock.clone());
        (NominatimClient::new(uri, timeout, backoff).unwrap(), clock)
    }

    // ===== URL Tests =====

    #[test]
    fn test_base_url_bare_host_uses_https() {
        assert_eq!(
            base_url("nominatim.openstreetmap.org"),
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(
            base_url("open.mapquestapi.com/nominatim/v1/"),
            "https://open.mapquestapi.com/nominatim/v1"
        );
    }

    #[test]
    fn test_base_url_keeps_scheme() {
        assert_eq!(base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_endpoint() {
        let (client, _) = client_for("nominatim.example.org", Duration::from_secs(2));
        assert_eq!(
            client.endpoint(GeocodeMethod::Search),
            "https://nominatim.example.org/search"
        );
        assert_eq!(
            client.endpoint(GeocodeMethod::Reverse),
            "https://nominatim.example.org/reverse"
        );
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("nominatim-locator/"));
    }

    // ===== Success Paths =====

    #[tokio::test]
    async fn test_search_sends_parameters_and_parses() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Montreal"))
            .and(query_param("limit", "1"))
            .and(query_param("accept-language", "fr"))
            .and(query_param("format", "json"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"osm_id": 240109189, "lat": "45.5031824", "lon": "-73.5698065", "display_name": "Montréal"}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let doc = client
            .query(&GeocodeQuery::search("Montreal", "fr"))
            .await
            .unwrap();

        let place = doc.place.unwrap();
        assert_eq!(place.osm_id, "240109189");
        assert_eq!(place.display_name.as_deref(), Some("Montréal"));
    }

    #[tokio::test]
    async fn test_zero_results_is_ok_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let doc = client
            .query(&GeocodeQuery::search("Nowhere", "en"))
            .await
            .unwrap();

        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_reverse_by_id_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("osm_type", "N"))
            .and(query_param("osm_id", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"osm_id": 42, "lat": "1.0", "lon": "2.0", "address": {"city": "Montreal"}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let doc = client
            .query(&GeocodeQuery::reverse_by_id("42"))
            .await
            .unwrap();

        assert_eq!(doc.place.unwrap().address.city.as_deref(), Some("Montreal"));
    }

    // ===== Failure Paths =====

    #[tokio::test]
    async fn test_http_status_error_does_not_back_off() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let query = GeocodeQuery::search("x", "en");

        assert_eq!(
            client.query(&query).await.unwrap_err(),
            GeocodeError::HttpStatus(503)
        );
        assert!(client.backoff().allow_request());
        assert_eq!(
            client.query(&query).await.unwrap_err(),
            GeocodeError::HttpStatus(503)
        );
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let err = client
            .query(&GeocodeQuery::search("x", "en"))
            .await
            .unwrap_err();

        assert_eq!(err, GeocodeError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<searchresults/>"))
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let err = client
            .query(&GeocodeQuery::search("x", "en"))
            .await
            .unwrap_err();

        assert!(matches!(err, GeocodeError::MalformedResponse(_)));
        assert!(client.backoff().allow_request());
    }

    #[tokio::test]
    async fn test_service_reported_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#),
            )
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_secs(2));
        let err = client
            .query(&GeocodeQuery::reverse_by_id("1"))
            .await
            .unwrap_err();

        assert_eq!(err, GeocodeError::ServiceReported("Unable to geocode".into()));
    }

    #[tokio::test]
    async fn test_timeout_opens_backoff_window() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server.uri(), Duration::from_millis(100));
        let query = GeocodeQuery::search("slow", "en");

        let err = client.query(&query).await.unwrap_err();
        assert!(matches!(err, GeocodeError::TransportTimeout(_)));

        // second call never reaches the server (expect(1) above)
        let err = client.query(&query).await.unwrap_err();
        assert!(matches!(err, GeocodeError::RecentFailureBackoff { .. }));
    }

    #[tokio::test]
    async fn test_backoff_expires() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, clock) = client_for(&mock_server.uri(), Duration::from_secs(2));
        client.backoff().record_failure();

        let query = GeocodeQuery::search("x", "en");
        assert!(matches!(
            client.query(&query).await.unwrap_err(),
            GeocodeError::RecentFailureBackoff { .. }
        ));

        clock.advance(Duration::from_secs(60));
        assert!(client.query(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // nothing listens on port 1
        let (client, _) = client_for("http://127.0.0.1:1", Duration::from_secs(2));
        let err = client
            .query(&GeocodeQuery::search("x", "en"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(!client.backoff().allow_request());
    }
}
