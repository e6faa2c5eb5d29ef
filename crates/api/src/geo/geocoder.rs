//! Geocoding provider client.
//!
//! The provider answers an HTTP GET with a nested feature collection; the
//! first candidate (most relevant, as ranked by the provider) carries its
//! coordinates as a `"longitude latitude"` space-separated string.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use foodcart_core::Coordinate;

use super::GeocodingError;

/// Capability to resolve a free-text address to coordinates.
///
/// The production implementation is [`Geocoder`]; tests substitute fakes to
/// control results and count upstream calls.
pub trait Geocode: Send + Sync {
    /// Resolve `address` to a coordinate pair.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodingError>> + Send;
}

/// Connection settings for the geocoding provider.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Provider endpoint, e.g. `https://geocode-maps.example.com/1.x`.
    pub base_url: String,
    /// Provider API key, sent as the `apikey` query parameter.
    pub api_key: SecretString,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client for the geocoding provider.
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl Geocoder {
    /// Create a new geocoder client.
    #[must_use]
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Geocode for Geocoder {
    #[instrument(skip(self), fields(address = %address))]
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodingError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("address", address),
                ("apikey", self.config.api_key.expose_secret()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status.as_u16()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;
        let body: GeocodeResponse = match serde_json::from_str(&response_text) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse geocoder response"
                );
                return Err(GeocodingError::Parse(e));
            }
        };

        let candidates = body.response.collection.members;
        debug!(candidates = candidates.len(), "Geocoder returned candidates");

        let most_relevant = candidates
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NoResults(address.to_string()))?;

        parse_position(&most_relevant.object.point.pos)
    }
}

/// Parse a `"longitude latitude"` space-separated pair.
fn parse_position(pos: &str) -> Result<Coordinate, GeocodingError> {
    let malformed = || GeocodingError::MalformedPair(pos.to_string());

    let (lon, lat) = pos.trim().split_once(' ').ok_or_else(malformed)?;
    let longitude: f64 = lon.parse().map_err(|_| malformed())?;
    let latitude: f64 = lat.trim().parse().map_err(|_| malformed())?;

    Ok(Coordinate::new(latitude, longitude))
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: GeocodeInner,
}

#[derive(Debug, Deserialize)]
struct GeocodeInner {
    #[serde(rename = "GeoObjectCollection")]
    collection: FeatureCollection,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "featureMember")]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    pos: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "response": {
            "GeoObjectCollection": {
                "featureMember": [
                    {"GeoObject": {"Point": {"pos": "37.617698 55.755864"}}},
                    {"GeoObject": {"Point": {"pos": "30.315635 59.938951"}}}
                ]
            }
        }
    }"#;

    #[test]
    fn test_response_takes_first_candidate() {
        let body: GeocodeResponse = serde_json::from_str(SAMPLE).expect("deserialize");
        let first = body
            .response
            .collection
            .members
            .into_iter()
            .next()
            .expect("at least one candidate");
        let coord = parse_position(&first.object.point.pos).expect("parse");
        assert!((coord.longitude - 37.617698).abs() < f64::EPSILON);
        assert!((coord.latitude - 55.755864).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_collection_deserializes() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{"response": {"GeoObjectCollection": {"featureMember": []}}}"#,
        )
        .expect("deserialize");
        assert!(body.response.collection.members.is_empty());
    }

    #[test]
    fn test_parse_position_is_lon_lat() {
        let coord = parse_position("37.6156 55.7522").expect("parse");
        assert!((coord.latitude - 55.7522).abs() < f64::EPSILON);
        assert!((coord.longitude - 37.6156).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_position_rejects_junk() {
        assert!(matches!(
            parse_position("not-a-pair"),
            Err(GeocodingError::MalformedPair(_))
        ));
        assert!(matches!(
            parse_position("37.6156"),
            Err(GeocodingError::MalformedPair(_))
        ));
        assert!(matches!(
            parse_position("abc def"),
            Err(GeocodingError::MalformedPair(_))
        ));
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = GeocoderConfig {
            base_url: "https://geocode.example.com/1.x".to_string(),
            api_key: SecretString::from("super-secret-key"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-key"));
    }
}
