//! Nominatim Response Parsing
//!
//! Turns a Nominatim `format=json` body into a typed [`ParsedDocument`].
//! All knowledge of the service's response layout lives here.
//!
//! - `search` answers with an array of places (`[]` for no results)
//! - `reverse` answers with one place object, or `{"error": ...}`

use crate::domain::entities::{AddressParts, ParsedDocument, Place};
use crate::domain::error::GeocodeError;
use serde::Deserialize;
use serde_json::Value;

/// Ids and coordinates come back as strings, but some deployments emit
/// bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    osm_id: Scalar,
    lat: Scalar,
    lon: Scalar,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, alias = "addressparts")]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl From<NominatimPlace> for Place {
    fn from(raw: NominatimPlace) -> Self {
        let address = raw.address.unwrap_or_default();
        Place {
            osm_id: raw.osm_id.into_string(),
            lat: raw.lat.into_string(),
            lon: raw.lon.into_string(),
            display_name: raw.display_name,
            address: AddressParts {
                town: address.town,
                city: address.city,
                state: address.state,
                country: address.country,
            },
        }
    }
}

/// Parse a response body.
///
/// Only the first element of a result list is kept. An embedded error is
/// returned inside the document; turning it into a failure is the
/// caller's decision.
pub fn parse_document(body: &str) -> Result<ParsedDocument, GeocodeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GeocodeError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => Ok(ParsedDocument::with_place(parse_place(first)?)),
            None => Ok(ParsedDocument::empty()),
        },
        Value::Object(map) if map.is_empty() => Ok(ParsedDocument::empty()),
        Value::Object(map) => {
            if let Some(error) = map.get("error") {
                return Ok(ParsedDocument {
                    place: None,
                    error: Some(error_message(error)),
                });
            }
            Ok(ParsedDocument::with_place(parse_place(Value::Object(map))?))
        }
        other => Err(GeocodeError::MalformedResponse(format!(
            "expected a place object or a list of places, got {}",
            kind(&other)
        ))),
    }
}

fn parse_place(value: Value) -> Result<Place, GeocodeError> {
    serde_json::from_value::<NominatimPlace>(value)
        .map(Place::from)
        .map_err(|e| GeocodeError::MalformedResponse(format!("invalid place: {}", e)))
}

/// Older servers send `"error": "text"`, newer ones `"error": {"code", "message"}`.
fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"[
        {
            "place_id": 297554447,
            "licence": "Data © OpenStreetMap contributors, ODbL 1.0.",
            "osm_type": "node",
            "osm_id": 240109189,
            "lat": "45.5031824",
            "lon": "-73.5698065",
            "display_name": "Montréal, Agglomération de Montréal, Québec, Canada",
            "class": "place",
            "type": "city"
        },
        {
            "osm_id": 1,
            "lat": "0",
            "lon": "0",
            "display_name": "second"
        }
    ]"#;

    const REVERSE_BODY: &str = r#"{
        "place_id": 1,
        "osm_type": "node",
        "osm_id": "240109189",
        "lat": "45.5031824",
        "lon": "-73.5698065",
        "display_name": "Le Plateau-Mont-Royal, Montréal, Québec, Canada",
        "address": {
            "town": "Plateau",
            "city": "Montreal",
            "state": "Quebec",
            "country": "Canada",
            "country_code": "ca"
        }
    }"#;

    // ===== Search Responses =====

    #[test]
    fn test_search_takes_first_place() {
        let doc = parse_document(SEARCH_BODY).unwrap();
        let place = doc.place.unwrap();

        assert_eq!(place.osm_id, "240109189");
        assert_eq!(place.lat, "45.5031824");
        assert_eq!(place.lon, "-73.5698065");
        assert_eq!(
            place.display_name.as_deref(),
            Some("Montréal, Agglomération de Montréal, Québec, Canada")
        );
        assert_eq!(place.address, AddressParts::default());
        assert!(doc.error.is_none());
    }

    #[test]
    fn test_search_empty_list_is_empty_document() {
        let doc = parse_document("[]").unwrap();
        assert!(doc.is_empty());
    }

    // ===== Reverse Responses =====

    #[test]
    fn test_reverse_with_address() {
        let doc = parse_document(REVERSE_BODY).unwrap();
        let place = doc.place.unwrap();

        assert_eq!(place.osm_id, "240109189");
        assert_eq!(
            place.address.display_name(),
            "Plateau, Montreal, Quebec, Canada"
        );
    }

    #[test]
    fn test_reverse_addressparts_alias() {
        let body = r#"{"osm_id": 5, "lat": "1.50", "lon": "2", "addressparts": {"city": "Montreal", "country": "Canada"}}"#;
        let place = parse_document(body).unwrap().place.unwrap();
        assert_eq!(place.address.display_name(), "Montreal, Canada");
        assert_eq!(place.lat, "1.50");
    }

    #[test]
    fn test_numeric_coordinates_accepted() {
        let body = r#"{"osm_id": 5, "lat": 45.5, "lon": -73}"#;
        let place = parse_document(body).unwrap().place.unwrap();
        assert_eq!(place.lat, "45.5");
        assert_eq!(place.lon, "-73");
        assert_eq!(place.osm_id, "5");
    }

    #[test]
    fn test_empty_object_is_empty_document() {
        assert!(parse_document("{}").unwrap().is_empty());
    }

    // ===== Error Element =====

    #[test]
    fn test_error_string() {
        let doc = parse_document(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert_eq!(doc.error.as_deref(), Some("Unable to geocode"));
        assert!(doc.place.is_none());
    }

    #[test]
    fn test_error_object() {
        let doc =
            parse_document(r#"{"error": {"code": 400, "message": "Invalid OSM ID"}}"#).unwrap();
        assert_eq!(doc.error.as_deref(), Some("Invalid OSM ID"));
    }

    #[test]
    fn test_error_object_without_message() {
        let doc = parse_document(r#"{"error": {"code": 400}}"#).unwrap();
        assert_eq!(doc.error.as_deref(), Some(r#"{"code":400}"#));
    }

    // ===== Malformed Responses =====

    #[test]
    fn test_not_json() {
        let err = parse_document("<html>oops</html>").unwrap_err();
        assert!(matches!(err, GeocodeError::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_top_level_type() {
        let err = parse_document("42").unwrap_err();
        assert_eq!(
            err,
            GeocodeError::MalformedResponse(
                "expected a place object or a list of places, got a number".into()
            )
        );
    }

    #[test]
    fn test_place_missing_coordinates() {
        let err = parse_document(r#"[{"osm_id": 1}]"#).unwrap_err();
        assert!(matches!(err, GeocodeError::MalformedResponse(msg) if msg.contains("invalid place")));
    }
}
