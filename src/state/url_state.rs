//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the selected layer and day offset in the query string so
//! reloading restores the view and URLs can be shared.

use url::form_urlencoded;

/// Parsed URL parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParams {
    pub layer: Option<String>,
    pub day_offset: Option<i64>,
}

/// Parses a query string, with or without the leading `?`.
pub fn parse_query(search: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = search.trim_start_matches('?');
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "layer" if !value.is_empty() => params.layer = Some(value.into_owned()),
            "d" => params.day_offset = value.parse().ok(),
            _ => {}
        }
    }

    params
}

/// Builds the query string for the current view.
pub fn build_query(layer: &str, day_offset: i64) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("layer", layer)
        .append_pair("d", &day_offset.to_string())
        .finish();
    format!("?{}", query)
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let search = web_sys::window().and_then(|w| w.location().search().ok());
    search.map(|s| parse_query(&s)).unwrap_or_default()
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Replace the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(query: &str) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(query)) {
        log::warn!("Failed to update URL: {:?}", e);
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_query: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("?layer=Terra%20Aerosol&d=-12");
        assert_eq!(params.layer.as_deref(), Some("Terra Aerosol"));
        assert_eq!(params.day_offset, Some(-12));
    }

    #[test]
    fn test_parse_query_ignores_junk() {
        assert_eq!(parse_query(""), UrlParams::default());
        let params = parse_query("d=soon&layer=&site=KTLX");
        assert_eq!(params, UrlParams::default());
    }

    #[test]
    fn test_build_query_escapes_layer_name() {
        let query = build_query("Fires & Thermal (Day)", 0);
        assert_eq!(query, "?layer=Fires+%26+Thermal+%28Day%29&d=0");
        assert_eq!(
            parse_query(&query).layer.as_deref(),
            Some("Fires & Thermal (Day)")
        );
    }

    #[test]
    fn test_parse_query_keeps_malformed_escapes() {
        let params = parse_query("?layer=Cover%+5Bmax&d=0");
        assert_eq!(params.layer.as_deref(), Some("Cover% 5Bmax"));
        assert_eq!(params.day_offset, Some(0));

        assert_eq!(parse_query("?layer=100%").layer.as_deref(), Some("100%"));
    }
}
