//! Minimal HTTP helpers for the catalog fetch and the export POST.
//!
//! wasm builds go through the browser `fetch` API; native builds use a
//! blocking reqwest client and must be called off the UI thread.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a text resource, relative URLs resolving against the page.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(url: &str) -> Result<String, String> {
    use wasm_bindgen::JsCast as _;
    use web_sys::{Request, RequestInit, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let window = web_sys::window().ok_or("No window")?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "Response is not a Response")?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("{:?}", e))?;

    text.as_string()
        .ok_or_else(|| "Response body is not text".to_string())
}

/// POSTs a JSON body and returns the response status.
#[cfg(target_arch = "wasm32")]
pub async fn post_json(url: &str, body: &str) -> Result<u16, String> {
    use wasm_bindgen::{JsCast as _, JsValue};
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    let headers = Headers::new().map_err(|e| format!("{:?}", e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{:?}", e))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let window = web_sys::window().ok_or("No window")?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "Response is not a Response")?;

    Ok(resp.status())
}

#[cfg(not(target_arch = "wasm32"))]
fn client() -> Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Fetches a text resource. Paths without a scheme are read from disk,
/// relative to the working directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_text(url: &str) -> Result<String, String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return std::fs::read_to_string(url).map_err(|e| format!("{}: {}", url, e));
    }

    let resp = client()?
        .get(url)
        .send()
        .map_err(|e| format!("Fetch failed: {}", e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    resp.text().map_err(|e| format!("Failed to read body: {}", e))
}

/// POSTs a JSON body and returns the response status.
#[cfg(not(target_arch = "wasm32"))]
pub fn post_json(url: &str, body: &str) -> Result<u16, String> {
    let resp = client()?
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .send()
        .map_err(|e| format!("Request failed: {}", e))?;

    Ok(resp.status().as_u16())
}

/// Any 2xx status counts as success.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
