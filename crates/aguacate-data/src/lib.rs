//! HTTP client and storefront API backends for Tus Aguacates.
//!
//! Provides a small fetch client (Spin outbound HTTP on wasm32, an inert
//! stub natively) and the implementations of the commerce ports that
//! talk to the storefront's coupon-validation and shipping-quote
//! endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use aguacate_data::{FetchClient, HttpCouponBackend, HttpShippingBackend};
//! use aguacate_commerce::money::Currency;
//!
//! let client = FetchClient::new().with_base_url("https://tusaguacates.co");
//! let coupons = HttpCouponBackend::new(client.clone(), Currency::COP);
//! let shipping = HttpShippingBackend::new(client);
//! ```

mod backends;
mod error;
mod request;
mod response;
mod wire;

pub use backends::{HttpCouponBackend, HttpShippingBackend};
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use wire::{CouponValidateResponse, ShippingQuoteRequest, ShippingQuoteResponse, WireCoupon};

/// HTTP client for the storefront API.
///
/// A lightweight wrapper over Spin's outbound HTTP with a builder API.
/// On native targets requests are not sent; the backends surface that
/// as a transport error and the engine falls back to local defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchClient {
    base_url: Option<String>,
}

impl FetchClient {
    /// Create a new client for same-origin requests.
    pub fn new() -> Self {
        Self { base_url: None }
    }

    /// Prepend a base URL to relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };
        ClientRequestBuilder {
            builder: RequestBuilder::new(method, full_url),
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug, Clone)]
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a percent-encoded query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set a JSON body.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Send the request.
    #[cfg(target_arch = "wasm32")]
    pub async fn send(self) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request};

        let method = match self.builder.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
        };

        let mut request = Request::builder();
        request.method(method);
        request.uri(&self.builder.url);
        for (key, value) in &self.builder.headers {
            request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = self.builder.body {
            request.body(body);
        }
        let request = request.build();

        let response: spin_sdk::http::Response = spin_sdk::http::send(request)
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let body = response.into_body();
        Ok(Response::new(status, body))
    }

    /// Send the request (native stub: nothing goes on the wire).
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn send(self) -> Result<Response, FetchError> {
        Err(FetchError::RequestError(
            "outbound HTTP is only available on the wasm32 target".to_string(),
        ))
    }

    /// The resolved URL, visible for tests.
    pub fn url(&self) -> &str {
        &self.builder.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_applies_to_relative_paths() {
        let client = FetchClient::new().with_base_url("https://tusaguacates.co/");
        let req = client.get("/api/shipping/calculate");
        assert_eq!(req.url(), "https://tusaguacates.co/api/shipping/calculate");
    }

    #[test]
    fn test_base_url_skips_absolute_urls() {
        let client = FetchClient::new().with_base_url("https://tusaguacates.co");
        let req = client.get("https://other.example/api");
        assert_eq!(req.url(), "https://other.example/api");
    }

    #[tokio::test]
    async fn test_native_send_reports_transport_error() {
        let client = FetchClient::new();
        let result = client.get("/api/coupons/validate").send().await;
        assert!(matches!(result, Err(FetchError::RequestError(_))));
    }
}
