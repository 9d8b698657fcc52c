//! Port implementations over the storefront API.

use crate::wire::{
    rejection_from_message, CouponValidateResponse, ShippingQuoteRequest, ShippingQuoteResponse,
};
use crate::FetchClient;
use aguacate_commerce::backend::{CouponBackend, CouponRejection, ShippingBackend, ShippingError};
use aguacate_commerce::cart::{CouponCode, CouponTerms, RawShippingQuote};
use aguacate_commerce::money::{Currency, Money};
use async_trait::async_trait;

/// Coupon validation against `GET /api/coupons/validate`.
pub struct HttpCouponBackend {
    client: FetchClient,
    currency: Currency,
}

impl HttpCouponBackend {
    /// Create a backend; `currency` is what wire amounts are read as.
    pub fn new(client: FetchClient, currency: Currency) -> Self {
        Self { client, currency }
    }
}

#[async_trait]
impl CouponBackend for HttpCouponBackend {
    async fn validate(
        &self,
        code: &CouponCode,
        subtotal: Money,
        customer_email: Option<&str>,
    ) -> Result<CouponTerms, CouponRejection> {
        let response = self
            .client
            .get("/api/coupons/validate")
            .query("code", code.as_str())
            .query("cartTotal", &subtotal.to_decimal().to_string())
            .query("userEmail", customer_email.unwrap_or(""))
            .send()
            .await
            .map_err(|e| CouponRejection::Backend(e.to_string()))?;

        // Business rejections come back as 200/400 with a JSON envelope;
        // parse the body regardless of status.
        let envelope: CouponValidateResponse = response
            .json()
            .map_err(|e| CouponRejection::Backend(e.to_string()))?;

        if envelope.success {
            envelope
                .coupon
                .ok_or_else(|| CouponRejection::Backend("missing coupon payload".to_string()))?
                .into_terms(self.currency)
        } else {
            Err(rejection_from_message(envelope.error.as_deref().unwrap_or("")))
        }
    }
}

/// Shipping quotes from `POST /api/shipping/calculate`.
pub struct HttpShippingBackend {
    client: FetchClient,
}

impl HttpShippingBackend {
    /// Create a backend over the given client.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ShippingBackend for HttpShippingBackend {
    async fn quote(
        &self,
        subtotal: Money,
        location: &str,
    ) -> Result<RawShippingQuote, ShippingError> {
        let request = ShippingQuoteRequest {
            subtotal: subtotal.to_decimal(),
            location: location.to_string(),
        };

        let response = self
            .client
            .post("/api/shipping/calculate")
            .json(&request)
            .map_err(|e| ShippingError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ShippingError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ShippingError::Transport(e.to_string()))?;

        let envelope: ShippingQuoteResponse = response
            .json()
            .map_err(|e| ShippingError::Transport(e.to_string()))?;

        if envelope.success {
            envelope
                .shipping
                .ok_or_else(|| ShippingError::Rejected("invalid response structure".to_string()))
        } else {
            Err(ShippingError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "invalid response structure".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // On native targets the client sends nothing; both backends must
    // degrade to the error path the engine treats as a fallback signal.

    #[tokio::test]
    async fn test_native_shipping_quote_is_transport_error() {
        let backend = HttpShippingBackend::new(FetchClient::new());
        let result = backend.quote(Money::pesos(9000), "Bogotá").await;
        assert!(matches!(result, Err(ShippingError::Transport(_))));
    }

    #[tokio::test]
    async fn test_native_coupon_validate_is_backend_error() {
        let backend = HttpCouponBackend::new(FetchClient::new(), Currency::COP);
        let code = CouponCode::parse("PROMO10").unwrap();
        let result = backend.validate(&code, Money::pesos(9000), None).await;
        assert!(matches!(result, Err(CouponRejection::Backend(_))));
    }
}
