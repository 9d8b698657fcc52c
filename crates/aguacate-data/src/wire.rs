//! Wire shapes of the storefront API.

use aguacate_commerce::backend::CouponRejection;
use aguacate_commerce::cart::{CouponCode, CouponTerms, DiscountKind, RawShippingQuote};
use aguacate_commerce::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/shipping/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuoteRequest {
    /// Cart subtotal as a plain number.
    pub subtotal: f64,
    /// Destination zone.
    pub location: String,
}

/// Envelope of `POST /api/shipping/calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingQuoteResponse {
    /// Whether the quote succeeded.
    #[serde(default)]
    pub success: bool,
    /// The quote payload. Untrusted; the engine sanitizes it.
    #[serde(default)]
    pub shipping: Option<RawShippingQuote>,
    /// Error message when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Envelope of `GET /api/coupons/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponValidateResponse {
    /// Whether the code is applicable.
    #[serde(default)]
    pub success: bool,
    /// The coupon payload on success.
    #[serde(default)]
    pub coupon: Option<WireCoupon>,
    /// Rejection message otherwise.
    #[serde(default)]
    pub error: Option<String>,
}

/// Coupon terms as the API returns them. The `discount_amount` the API
/// also sends is ignored; the engine derives it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCoupon {
    /// Coupon code.
    pub code: String,
    /// Display description.
    #[serde(default)]
    pub description: Option<String>,
    /// "percentage" or "fixed".
    pub discount_type: String,
    /// Percent value or fixed amount.
    pub discount_value: f64,
    /// Minimum subtotal.
    #[serde(default)]
    pub min_purchase: f64,
    /// Cap for percentage coupons.
    #[serde(default)]
    pub max_discount: Option<f64>,
    /// Whether the coupon waives shipping.
    #[serde(default)]
    pub free_shipping: bool,
}

impl WireCoupon {
    /// Convert to engine terms. A payload the engine cannot represent
    /// counts as a backend fault, not a customer-facing rejection.
    pub fn into_terms(self, currency: Currency) -> Result<CouponTerms, CouponRejection> {
        let code = CouponCode::parse(&self.code)
            .map_err(|_| CouponRejection::Backend(format!("unusable code: {:?}", self.code)))?;
        let discount_type = match self.discount_type.as_str() {
            "percentage" => DiscountKind::Percentage,
            "fixed" => DiscountKind::Fixed,
            other => {
                return Err(CouponRejection::Backend(format!(
                    "unknown discount type: {other:?}"
                )))
            }
        };
        Ok(CouponTerms {
            code,
            description: self.description,
            discount_type,
            discount_value: self.discount_value,
            min_purchase: Money::from_decimal(self.min_purchase, currency),
            max_discount: self.max_discount.map(|v| Money::from_decimal(v, currency)),
            free_shipping: self.free_shipping,
        })
    }
}

/// Map the API's rejection messages onto typed rejections; anything
/// unrecognized passes through verbatim.
pub(crate) fn rejection_from_message(message: &str) -> CouponRejection {
    match message {
        "Cupón no encontrado o inválido" => CouponRejection::NotFound,
        "Cupón expirado" => CouponRejection::Expired,
        "Cupón no válido aún" => CouponRejection::NotYetValid,
        "Este cupón ha alcanzado su límite de uso" => CouponRejection::UsageLimitReached,
        "Ya has usado este cupón anteriormente" => CouponRejection::AlreadyUsed,
        "" => CouponRejection::NotFound,
        other => CouponRejection::Rejected(other.to_string()),
    }
}
