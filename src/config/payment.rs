//! Payment gateway configuration (VNPay)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// HMAC secret issued by the gateway (`vnp_HashSecret`)
    pub signing_key: SecretString,

    /// Merchant terminal code (`vnp_TmnCode`)
    pub merchant_code: String,

    /// Gateway payment page the customer is redirected to
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,

    /// Where the gateway sends the customer back (`vnp_ReturnUrl`)
    pub return_url: String,

    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Gateway UI language, `vn` or `en`
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Protocol version (`vnp_Version`)
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_order_type")]
    pub order_type: String,

    /// Minutes a pending payment stays payable
    #[serde(default = "default_expire_minutes")]
    pub expire_minutes: i64,

    /// Minutes past `vnp_ExpireDate` before the sweep gives up on a payment.
    /// The gateway can still deliver a result for a payment completed right
    /// at the deadline.
    #[serde(default = "default_expiry_grace_minutes")]
    pub expiry_grace_minutes: i64,
}

impl PaymentConfig {
    /// Check if pointed at the gateway sandbox
    pub fn is_sandbox(&self) -> bool {
        self.gateway_base_url.contains("sandbox")
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.signing_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__SIGNING_KEY"));
        }
        if self.merchant_code.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MERCHANT_CODE"));
        }
        if self.return_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RETURN_URL"));
        }

        for (name, url) in [
            ("PAYMENT__GATEWAY_BASE_URL", &self.gateway_base_url),
            ("PAYMENT__RETURN_URL", &self.return_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidPaymentUrl(name));
            }
            if *environment == Environment::Production && !url.starts_with("https://") {
                return Err(ValidationError::PaymentUrlMustBeHttps);
            }
        }

        if !matches!(self.locale.as_str(), "vn" | "en") {
            return Err(ValidationError::InvalidLocale);
        }
        if !(1..=1440).contains(&self.expire_minutes) {
            return Err(ValidationError::InvalidExpireWindow);
        }
        if !(0..=1440).contains(&self.expiry_grace_minutes) {
            return Err(ValidationError::InvalidExpiryGrace);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            signing_key: SecretString::new(String::new()),
            merchant_code: String::new(),
            gateway_base_url: default_gateway_base_url(),
            return_url: String::new(),
            currency_code: default_currency_code(),
            locale: default_locale(),
            version: default_version(),
            command: default_command(),
            order_type: default_order_type(),
            expire_minutes: default_expire_minutes(),
            expiry_grace_minutes: default_expiry_grace_minutes(),
        }
    }
}

fn default_gateway_base_url() -> String {
    "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string()
}

fn default_currency_code() -> String {
    "VND".to_string()
}

fn default_locale() -> String {
    "vn".to_string()
}

fn default_version() -> String {
    "2.1.0".to_string()
}

fn default_command() -> String {
    "pay".to_string()
}

fn default_order_type() -> String {
    "other".to_string()
}

fn default_expire_minutes() -> i64 {
    15
}

fn default_expiry_grace_minutes() -> i64 {
    15
}
