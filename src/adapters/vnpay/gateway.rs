//! VNPay gateway adapter.
//!
//! Implements the `PaymentGateway` port: fills VNPay's wire fields, signs
//! them with HMAC-SHA512, and verifies signed callbacks (return URL and IPN
//! share the same format).
//!
//! # Security
//!
//! - `vnp_SecureHash` and `vnp_SecureHashType` are stripped before the
//!   canonical string is rebuilt
//! - Signatures are compared in constant time
//! - The signing key lives in a `SecretString` and is never logged
//!
//! # Configuration
//!
//! ```ignore
//! let gateway = VnPayGateway::new(VnPayConfig::from_settings(&config.payment)?);
//! let redirect = gateway.create_payment_url(&request)?;
//! ```

use crate::config::PaymentConfig;
use crate::domain::payment::{
    GatewayResponseCode, ParameterSet, PaymentError, PaymentSigner, SigningError, SigningKey,
};
use crate::ports::{GatewayCallback, PaymentGateway, PaymentRedirect, PaymentUrlRequest};

use super::fields;
use super::query::parse_query;

/// Merchant-level settings for one VNPay terminal.
#[derive(Debug, Clone)]
pub struct VnPayConfig {
    pub signing_key: SigningKey,
    pub merchant_code: String,
    pub base_url: String,
    pub return_url: String,
    pub currency_code: String,
    pub locale: String,
    pub version: String,
    pub command: String,
    pub order_type: String,
}

impl VnPayConfig {
    /// Builds gateway settings from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `SigningError::MissingKey` if the signing key is blank.
    pub fn from_settings(settings: &PaymentConfig) -> Result<Self, SigningError> {
        Ok(Self {
            signing_key: SigningKey::from_secret(&settings.signing_key)?,
            merchant_code: settings.merchant_code.clone(),
            base_url: settings.gateway_base_url.clone(),
            return_url: settings.return_url.clone(),
            currency_code: settings.currency_code.clone(),
            locale: settings.locale.clone(),
            version: settings.version.clone(),
            command: settings.command.clone(),
            order_type: settings.order_type.clone(),
        })
    }
}

/// VNPay implementation of [`PaymentGateway`].
#[derive(Debug, Clone)]
pub struct VnPayGateway {
    config: VnPayConfig,
    signer: PaymentSigner,
}

impl VnPayGateway {
    pub fn new(config: VnPayConfig) -> Self {
        let signer = PaymentSigner::new(config.signing_key.clone(), fields::SECURE_HASH)
            .with_excluded_field(fields::SECURE_HASH_TYPE);
        Self { config, signer }
    }

    /// Wire parameters for one payment, before signing.
    fn payment_params(&self, request: &PaymentUrlRequest) -> Result<ParameterSet, PaymentError> {
        if request.amount <= 0 {
            return Err(PaymentError::validation("amount", "must be positive"));
        }
        let amount = fields::encode_amount(request.amount)
            .ok_or_else(|| PaymentError::validation("amount", "too large"))?;

        let mut params = ParameterSet::new();
        params.add(fields::VERSION, &self.config.version);
        params.add(fields::COMMAND, &self.config.command);
        params.add(fields::TMN_CODE, &self.config.merchant_code);
        params.add(fields::AMOUNT, amount);
        params.add(fields::CURR_CODE, &self.config.currency_code);
        params.add(fields::TXN_REF, request.payment_id.txn_ref());
        params.add(fields::ORDER_INFO, &request.order_info);
        params.add(fields::ORDER_TYPE, &self.config.order_type);
        params.add(fields::LOCALE, &self.config.locale);
        params.add(fields::RETURN_URL, &self.config.return_url);
        params.add(fields::IP_ADDR, &request.client_ip);
        params.add(
            fields::CREATE_DATE,
            fields::format_gateway_time(&request.created_at),
        );
        params.add(
            fields::EXPIRE_DATE,
            fields::format_gateway_time(&request.expires_at),
        );
        params.add_optional(fields::BANK_CODE, request.bank_code.as_deref());
        Ok(params)
    }
}

fn required<'a>(params: &'a ParameterSet, name: &str) -> Result<&'a str, PaymentError> {
    match params.get(name) {
        "" => Err(PaymentError::validation(name, "missing from callback")),
        value => Ok(value),
    }
}

fn optional(params: &ParameterSet, name: &str) -> Option<String> {
    match params.get(name) {
        "" => None,
        value => Some(value.to_string()),
    }
}

impl PaymentGateway for VnPayGateway {
    fn create_payment_url(
        &self,
        request: &PaymentUrlRequest,
    ) -> Result<PaymentRedirect, PaymentError> {
        let params = self.payment_params(request)?;
        let signed = self.signer.sign(&self.config.base_url, &params);

        tracing::debug!(
            payment_id = %request.payment_id,
            field_count = params.len(),
            "Signed VNPay payment request"
        );

        Ok(PaymentRedirect { url: signed.url })
    }

    fn verify_callback(&self, raw_query: &str) -> Result<GatewayCallback, PaymentError> {
        let params = parse_query(raw_query)?;

        let received = params.get(fields::SECURE_HASH);
        if received.is_empty() {
            tracing::warn!("VNPay callback without vnp_SecureHash");
            return Err(PaymentError::invalid_signature());
        }
        if !self.signer.verify(&params, received) {
            tracing::warn!(
                txn_ref = %params.get(fields::TXN_REF),
                "VNPay callback signature mismatch"
            );
            return Err(PaymentError::invalid_signature());
        }

        let txn_ref = required(&params, fields::TXN_REF)?.to_string();
        let amount = fields::decode_amount(required(&params, fields::AMOUNT)?)
            .ok_or_else(|| PaymentError::validation(fields::AMOUNT, "not a whole VND amount"))?;
        let response_code = GatewayResponseCode::new(required(&params, fields::RESPONSE_CODE)?);

        Ok(GatewayCallback {
            txn_ref,
            amount,
            response_code,
            transaction_status: optional(&params, fields::TRANSACTION_STATUS),
            gateway_transaction_no: optional(&params, fields::TRANSACTION_NO),
            bank_code: optional(&params, fields::BANK_CODE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PaymentId, Timestamp};
    use crate::domain::payment::{sign, PaymentStatus};
    use chrono::{TimeZone, Utc};

    const KEY: &str = "secret123";

    fn test_config() -> VnPayConfig {
        VnPayConfig {
            signing_key: SigningKey::new(KEY).unwrap(),
            merchant_code: "TEST01".to_string(),
            base_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
            return_url: "https://codelab.example/payments/return".to_string(),
            currency_code: "VND".to_string(),
            locale: "vn".to_string(),
            version: "2.1.0".to_string(),
            command: "pay".to_string(),
            order_type: "other".to_string(),
        }
    }

    fn url_request(amount: i64) -> PaymentUrlRequest {
        let created = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap());
        PaymentUrlRequest {
            payment_id: PaymentId::new(),
            amount,
            order_info: "Thanh toan khoa hoc #42".to_string(),
            client_ip: "203.0.113.7".to_string(),
            created_at: created,
            expires_at: created.plus_minutes(15),
            bank_code: None,
        }
    }

    /// Query string signed the way the gateway signs callbacks.
    fn signed_callback(params: &ParameterSet) -> String {
        let signed = sign("", params, &SigningKey::new(KEY).unwrap(), fields::SECURE_HASH);
        signed.url.trim_start_matches('?').to_string()
    }

    fn callback_params(txn_ref: &str, amount: &str, code: &str) -> ParameterSet {
        let mut params = ParameterSet::new();
        params.add(fields::TMN_CODE, "TEST01");
        params.add(fields::TXN_REF, txn_ref);
        params.add(fields::AMOUNT, amount);
        params.add(fields::RESPONSE_CODE, code);
        params.add(fields::TRANSACTION_STATUS, code);
        params.add(fields::TRANSACTION_NO, "14123456");
        params.add(fields::BANK_CODE, "NCB");
        params.add(fields::ORDER_INFO, "Thanh toan khoa hoc #42");
        params
    }

    #[test]
    fn payment_url_carries_wire_fields() {
        let gateway = VnPayGateway::new(test_config());
        let request = url_request(100_000);
        let redirect = gateway.create_payment_url(&request).unwrap();

        assert!(redirect
            .url
            .starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?vnp_Amount=10000000&"));
        assert!(redirect.url.contains("vnp_Command=pay"));
        assert!(redirect.url.contains("vnp_CreateDate=20240301090000"));
        assert!(redirect.url.contains("vnp_ExpireDate=20240301091500"));
        assert!(redirect
            .url
            .contains(&format!("vnp_TxnRef={}", request.payment_id.txn_ref())));
        assert!(redirect
            .url
            .contains("vnp_OrderInfo=Thanh%20toan%20khoa%20hoc%20%2342"));
        assert!(!redirect.url.contains("vnp_BankCode"));
    }

    #[test]
    fn payment_url_signature_is_last_and_128_hex_chars() {
        let gateway = VnPayGateway::new(test_config());
        let redirect = gateway.create_payment_url(&url_request(100_000)).unwrap();

        let (_, signature) = redirect.url.rsplit_once("&vnp_SecureHash=").unwrap();
        assert_eq!(signature.len(), 128);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn payment_url_includes_bank_code_when_chosen() {
        let gateway = VnPayGateway::new(test_config());
        let request = PaymentUrlRequest {
            bank_code: Some("NCB".to_string()),
            ..url_request(100_000)
        };
        let redirect = gateway.create_payment_url(&request).unwrap();
        assert!(redirect.url.contains("vnp_BankCode=NCB"));
    }

    #[test]
    fn payment_url_rejects_non_positive_amount() {
        let gateway = VnPayGateway::new(test_config());
        assert!(gateway.create_payment_url(&url_request(0)).is_err());
        assert!(gateway.create_payment_url(&url_request(-5)).is_err());
    }

    #[test]
    fn own_payment_url_verifies_as_callback() {
        let gateway = VnPayGateway::new(test_config());
        let request = url_request(100_000);
        let redirect = gateway.create_payment_url(&request).unwrap();
        let (_, query) = redirect.url.split_once('?').unwrap();

        // A payment URL has no response code, so it fails field extraction,
        // but only after the signature has been accepted.
        let err = gateway.verify_callback(query).unwrap_err();
        assert_eq!(
            err,
            PaymentError::validation(fields::RESPONSE_CODE, "missing from callback")
        );
    }

    #[test]
    fn verify_callback_extracts_fields() {
        let gateway = VnPayGateway::new(test_config());
        let query = signed_callback(&callback_params("abc123", "10000000", "00"));

        let callback = gateway.verify_callback(&query).unwrap();
        assert_eq!(callback.txn_ref, "abc123");
        assert_eq!(callback.amount, 100_000);
        assert!(callback.response_code.is_success());
        assert_eq!(callback.gateway_transaction_no.as_deref(), Some("14123456"));
        assert_eq!(callback.bank_code.as_deref(), Some("NCB"));
        assert_eq!(callback.settled_status(), PaymentStatus::Success);
    }

    #[test]
    fn verify_callback_accepts_hash_type_and_uppercase_hash() {
        let gateway = VnPayGateway::new(test_config());
        let query = signed_callback(&callback_params("abc123", "10000000", "24"));
        let (head, hash) = query.rsplit_once('=').unwrap();
        let query = format!("{}={}&vnp_SecureHashType=HmacSHA512", head, hash.to_uppercase());

        let callback = gateway.verify_callback(&query).unwrap();
        assert_eq!(callback.settled_status(), PaymentStatus::Cancelled);
    }

    #[test]
    fn verify_callback_accepts_plus_encoded_spaces() {
        let gateway = VnPayGateway::new(test_config());
        let query = signed_callback(&callback_params("abc123", "10000000", "00"))
            .replace("%20", "+");
        assert!(query.contains("Thanh+toan"));
        assert!(gateway.verify_callback(&query).is_ok());
    }

    #[test]
    fn verify_callback_rejects_tampered_amount() {
        let gateway = VnPayGateway::new(test_config());
        let query = signed_callback(&callback_params("abc123", "10000000", "00"))
            .replace("vnp_Amount=10000000", "vnp_Amount=100");

        assert_eq!(
            gateway.verify_callback(&query).unwrap_err(),
            PaymentError::invalid_signature()
        );
    }

    #[test]
    fn verify_callback_rejects_missing_hash() {
        let gateway = VnPayGateway::new(test_config());
        assert_eq!(
            gateway
                .verify_callback("vnp_TxnRef=abc&vnp_Amount=100")
                .unwrap_err(),
            PaymentError::invalid_signature()
        );
    }

    #[test]
    fn verify_callback_rejects_other_key() {
        let mut config = test_config();
        config.signing_key = SigningKey::new("another-secret").unwrap();
        let gateway = VnPayGateway::new(config);
        let query = signed_callback(&callback_params("abc123", "10000000", "00"));

        assert!(gateway.verify_callback(&query).is_err());
    }

    #[test]
    fn verify_callback_rejects_fractional_amount() {
        let gateway = VnPayGateway::new(test_config());
        let query = signed_callback(&callback_params("abc123", "10000050", "00"));

        let err = gateway.verify_callback(&query).unwrap_err();
        assert!(matches!(err, PaymentError::ValidationFailed { .. }));
    }

    #[test]
    fn from_settings_rejects_blank_key() {
        let settings = PaymentConfig::default();
        assert_eq!(
            VnPayConfig::from_settings(&settings).unwrap_err(),
            SigningError::MissingKey
        );
    }
}
