//! VNPay wire field names and value formats.

use chrono::Duration;

use crate::domain::foundation::Timestamp;

pub const VERSION: &str = "vnp_Version";
pub const COMMAND: &str = "vnp_Command";
pub const TMN_CODE: &str = "vnp_TmnCode";
pub const AMOUNT: &str = "vnp_Amount";
pub const CURR_CODE: &str = "vnp_CurrCode";
pub const TXN_REF: &str = "vnp_TxnRef";
pub const ORDER_INFO: &str = "vnp_OrderInfo";
pub const ORDER_TYPE: &str = "vnp_OrderType";
pub const LOCALE: &str = "vnp_Locale";
pub const RETURN_URL: &str = "vnp_ReturnUrl";
pub const IP_ADDR: &str = "vnp_IpAddr";
pub const CREATE_DATE: &str = "vnp_CreateDate";
pub const EXPIRE_DATE: &str = "vnp_ExpireDate";
pub const BANK_CODE: &str = "vnp_BankCode";

pub const RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const TRANSACTION_STATUS: &str = "vnp_TransactionStatus";
pub const TRANSACTION_NO: &str = "vnp_TransactionNo";

/// Carries the signature; never signed itself.
pub const SECURE_HASH: &str = "vnp_SecureHash";
/// Hash algorithm marker some callbacks include; never signed.
pub const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";

/// `vnp_Amount` is the VND amount times 100.
pub const AMOUNT_MULTIPLIER: i64 = 100;

/// Gateway clock offset from UTC, in hours (Asia/Ho_Chi_Minh, no DST).
const GATEWAY_UTC_OFFSET_HOURS: i64 = 7;

/// Formats a timestamp as `yyyyMMddHHmmss` in gateway local time.
pub fn format_gateway_time(ts: &Timestamp) -> String {
    let local = ts.as_datetime().naive_utc() + Duration::hours(GATEWAY_UTC_OFFSET_HOURS);
    local.format("%Y%m%d%H%M%S").to_string()
}

/// Encodes a VND amount for `vnp_Amount`. `None` on overflow.
pub fn encode_amount(amount: i64) -> Option<String> {
    amount.checked_mul(AMOUNT_MULTIPLIER).map(|v| v.to_string())
}

/// Decodes `vnp_Amount` back into VND.
///
/// Rejects non-numeric input and values that are not whole VND.
pub fn decode_amount(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let minor: i64 = raw.parse().ok()?;
    if minor % AMOUNT_MULTIPLIER != 0 {
        return None;
    }
    Some(minor / AMOUNT_MULTIPLIER)
}
