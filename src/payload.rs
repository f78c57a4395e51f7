//! PromptPay payload encoding (EMVCo merchant-presented QR).
//!
//! Every field is `ID(2) LEN(2) VALUE`; the payload ends with a CRC16 field
//! computed over everything before it, including the CRC field's own header.
use crate::util::{format_fixed, sanitize_id};

const ID_PAYLOAD_FORMAT: &str = "00";
const ID_POI_METHOD: &str = "01";
const ID_MERCHANT_INFORMATION_BOT: &str = "29";
const ID_TRANSACTION_CURRENCY: &str = "53";
const ID_TRANSACTION_AMOUNT: &str = "54";
const ID_COUNTRY_CODE: &str = "58";
const ID_CRC: &str = "63";

const PAYLOAD_FORMAT_EMV_QRCPS_MERCHANT_PRESENTED_MODE: &str = "01";
const POI_METHOD_STATIC: &str = "11";
const POI_METHOD_DYNAMIC: &str = "12";
const MERCHANT_INFORMATION_TEMPLATE_ID_GUID: &str = "00";
const GUID_PROMPTPAY: &str = "A000000677010111";
const TRANSACTION_CURRENCY_THB: &str = "764";
const COUNTRY_CODE_TH: &str = "TH";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PayloadError {
    #[error("PromptPay ID is empty")]
    EmptyTarget,
    #[error("field {id} value is too long ({len} bytes)")]
    FieldTooLong { id: &'static str, len: usize },
    #[error("amount {0} cannot be encoded")]
    InvalidAmount(f64),
}

/// Turns an identifier and amount into an opaque QR payload string.
pub trait PayloadEncoder {
    fn encode(&self, id: &str, amount: f64) -> Result<String, PayloadError>;
}

/// How the target identifier is tagged inside the merchant template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    PhoneNumber,
    TaxId,
    EWalletId,
}

impl TargetKind {
    pub fn classify(digits: &str) -> Self {
        match digits.len() {
            len if len >= 15 => TargetKind::EWalletId,
            len if len >= 13 => TargetKind::TaxId,
            _ => TargetKind::PhoneNumber,
        }
    }

    fn field_id(self) -> &'static str {
        match self {
            TargetKind::PhoneNumber => "01",
            TargetKind::TaxId => "02",
            TargetKind::EWalletId => "03",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PromptPayEncoder;

impl PayloadEncoder for PromptPayEncoder {
    fn encode(&self, id: &str, amount: f64) -> Result<String, PayloadError> {
        let target = sanitize_id(id);
        if target.is_empty() {
            return Err(PayloadError::EmptyTarget);
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(PayloadError::InvalidAmount(amount));
        }
        let kind = TargetKind::classify(&target);
        let has_amount = amount > 0.0;

        let merchant = [
            field(MERCHANT_INFORMATION_TEMPLATE_ID_GUID, GUID_PROMPTPAY)?,
            field(kind.field_id(), &format_target(&target))?,
        ]
        .concat();

        let mut data = vec![
            field(
                ID_PAYLOAD_FORMAT,
                PAYLOAD_FORMAT_EMV_QRCPS_MERCHANT_PRESENTED_MODE,
            )?,
            field(
                ID_POI_METHOD,
                if has_amount {
                    POI_METHOD_DYNAMIC
                } else {
                    POI_METHOD_STATIC
                },
            )?,
            field(ID_MERCHANT_INFORMATION_BOT, &merchant)?,
            field(ID_COUNTRY_CODE, COUNTRY_CODE_TH)?,
            field(ID_TRANSACTION_CURRENCY, TRANSACTION_CURRENCY_THB)?,
        ];
        if has_amount {
            data.push(field(ID_TRANSACTION_AMOUNT, &format_fixed(amount))?);
        }

        let mut payload = data.concat();
        payload.push_str(ID_CRC);
        payload.push_str("04");
        let crc = crc16_ccitt(payload.as_bytes());
        payload.push_str(&format!("{crc:04X}"));
        Ok(payload)
    }
}

/// Phone numbers become `0066XXXXXXXXX`; longer ids pass through.
pub fn format_target(digits: &str) -> String {
    if digits.len() >= 13 {
        return digits.to_string();
    }
    let international = match digits.strip_prefix('0') {
        Some(rest) => format!("66{rest}"),
        None => digits.to_string(),
    };
    format!("{international:0>13}")
}

fn field(id: &'static str, value: &str) -> Result<String, PayloadError> {
    if value.len() > 99 {
        return Err(PayloadError::FieldTooLong {
            id,
            len: value.len(),
        });
    }
    Ok(format!("{id}{:02}{value}", value.len()))
}

/// CRC-16/CCITT-FALSE: polynomial 0x1021, initial value 0xFFFF.
pub fn crc16_ccitt(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
