use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingInstrument {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Tokenized card reference produced by client-side tokenization. Never a PAN.
    pub payment_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentCommand {
    pub user_id: String,
    pub payment_amount: Decimal,
    pub currency: String,
    pub payment_instrument: BillingInstrument,
}

impl ProcessPaymentCommand {
    /// Shape checks applied at the transport edge, before the saga runs.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("userId is required".to_string());
        }
        if self.payment_amount <= Decimal::ZERO {
            return Err("paymentAmount must be > 0".to_string());
        }
        if self.payment_amount.scale() > 2 {
            return Err("paymentAmount must have at most 2 decimal places".to_string());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err("currency must be a 3-letter ISO 4217 code".to_string());
        }

        let pi = &self.payment_instrument;
        let required = [
            ("firstName", &pi.first_name),
            ("lastName", &pi.last_name),
            ("address1", &pi.address1),
            ("city", &pi.city),
            ("state", &pi.state),
            ("postalCode", &pi.postal_code),
            ("country", &pi.country),
            ("email", &pi.email),
            ("paymentToken", &pi.payment_token),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("paymentInstrument.{name} is required"));
        }
        if looks_like_card_number(&pi.payment_token) {
            return Err("paymentInstrument.paymentToken must be a token, not a card number".to_string());
        }
        Ok(())
    }
}

fn looks_like_card_number(token: &str) -> bool {
    let digits: String = token.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    (13..=19).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
