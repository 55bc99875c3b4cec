use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::proto::User;

/// This object contains basic information about an invoice.
/// https://core.telegram.org/bots/api#invoice
#[derive(Debug, Deserialize, Serialize)]
pub struct Invoice {
    pub title: CompactString,
    pub description: CompactString,
    pub start_parameter: CompactString,
    pub currency: CompactString,
    pub total_amount: i64,
}

/// This object contains basic information about a successful payment.
/// https://core.telegram.org/bots/api#successfulpayment
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct SuccessfulPayment {
    pub currency: CompactString,
    pub total_amount: i64,
    pub invoice_payload: CompactString,
    pub shipping_option_id: Option<CompactString>,
    pub order_info: Option<OrderInfo>,
    pub telegram_payment_charge_id: CompactString,
    pub provider_payment_charge_id: CompactString,
}

/// This object contains information about an incoming shipping query.
/// https://core.telegram.org/bots/api#shippingquery
#[derive(Debug, Deserialize, Serialize)]
pub struct ShippingQuery {
    pub id: CompactString,
    pub from: User,
    pub invoice_payload: CompactString,
    pub shipping_address: ShippingAddress,
}

/// This object represents a shipping address.
/// https://core.telegram.org/bots/api#shippingaddress
#[derive(Debug, Deserialize, Serialize)]
pub struct ShippingAddress {
    pub country_code: CompactString,
    pub state: CompactString,
    pub city: CompactString,
    pub street_line1: CompactString,
    pub street_line2: CompactString,
    pub post_code: CompactString,
}

/// This object contains information about an incoming pre-checkout query.
/// https://core.telegram.org/bots/api#precheckoutquery
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct PreCheckoutQuery {
    pub id: CompactString,
    pub from: User,
    pub currency: CompactString,
    pub total_amount: i64,
    pub invoice_payload: CompactString,
    pub shipping_option_id: Option<CompactString>,
    pub order_info: Option<OrderInfo>,
}

/// This object represents information about an order.
/// https://core.telegram.org/bots/api#orderinfo
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OrderInfo {
    pub name: Option<CompactString>,
    pub phone_number: Option<CompactString>,
    pub email: Option<CompactString>,
    pub shipping_address: Option<ShippingAddress>,
}

/// This object represents a portion of the price for goods or services.
/// `amount` is in the smallest units of the currency.
/// https://core.telegram.org/bots/api#labeledprice
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LabeledPrice {
    pub label: CompactString,
    pub amount: i64,
}

impl LabeledPrice {
    pub fn new(label: &str, amount: i64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// This object represents one shipping option.
/// https://core.telegram.org/bots/api#shippingoption
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ShippingOption {
    pub id: CompactString,
    pub title: CompactString,
    pub prices: Vec<LabeledPrice>,
}

impl ShippingOption {
    pub fn total(&self) -> i64 {
        self.prices.iter().map(|price| price.amount).sum()
    }
}
