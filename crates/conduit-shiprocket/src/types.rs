// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shiprocket credentials and request inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API user credentials (not the dashboard login).
#[derive(Clone, Deserialize)]
pub struct ShiprocketCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for ShiprocketCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShiprocketCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
}

/// Address fields that must be non-empty.
pub(crate) const ADDRESS_REQUIRED: &[&str] = &[
    "customer_name",
    "address",
    "city",
    "pincode",
    "state",
    "country",
    "phone",
];

impl Address {
    /// Writes the address as Shiprocket's flat `<prefix>_*` fields.
    pub(crate) fn write_flat(&self, prefix: &str, out: &mut Map<String, Value>) {
        out.insert(
            format!("{prefix}_customer_name"),
            self.customer_name.clone().into(),
        );
        out.insert(
            format!("{prefix}_last_name"),
            self.last_name.clone().unwrap_or_default().into(),
        );
        out.insert(format!("{prefix}_address"), self.address.clone().into());
        out.insert(
            format!("{prefix}_address_2"),
            self.address_2.clone().unwrap_or_default().into(),
        );
        out.insert(format!("{prefix}_city"), self.city.clone().into());
        out.insert(format!("{prefix}_pincode"), self.pincode.clone().into());
        out.insert(format!("{prefix}_state"), self.state.clone().into());
        out.insert(format!("{prefix}_country"), self.country.clone().into());
        out.insert(
            format!("{prefix}_email"),
            self.email.clone().unwrap_or_default().into(),
        );
        out.insert(format!("{prefix}_phone"), self.phone.clone().into());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub sku: String,
    pub units: u32,
    pub selling_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,
}

/// `Prepaid` or `COD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Prepaid,
    #[serde(rename = "COD")]
    Cod,
}

/// An adhoc order. Shipping falls back to the billing address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrder {
    pub order_id: String,
    /// `YYYY-MM-DD HH:MM`.
    pub order_date: String,
    /// Nickname of a configured pickup location.
    pub pickup_location: String,
    pub billing: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Address>,
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub sub_total: f64,
    /// Package dimensions in cm and weight in kg.
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_charges: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateAwb {
    pub shipment_id: u64,
    /// Lets Shiprocket pick the courier when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Serviceability {
    pub pickup_postcode: String,
    pub delivery_postcode: String,
    /// Kilograms.
    pub weight: f64,
    #[serde(default)]
    pub cod: bool,
}
