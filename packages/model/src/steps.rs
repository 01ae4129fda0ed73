//! Typed payloads for the registration steps and their client-side checks.
//!
//! Each payload serializes to the JSON body of its step endpoint and is merged
//! into [`crate::RegistrationSession`] after a successful submission. Keys are
//! unique across steps so the additive-merge rule never trips on a legitimate
//! flow.

use serde::{Deserialize, Serialize};

use crate::placement::Leg;
use crate::validation::FieldErrors;

/// Payout details are bank-based only for this country; everyone else is
/// paid out in USDT.
pub const BANK_PAYOUT_COUNTRY: &str = "Nigeria";

/// Step 1: package and position in the binary tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementStep {
    pub package_id: Option<u64>,
    pub sponsor_id: Option<u64>,
    pub sponsor_username: String,
    pub placement_id: Option<u64>,
    pub placement_username: String,
    pub leg: Option<Leg>,
}

impl PlacementStep {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required_opt("package_id", &self.package_id, "Package");
        errors.required_opt("sponsor_id", &self.sponsor_id, "Sponsor");
        errors.required_opt("placement_id", &self.placement_id, "Placement");
        errors.required_opt("leg", &self.leg, "Leg");
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSelection {
    pub product_id: u64,
    pub quantity: u32,
}

/// Step 2: products bundled with the registration package.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductsStep {
    pub products: Vec<ProductSelection>,
}

impl ProductsStep {
    /// Set the quantity for a product; zero removes it.
    pub fn set_quantity(&mut self, product_id: u64, quantity: u32) {
        self.products.retain(|p| p.product_id != product_id);
        if quantity > 0 {
            self.products.push(ProductSelection {
                product_id,
                quantity,
            });
            self.products.sort_by_key(|p| p.product_id);
        }
    }

    pub fn quantity_of(&self, product_id: u64) -> u32 {
        self.products
            .iter()
            .find(|p| p.product_id == product_id)
            .map(|p| p.quantity)
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.products.iter().all(|p| p.quantity == 0) {
            errors.add("products", "Select at least one product");
        }
        errors.into_result()
    }
}

/// Step 3: personal details and credentials.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountStep {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
    pub country_id: Option<u64>,
    pub country: String,
    pub state_id: Option<u64>,
    pub city_id: Option<u64>,
}

impl AccountStep {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("first_name", &self.first_name, "First name");
        errors.required("last_name", &self.last_name, "Last name");
        errors.required("username", &self.username, "Username");
        errors.min_len("username", self.username.trim(), 4, "Username");
        if !self
            .username
            .trim()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.add("username", "Username may only contain letters, digits and _");
        }
        errors.email("email", &self.email);
        errors.required("phone", &self.phone, "Phone number");
        errors.min_len("password", &self.password, 8, "Password");
        if self.password != self.password_confirmation {
            errors.add("password_confirmation", "Passwords do not match");
        }
        errors.required_opt("country_id", &self.country_id, "Country");
        errors.required_opt("state_id", &self.state_id, "State");
        errors.required_opt("city_id", &self.city_id, "City");
        errors.into_result()
    }

    pub fn pays_out_to_bank(&self) -> bool {
        pays_out_to_bank(&self.country)
    }
}

pub fn pays_out_to_bank(country: &str) -> bool {
    country.trim().eq_ignore_ascii_case(BANK_PAYOUT_COUNTRY)
}

/// Step 4: where commissions are paid, plus terms acceptance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutStep {
    pub bank_code: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub usdt_wallet_address: String,
    pub accept_terms: bool,
}

impl PayoutStep {
    /// `country` is the one chosen on the account step.
    pub fn validate(&self, country: &str) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if pays_out_to_bank(country) {
            errors.required("bank_code", &self.bank_code, "Bank");
            let digits = self.account_number.trim();
            if digits.is_empty() {
                errors.add("account_number", "Account number is required");
            } else if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
                errors.add("account_number", "Account number must be 10 digits");
            }
            errors.required("account_name", &self.account_name, "Account name");
        } else {
            errors.required(
                "usdt_wallet_address",
                &self.usdt_wallet_address,
                "USDT wallet address",
            );
        }
        if !self.accept_terms {
            errors.add("accept_terms", "You must accept the terms and conditions");
        }
        errors.into_result()
    }

    /// Bank and a complete account number are known, so the account holder's
    /// name can be looked up.
    pub fn ready_to_resolve(&self) -> bool {
        let digits = self.account_number.trim();
        !self.bank_code.trim().is_empty()
            && digits.len() == 10
            && digits.chars().all(|c| c.is_ascii_digit())
    }

    /// Drop the details that do not apply to `country`, so a user who
    /// changed country does not submit both.
    pub fn for_country(mut self, country: &str) -> Self {
        if pays_out_to_bank(country) {
            self.usdt_wallet_address.clear();
        } else {
            self.bank_code.clear();
            self.bank_name.clear();
            self.account_number.clear();
            self.account_name.clear();
        }
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    BankTransfer,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::Wallet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Wallet => "Sponsor wallet",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Wallet => "wallet",
        }
    }
}

/// Step 5: payment method for the registration fee.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentStep {
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentStep {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required_opt("payment_method", &self.payment_method, "Payment method");
        errors.into_result()
    }
}
