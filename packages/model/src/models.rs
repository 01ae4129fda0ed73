//! # Server-owned records
//!
//! Everything here is fetched from the backend and rendered; the client holds
//! no authoritative copy. Field names follow the backend's snake_case JSON.
//! Optional fields are `#[serde(default)]` so that extra or missing
//! presentation-only fields never fail a page, while identifiers stay required
//! and fail the decode when absent.
//!
//! The backend is loose about numeric types: money and PV arrive as numbers or
//! as decimal strings (`"1500.00"`). [`amount`] accepts both.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a number that may be sent as a JSON number, a numeric string,
/// or `null` (read as zero).
pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null,
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s
            .trim()
            .replace(',', "")
            .parse()
            .map_err(serde::de::Error::custom),
        Some(Raw::Null) | None => Ok(0.0),
    }
}

/// The signed-in member or admin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub is_stockist: bool,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        matches!(self.role.as_str(), "admin" | "super_admin")
    }

    /// Full name, falling back to the username.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginSession {
    pub token: String,
    pub user: UserProfile,
}

/// Candidate returned by the downline search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl DownlineUser {
    pub fn label(&self) -> String {
        match self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => format!("{} ({name})", self.username),
            None => self.username.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "amount")]
    pub wallet_balance: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_earnings: f64,
    #[serde(default, deserialize_with = "amount")]
    pub left_pv: f64,
    #[serde(default, deserialize_with = "amount")]
    pub right_pv: f64,
    #[serde(default)]
    pub left_count: u64,
    #[serde(default)]
    pub right_count: u64,
    #[serde(default)]
    pub direct_referrals: u64,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub referral_link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "amount")]
    pub balance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletOverview {
    #[serde(default)]
    pub wallets: Vec<WalletBalance>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl WalletOverview {
    pub fn total(&self) -> f64 {
        self.wallets.iter().map(|w| w.balance).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub reference: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "amount")]
    pub amount: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub wallet: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.kind.eq_ignore_ascii_case("credit")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of the admin users table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_stockist: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Promo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromoQualifier {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub left_pv: f64,
    #[serde(default, deserialize_with = "amount")]
    pub right_pv: f64,
    #[serde(default)]
    pub qualified_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "amount")]
    pub pv: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "amount")]
    pub pv: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Country, state or city in the cascading location lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAccount {
    pub account_number: String,
    pub account_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_accept_numbers_and_strings() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 1,
            "type": "credit",
            "amount": "1,500.50"
        }))
        .unwrap();
        assert_eq!(tx.amount, 1500.5);
        assert!(tx.is_credit());

        let package: Package =
            serde_json::from_value(json!({"id": 2, "name": "Gold", "price": 250, "pv": null}))
                .unwrap();
        assert_eq!(package.price, 250.0);
        assert_eq!(package.pv, 0.0);
    }

    #[test]
    fn garbage_amounts_fail() {
        let result: Result<Package, _> =
            serde_json::from_value(json!({"id": 2, "name": "Gold", "price": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_identifiers_fail_closed() {
        let result: Result<Announcement, _> = serde_json::from_value(json!({"title": "Hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn display_names() {
        let mut user: UserProfile = serde_json::from_value(json!({
            "id": 1, "username": "ada", "role": "admin"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.display_name(), "ada");
        user.first_name = Some("Ada".into());
        user.last_name = Some("Obi".into());
        assert_eq!(user.display_name(), "Ada Obi");

        let candidate = DownlineUser {
            id: 3,
            username: "kemi".into(),
            name: Some("Kemi A".into()),
        };
        assert_eq!(candidate.label(), "kemi (Kemi A)");
    }
}
