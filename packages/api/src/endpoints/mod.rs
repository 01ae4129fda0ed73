//! Endpoint families, each an `impl` block on [`crate::ApiClient`].
//!
//! | Module | Endpoints |
//! |--------|-----------|
//! | [`auth`] | `auth/login`, `auth/logout`, `auth/me` |
//! | [`account`] | `dashboard`, `wallet`, `wallet/transactions` |
//! | [`listings`] | `announcements`, `admin/users`, `promos`, `promos/{id}/qualifiers` |
//! | [`referrals`] | `referrals/downlines`, `referrals/available-legs` |
//! | [`lookups`] | packages, products, countries/states/cities, banks |

pub mod account;
pub mod auth;
pub mod listings;
pub mod lookups;
pub mod referrals;
