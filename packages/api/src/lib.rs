//! # API crate: typed client for the portal backend
//!
//! The backend owns every business rule (wallets, the binary tree, commissions,
//! payments). This crate only knows how to ask it things and how to read the
//! answers.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`transport`] | The [`Transport`] seam and the reqwest-backed [`HttpTransport`] |
//! | [`memory`] | [`MemoryTransport`], a scripted transport for tests |
//! | [`client`] | [`ApiClient`]: bearer token, response conventions, paginated GETs |
//! | [`error`] | [`ApiError`] taxonomy (validation, unauthenticated, server, network, decode) |
//! | [`endpoints`] | One `impl ApiClient` block per endpoint family |
//! | [`registration`] | Step submission for the registration wizard |

pub mod client;
pub mod endpoints;
pub mod error;
pub mod memory;
pub mod registration;
pub mod transport;

pub use client::{should_logout, ApiClient, SESSION_HEADER};
pub use error::{ApiError, ApiResult};
pub use memory::MemoryTransport;
pub use registration::{PaymentInstructions, StepOutcome};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// The client the UI uses.
pub type HttpClient = ApiClient<HttpTransport>;
