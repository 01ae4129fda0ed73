pub mod config;
pub mod csv;
pub mod format;
pub mod list_view;
pub mod logout;
pub mod models;
pub mod pagination;
pub mod placement;
pub mod registration;
pub mod search;
pub mod steps;
pub mod validation;

pub use config::PortalConfig;
pub use list_view::{ListState, ListView};
pub use logout::LogoutLatch;
pub use pagination::{Page, PageRequest, PerPageParam};
pub use placement::{Leg, LegAvailability, PlacementSelection};
pub use registration::{RegistrationSession, SessionId, Step, WizardError};
pub use search::{SearchGate, SearchTicket};
pub use validation::FieldErrors;
pub use models::{
    Announcement, Bank, DashboardSummary, DownlineUser, LoginSession, Package, Place, Product,
    Promo, PromoQualifier, ResolvedAccount, Transaction, UserProfile, UserRecord, WalletBalance,
    WalletOverview,
};
pub use steps::{AccountStep, PaymentMethod, PaymentStep, PayoutStep, PlacementStep, ProductsStep};
