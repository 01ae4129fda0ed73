mod announcements;
pub use announcements::{board_placeholder, AnnouncementBoard, ALL_CAUGHT_UP};

mod dashboard;
pub use dashboard::DashboardView;

mod login;
pub use login::LoginView;

mod promos;
pub use promos::{export_filename, PromoReport};

mod registration;
pub use registration::RegistrationWizard;

mod shell;
pub use shell::{PortalShell, Section};

mod users;
pub use users::UsersView;

mod wallet;
pub use wallet::{TransactionHistory, WalletView};
