use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use model::PortalConfig;
use ui::views::{
    AnnouncementBoard, DashboardView, LoginView, PortalShell, PromoReport, RegistrationWizard,
    Section, UsersView, WalletView,
};
use ui::{use_auth, AuthProvider, ToastProvider, PORTAL_CSS};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/login")]
    Login {},
    #[layout(Portal)]
        #[route("/")]
        Dashboard {},
        #[route("/wallet")]
        Wallet {},
        #[route("/announcements")]
        Announcements {},
        #[route("/register")]
        Register {},
        #[route("/users")]
        Users {},
        #[route("/promos")]
        Promos {},
}

impl Route {
    fn section(&self) -> Section {
        match self {
            Route::Login {} | Route::Dashboard {} => Section::Dashboard,
            Route::Wallet {} => Section::Wallet,
            Route::Announcements {} => Section::Announcements,
            Route::Register {} => Section::Register,
            Route::Users {} => Section::Users,
            Route::Promos {} => Section::Promos,
        }
    }
}

impl From<Section> for Route {
    fn from(section: Section) -> Self {
        match section {
            Section::Dashboard => Route::Dashboard {},
            Section::Wallet => Route::Wallet {},
            Section::Announcements => Route::Announcements {},
            Section::Register => Route::Register {},
            Section::Users => Route::Users {},
            Section::Promos => Route::Promos {},
        }
    }
}

const CONFIG_TOML: &str = include_str!("../portal.toml");

fn load_config() -> PortalConfig {
    let mut config = match PortalConfig::from_toml(CONFIG_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid {}: {e}", PortalConfig::filename());
            PortalConfig::default()
        }
    };
    if let Some(base_url) = option_env!("PORTAL_API_BASE_URL") {
        config.api.base_url = base_url.to_string();
    }
    config
}

fn main() {
    dioxus::logger::init(Level::INFO).ok();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: PORTAL_CSS }

        ToastProvider {
            AuthProvider { config,
                Router::<Route> {}
            }
        }
    }
}

#[component]
fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // Already signed in (e.g. a restored session): skip the form.
    use_effect(move || {
        if auth.read().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    rsx! {
        LoginView { on_success: move |_| { nav.replace(Route::Dashboard {}); } }
    }
}

/// Signed-in chrome. Sends anonymous visitors to the login page and keeps
/// members out of admin-only sections.
#[component]
fn Portal() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let route = use_route::<Route>();
    let active = route.section();

    use_effect(move || {
        let state = auth.read();
        if state.loading {
            return;
        }
        if state.user.is_none() {
            nav.replace(Route::Login {});
        } else if active.admin_only() && !state.is_admin() {
            nav.replace(Route::Dashboard {});
        }
    });

    let state = auth();
    if state.loading {
        return rsx! {
            div { class: "login-page", ui::components::Spinner { label: "Loading..." } }
        };
    }
    if state.user.is_none() || (active.admin_only() && !state.is_admin()) {
        return rsx! {};
    }

    rsx! {
        PortalShell {
            active,
            on_navigate: move |section: Section| { nav.push(Route::from(section)); },
            Outlet::<Route> {}
        }
    }
}

#[component]
fn Dashboard() -> Element {
    rsx! { DashboardView {} }
}

#[component]
fn Wallet() -> Element {
    rsx! { WalletView {} }
}

#[component]
fn Announcements() -> Element {
    rsx! { AnnouncementBoard {} }
}

#[component]
fn Register() -> Element {
    rsx! { RegistrationWizard {} }
}

#[component]
fn Users() -> Element {
    rsx! { UsersView {} }
}

#[component]
fn Promos() -> Element {
    rsx! { PromoReport {} }
}
