use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};
use crate::icons::{FaBullhorn, FaGauge, FaTrophy, FaUserPlus, FaUsers, FaWallet};
use crate::Icon;

/// Top-level areas of the portal, as shown in the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Wallet,
    Announcements,
    Register,
    Users,
    Promos,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Wallet,
        Section::Announcements,
        Section::Register,
        Section::Users,
        Section::Promos,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Wallet => "Wallet",
            Section::Announcements => "Announcements",
            Section::Register => "Register Member",
            Section::Users => "Users",
            Section::Promos => "Promo Qualifiers",
        }
    }

    pub fn admin_only(self) -> bool {
        matches!(self, Section::Users | Section::Promos)
    }

    /// Sections visible to a user with or without admin rights.
    pub fn visible(is_admin: bool) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| is_admin || !s.admin_only())
            .collect()
    }
}

fn section_icon(section: Section) -> Element {
    match section {
        Section::Dashboard => rsx! { Icon { icon: FaGauge, width: 16, height: 16 } },
        Section::Wallet => rsx! { Icon { icon: FaWallet, width: 16, height: 16 } },
        Section::Announcements => rsx! { Icon { icon: FaBullhorn, width: 16, height: 16 } },
        Section::Register => rsx! { Icon { icon: FaUserPlus, width: 16, height: 16 } },
        Section::Users => rsx! { Icon { icon: FaUsers, width: 16, height: 16 } },
        Section::Promos => rsx! { Icon { icon: FaTrophy, width: 16, height: 16 } },
    }
}

/// Sidebar + header chrome around every signed-in page.
#[component]
pub fn PortalShell(active: Section, on_navigate: EventHandler<Section>, children: Element) -> Element {
    let auth = use_auth();
    let state = auth();
    let name = state
        .user
        .as_ref()
        .map(|u| u.display_name())
        .unwrap_or_default();
    let sections = Section::visible(state.is_admin());

    rsx! {
        div { class: "shell",
            aside { class: "shell-sidebar",
                div { class: "shell-brand", "Member Portal" }
                nav { class: "shell-nav",
                    for section in sections {
                        button {
                            key: "{section:?}",
                            class: if section == active { "nav-item nav-active" } else { "nav-item" },
                            onclick: move |_| on_navigate.call(section),
                            {section_icon(section)}
                            span { {section.label()} }
                        }
                    }
                }
            }
            div { class: "shell-main",
                header { class: "shell-header",
                    h1 { {active.label()} }
                    div { class: "shell-user",
                        span { "{name}" }
                        LogoutButton { class: "button button-ghost" }
                    }
                }
                main { class: "shell-content", {children} }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_do_not_see_admin_sections() {
        let sections = Section::visible(false);
        assert!(!sections.contains(&Section::Users));
        assert!(!sections.contains(&Section::Promos));
        assert!(sections.contains(&Section::Register));
    }

    #[test]
    fn admins_see_everything() {
        assert_eq!(Section::visible(true).len(), Section::ALL.len());
    }
}
