//! Role-scoped dashboard composition.
//!
//! The active [`Role`] picks a [`DashboardVariant`] once. Each variant owns a
//! closed set of tabs, an initial tab and a binding from tab to [`Panel`].
//! A [`DashboardView`] is the per-request state (variant plus active tab) and
//! [`compose`] turns it into what the page renders: header, tab strip and the
//! single mounted panel.
//!
//! Nothing here touches the session or the database. Authorization happens in
//! the extractors; role switching and logout are form posts handled by the
//! auth routes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use storedesk_core::Role;

use crate::models::CurrentUser;

/// Form action for logging out.
pub const LOGOUT_ACTION: &str = "/auth/logout";

/// Form action for switching the active role.
pub const ROLE_SWITCH_ACTION: &str = "/role";

/// A tab name that is not known at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab: {0}")]
pub struct TabParseError(pub String);

/// Errors from dashboard state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The tab exists but belongs to another dashboard variant.
    #[error("tab {tab} is not part of the {variant} dashboard")]
    ForeignTab { tab: Tab, variant: DashboardVariant },
}

/// A dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Users,
    Settings,
    Products,
    Orders,
}

impl Tab {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }

    /// Tab strip label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Settings => "Settings",
            Self::Products => "Products",
            Self::Orders => "Orders",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = TabParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Self::Users),
            "settings" => Ok(Self::Settings),
            "products" => Ok(Self::Products),
            "orders" => Ok(Self::Orders),
            _ => Err(TabParseError(s.to_owned())),
        }
    }
}

/// A self-contained management panel. Exactly one is mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    UserManagement,
    SystemSettings,
    ProductManagement,
    OrderManagement,
}

impl Panel {
    /// Panel heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::UserManagement => "User Management",
            Self::SystemSettings => "System Settings",
            Self::ProductManagement => "Product Management",
            Self::OrderManagement => "Order Management",
        }
    }
}

/// The dashboard layouts. A role has at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardVariant {
    Administrator,
    ProductManager,
}

impl DashboardVariant {
    /// The dashboard for `role`; customers have none.
    #[must_use]
    pub const fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Administrator => Some(Self::Administrator),
            Role::ProductManager => Some(Self::ProductManager),
            Role::Customer => None,
        }
    }

    /// Tabs in display order.
    #[must_use]
    pub const fn tabs(self) -> &'static [Tab] {
        match self {
            Self::Administrator => &[Tab::Users, Tab::Settings],
            Self::ProductManager => &[Tab::Products, Tab::Orders],
        }
    }

    /// Tab active right after mounting.
    #[must_use]
    pub const fn initial_tab(self) -> Tab {
        match self {
            Self::Administrator => Tab::Users,
            Self::ProductManager => Tab::Products,
        }
    }

    /// Panel bound to `tab`, or `None` if the tab belongs to another variant.
    #[must_use]
    pub const fn panel_for(self, tab: Tab) -> Option<Panel> {
        match (self, tab) {
            (Self::Administrator, Tab::Users) => Some(Panel::UserManagement),
            (Self::Administrator, Tab::Settings) => Some(Panel::SystemSettings),
            (Self::ProductManager, Tab::Products) => Some(Panel::ProductManagement),
            (Self::ProductManager, Tab::Orders) => Some(Panel::OrderManagement),
            _ => None,
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator Dashboard",
            Self::ProductManager => "Product Manager Dashboard",
        }
    }
}

impl fmt::Display for DashboardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Administrator => "administrator",
            Self::ProductManager => "product manager",
        })
    }
}

/// Per-request dashboard state.
///
/// Invariant: `active_tab` is always one of `variant.tabs()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardView {
    variant: DashboardVariant,
    active_tab: Tab,
}

impl DashboardView {
    /// Mount a dashboard on its initial tab.
    #[must_use]
    pub const fn mount(variant: DashboardVariant) -> Self {
        Self {
            variant,
            active_tab: variant.initial_tab(),
        }
    }

    /// Make `tab` the active tab.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::ForeignTab` and leaves the view unchanged if
    /// `tab` does not belong to this variant.
    pub const fn select_tab(&mut self, tab: Tab) -> Result<(), DashboardError> {
        if self.variant.panel_for(tab).is_none() {
            return Err(DashboardError::ForeignTab {
                tab,
                variant: self.variant,
            });
        }
        self.active_tab = tab;
        Ok(())
    }

    #[must_use]
    pub const fn variant(&self) -> DashboardVariant {
        self.variant
    }

    #[must_use]
    pub const fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// The mounted panel.
    #[must_use]
    pub const fn panel(&self) -> Panel {
        match self.variant.panel_for(self.active_tab) {
            Some(panel) => panel,
            // unreachable while the invariant holds
            None => match self.variant {
                DashboardVariant::Administrator => Panel::UserManagement,
                DashboardVariant::ProductManager => Panel::ProductManagement,
            },
        }
    }
}

/// Data for the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderProps {
    pub user_name: String,
    pub user_email: String,
    pub role: Role,
    /// Roles offered by the role switcher.
    pub available_roles: Vec<Role>,
    pub logout_action: &'static str,
    pub role_switch_action: &'static str,
}

impl HeaderProps {
    /// Header for `user`, whatever dashboard (if any) is shown below it.
    #[must_use]
    pub fn for_user(user: &CurrentUser) -> Self {
        Self {
            user_name: user.name.clone(),
            user_email: user.email.to_string(),
            role: user.role,
            available_roles: user.available_roles.clone(),
            logout_action: LOGOUT_ACTION,
            role_switch_action: ROLE_SWITCH_ACTION,
        }
    }

    /// Whether the role switcher has anything to offer.
    #[must_use]
    pub fn can_switch_role(&self) -> bool {
        self.available_roles.len() > 1
    }
}

/// One entry of the tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabItem {
    pub tab: Tab,
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Everything a dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub title: &'static str,
    pub header: HeaderProps,
    pub tabs: Vec<TabItem>,
    pub panel: Panel,
}

/// Compose the dashboard for `user` in state `view`.
///
/// Pure: no authorization, no I/O.
#[must_use]
pub fn compose(user: &CurrentUser, view: &DashboardView) -> Composition {
    let tabs = view
        .variant()
        .tabs()
        .iter()
        .map(|&tab| TabItem {
            tab,
            label: tab.label(),
            href: format!("/?tab={tab}"),
            active: tab == view.active_tab(),
        })
        .collect();

    Composition {
        title: view.variant().title(),
        header: HeaderProps::for_user(user),
        tabs,
        panel: view.panel(),
    }
}
