//! Dashboard route handler.
//!
//! Resolves the dashboard variant from the active role, selects the requested
//! tab and renders the one mounted panel. Each panel loads its own data.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use storedesk_core::{MoneyFormat, RoleId};

use crate::components::dashboard::{
    Composition, DashboardVariant, DashboardView, HeaderProps, Panel, Tab, TabItem, compose,
};
use crate::components::data_table::{
    DataTableConfig, admin_users_table, orders_table, products_table, settings_table,
};
use crate::db::catalog::PANEL_LIMIT;
use crate::db::settings::Setting;
use crate::db::{AdminUserRepository, CatalogRepository, RoleRepository, SettingsRepository};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{AdminUser, OrderSummary, ProductSummary, RoleRecord};
use crate::state::AppState;

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
}

// =============================================================================
// View Models
// =============================================================================

/// Admin user row for the user management panel.
#[derive(Debug, Clone)]
pub struct AdminUserItem {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roles: String,
    pub is_active: bool,
}

impl AdminUserItem {
    fn from_user(user: &AdminUser, role_labels: &HashMap<RoleId, &'static str>) -> Self {
        let roles = user
            .role_ids
            .iter()
            .filter_map(|id| role_labels.get(id).copied())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            phone: user.phone.clone(),
            roles,
            is_active: user.is_active,
        }
    }
}

/// Setting row for the system settings panel.
#[derive(Debug, Clone)]
pub struct SettingItem {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl From<&Setting> for SettingItem {
    fn from(setting: &Setting) -> Self {
        Self {
            key: setting.key.clone(),
            value: setting.value.to_string(),
            updated_at: setting.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Product row for the product management panel.
#[derive(Debug, Clone)]
pub struct ProductItem {
    pub title: String,
    pub price: String,
    pub inventory: i32,
}

impl ProductItem {
    fn new(product: &ProductSummary, money: &MoneyFormat) -> Self {
        Self {
            title: product.title.clone(),
            price: money.format_short(product.price),
            inventory: product.inventory,
        }
    }
}

/// Order row for the order management panel.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub number: String,
    pub customer_name: String,
    pub total: String,
    pub status: String,
    pub created_at: String,
}

impl OrderItem {
    fn new(order: &OrderSummary, money: &MoneyFormat) -> Self {
        Self {
            number: order.number.clone(),
            customer_name: order.customer_name.clone(),
            total: money.format_long(order.total),
            status: order.status.clone(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub title: &'static str,
    pub header: HeaderProps,
    pub tabs: Vec<TabItem>,
    /// Pre-rendered HTML of the mounted panel.
    pub panel_html: String,
}

impl DashboardTemplate {
    /// Page for `composition` with its panel already rendered.
    #[must_use]
    pub fn new(composition: Composition, panel_html: String) -> Self {
        let Composition {
            title,
            header,
            tabs,
            panel: _,
        } = composition;

        Self {
            title,
            header,
            tabs,
            panel_html,
        }
    }
}

/// Page shown to a role without a dashboard.
#[derive(Template)]
#[template(path = "dashboard/no_dashboard.html")]
pub struct NoDashboardTemplate {
    pub header: HeaderProps,
}

#[derive(Template)]
#[template(path = "panels/users.html")]
pub struct UsersPanelTemplate {
    pub table: DataTableConfig,
    pub users: Vec<AdminUserItem>,
    pub load_failed: bool,
}

#[derive(Template)]
#[template(path = "panels/settings.html")]
pub struct SettingsPanelTemplate {
    pub table: DataTableConfig,
    pub settings: Vec<SettingItem>,
    pub load_failed: bool,
}

#[derive(Template)]
#[template(path = "panels/products.html")]
pub struct ProductsPanelTemplate {
    pub table: DataTableConfig,
    pub products: Vec<ProductItem>,
    pub load_failed: bool,
}

#[derive(Template)]
#[template(path = "panels/orders.html")]
pub struct OrdersPanelTemplate {
    pub table: DataTableConfig,
    pub orders: Vec<OrderItem>,
    pub load_failed: bool,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

// =============================================================================
// Handlers
// =============================================================================

/// Dashboard page handler.
///
/// GET /?tab=<tab>
#[instrument(skip(user, state), fields(user_id = %user.id, role = %user.role))]
async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let Some(variant) = DashboardVariant::for_role(user.role) else {
        let page = NoDashboardTemplate {
            header: HeaderProps::for_user(&user),
        };
        return (StatusCode::FORBIDDEN, Html(render_or_log(&page))).into_response();
    };

    let view = resolve_view(variant, query.tab.as_deref());
    let composition = compose(&user, &view);
    let panel_html = render_panel(&state, composition.panel).await;

    DashboardTemplate::new(composition, panel_html).into_response()
}

/// Mount `variant` and apply the requested tab, falling back to the initial tab.
fn resolve_view(variant: DashboardVariant, requested: Option<&str>) -> DashboardView {
    let mut view = DashboardView::mount(variant);
    let Some(raw) = requested else {
        return view;
    };

    match raw.parse::<Tab>() {
        Ok(tab) => {
            if let Err(e) = view.select_tab(tab) {
                tracing::warn!("{e}; showing {}", view.active_tab());
            }
        }
        Err(e) => tracing::warn!("{e}; showing {}", view.active_tab()),
    }
    view
}

/// Load the data for `panel` and render it. Only this panel's queries run.
async fn render_panel(state: &AppState, panel: Panel) -> String {
    match panel {
        Panel::UserManagement => render_or_log(&users_panel(state).await),
        Panel::SystemSettings => render_or_log(&settings_panel(state).await),
        Panel::ProductManagement => render_or_log(&products_panel(state).await),
        Panel::OrderManagement => render_or_log(&orders_panel(state).await),
    }
}

fn render_or_log(template: &impl Template) -> String {
    template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    })
}

async fn users_panel(state: &AppState) -> UsersPanelTemplate {
    let roles = match RoleRepository::new(state.pool()).list_all().await {
        Ok(roles) => roles,
        Err(e) => {
            tracing::error!("Failed to fetch roles: {e}");
            vec![]
        }
    };
    let role_labels: HashMap<RoleId, &'static str> = roles
        .iter()
        .map(|r: &RoleRecord| (r.id, r.name.label()))
        .collect();

    let (users, load_failed) = match AdminUserRepository::new(state.pool()).list_all().await {
        Ok(users) => (
            users
                .iter()
                .map(|u| AdminUserItem::from_user(u, &role_labels))
                .collect(),
            false,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch admin users: {e}");
            (vec![], true)
        }
    };

    UsersPanelTemplate {
        table: admin_users_table(),
        users,
        load_failed,
    }
}

async fn settings_panel(state: &AppState) -> SettingsPanelTemplate {
    let (settings, load_failed) = match SettingsRepository::new(state.pool()).list().await {
        Ok(settings) => (settings.iter().map(SettingItem::from).collect(), false),
        Err(e) => {
            tracing::error!("Failed to fetch settings: {e}");
            (vec![], true)
        }
    };

    SettingsPanelTemplate {
        table: settings_table(),
        settings,
        load_failed,
    }
}

async fn products_panel(state: &AppState) -> ProductsPanelTemplate {
    let money = state.money();
    let (products, load_failed) = match CatalogRepository::new(state.pool())
        .recent_products(PANEL_LIMIT)
        .await
    {
        Ok(products) => (
            products.iter().map(|p| ProductItem::new(p, money)).collect(),
            false,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (vec![], true)
        }
    };

    ProductsPanelTemplate {
        table: products_table(),
        products,
        load_failed,
    }
}

async fn orders_panel(state: &AppState) -> OrdersPanelTemplate {
    let money = state.money();
    let (orders, load_failed) = match CatalogRepository::new(state.pool())
        .recent_orders(PANEL_LIMIT)
        .await
    {
        Ok(orders) => (orders.iter().map(|o| OrderItem::new(o, money)).collect(), false),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            (vec![], true)
        }
    };

    OrdersPanelTemplate {
        table: orders_table(),
        orders,
        load_failed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storedesk_core::{AdminUserId, Email, OrderId, ProductId, Role};

    use super::*;
    use crate::models::CurrentUser;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: AdminUserId::new(1),
            name: "Dang Van G".to_string(),
            email: Email::parse("g@shop.vn").unwrap(),
            role,
            available_roles: vec![Role::ProductManager, Role::Administrator],
        }
    }

    fn products_html() -> String {
        let money = MoneyFormat::default();
        let product = ProductSummary {
            id: ProductId::new(1),
            title: "Ca phe sua da".to_string(),
            price: Decimal::from(25_000),
            inventory: 12,
        };
        ProductsPanelTemplate {
            table: products_table(),
            products: vec![ProductItem::new(&product, &money)],
            load_failed: false,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_resolve_view_defaults_to_initial_tab() {
        let view = resolve_view(DashboardVariant::Administrator, None);
        assert_eq!(view.active_tab(), Tab::Users);
    }

    #[test]
    fn test_resolve_view_selects_own_tab() {
        let view = resolve_view(DashboardVariant::Administrator, Some("settings"));
        assert_eq!(view.panel(), Panel::SystemSettings);
    }

    #[test]
    fn test_resolve_view_ignores_foreign_and_unknown_tabs() {
        let view = resolve_view(DashboardVariant::ProductManager, Some("users"));
        assert_eq!(view.active_tab(), Tab::Products);

        let view = resolve_view(DashboardVariant::ProductManager, Some("reports"));
        assert_eq!(view.active_tab(), Tab::Products);
    }

    #[test]
    fn test_product_panel_formats_short_price() {
        let html = products_html();
        assert!(html.contains("25.000đ"));
        assert!(html.contains("Ca phe sua da"));
    }

    #[test]
    fn test_order_item_formats_long_total() {
        let order = OrderSummary {
            id: OrderId::new(1),
            number: "#1001".to_string(),
            customer_name: "Bui Thi H".to_string(),
            total: Decimal::from(1_250_000),
            status: "paid".to_string(),
            created_at: Utc::now(),
        };
        let item = OrderItem::new(&order, &MoneyFormat::default());
        assert_eq!(item.total, "1.250.000 VND");
    }

    #[test]
    fn test_dashboard_renders_exactly_one_panel() {
        let view = resolve_view(DashboardVariant::ProductManager, Some("products"));
        let html = DashboardTemplate::new(
            compose(&user(Role::ProductManager), &view),
            products_html(),
        )
        .render()
        .unwrap();

        assert_eq!(html.matches("data-panel=").count(), 1);
        assert!(html.contains(r#"data-panel="product_management""#));
        assert!(html.contains(r#"action="/auth/logout""#));
        assert!(html.contains(r#"action="/role""#));
        assert!(html.contains(r#"href="/?tab=orders""#));
    }

    #[test]
    fn test_users_panel_lists_role_labels() {
        let admin = AdminUser {
            id: AdminUserId::new(2),
            name: "Ngo Van I".to_string(),
            email: Email::parse("i@shop.vn").unwrap(),
            phone: "0900000000".to_string(),
            is_active: false,
            role_ids: vec![RoleId::new(2), RoleId::new(3)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let labels = HashMap::from([
            (RoleId::new(2), Role::ProductManager.label()),
            (RoleId::new(3), Role::Administrator.label()),
        ]);

        let html = UsersPanelTemplate {
            table: admin_users_table(),
            users: vec![AdminUserItem::from_user(&admin, &labels)],
            load_failed: false,
        }
        .render()
        .unwrap();

        assert!(html.contains("Product Manager, Administrator"));
        assert!(html.contains("Inactive"));
        assert_eq!(html.matches("data-panel=").count(), 1);
    }

    #[test]
    fn test_no_dashboard_page_offers_role_switch() {
        let html = NoDashboardTemplate {
            header: HeaderProps::for_user(&user(Role::Customer)),
        }
        .render()
        .unwrap();
        assert!(html.contains("No dashboard"));
        assert_eq!(html.matches("data-panel=").count(), 0);
    }
}
