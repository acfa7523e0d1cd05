//! Data table component types.
//!
//! Each panel lists its rows in a table; these types describe the columns
//! and the empty state so templates stay free of per-panel markup.

use serde::Serialize;

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
    /// Right-align (money and counts).
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new text column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: false,
        }
    }

    /// Create a new right-aligned column.
    #[must_use]
    pub const fn numeric(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: true,
        }
    }
}

/// Complete data table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTableConfig {
    /// DOM id of the table.
    pub table_id: &'static str,
    /// Columns in display order.
    pub columns: Vec<TableColumn>,
    /// Message shown when there are no rows.
    pub empty_message: &'static str,
}

impl DataTableConfig {
    /// Create a new table configuration.
    #[must_use]
    pub const fn new(table_id: &'static str) -> Self {
        Self {
            table_id,
            columns: Vec::new(),
            empty_message: "Nothing here yet",
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the empty state message.
    #[must_use]
    pub const fn empty_message(mut self, message: &'static str) -> Self {
        self.empty_message = message;
        self
    }
}

// =============================================================================
// Panel Tables
// =============================================================================

/// Admin users table for the user management panel.
#[must_use]
pub fn admin_users_table() -> DataTableConfig {
    DataTableConfig::new("admin-users-table")
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::new("roles", "Roles"))
        .column(TableColumn::new("status", "Status"))
        .empty_message("No admin users")
}

/// Settings table for the system settings panel.
#[must_use]
pub fn settings_table() -> DataTableConfig {
    DataTableConfig::new("settings-table")
        .column(TableColumn::new("key", "Key"))
        .column(TableColumn::new("value", "Value"))
        .column(TableColumn::new("updated_at", "Updated"))
        .empty_message("No settings stored")
}

/// Products table for the product management panel.
#[must_use]
pub fn products_table() -> DataTableConfig {
    DataTableConfig::new("products-table")
        .column(TableColumn::new("title", "Product"))
        .column(TableColumn::numeric("price", "Price"))
        .column(TableColumn::numeric("inventory", "Inventory"))
        .empty_message("No products")
}

/// Orders table for the order management panel.
#[must_use]
pub fn orders_table() -> DataTableConfig {
    DataTableConfig::new("orders-table")
        .column(TableColumn::new("number", "Order"))
        .column(TableColumn::new("customer", "Customer"))
        .column(TableColumn::numeric("total", "Total"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("created_at", "Placed"))
        .empty_message("No orders")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_tables_have_unique_keys() {
        for table in [
            admin_users_table(),
            settings_table(),
            products_table(),
            orders_table(),
        ] {
            let mut keys: Vec<&str> = table.columns.iter().map(|c| c.key).collect();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), total, "duplicate column in {}", table.table_id);
        }
    }

    #[test]
    fn test_money_columns_are_numeric() {
        let products = products_table();
        let price = products.columns.iter().find(|c| c.key == "price");
        assert!(price.is_some_and(|c| c.numeric));
    }
}
