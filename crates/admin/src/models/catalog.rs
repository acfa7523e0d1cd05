//! Read-only catalog summaries shown on the product manager panels.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use storedesk_core::{OrderId, ProductId};

/// A product as listed on the product management panel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub inventory: i32,
}

/// An order as listed on the order management panel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: OrderId,
    pub number: String,
    pub customer_name: String,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
