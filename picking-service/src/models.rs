use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use picking_core::{BackOrderLine, OrderLine, ReservationSlice};

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub status: String,
    pub total_amount: bigdecimal::BigDecimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_variant_id: Uuid,
    pub sku: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable)]
pub struct BackOrder {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_variant_id: Uuid,
    pub sku: String,
    pub quantity_back_ordered: i32,
    pub quantity_fulfilled: i32,
    pub status: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct InventoryReservation {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_variant_id: Uuid,
    pub location: String,
    pub quantity: i32,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
pub struct PickList {
    pub id: Uuid,
    pub batch_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pick_lists)]
pub struct NewPickList {
    pub id: Uuid,
    pub batch_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub total_items: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pick_list_items)]
pub struct NewPickListItem {
    pub id: Uuid,
    pub pick_list_id: Uuid,
    pub order_id: Uuid,
    pub product_variant_id: Uuid,
    pub sku: String,
    pub location: String,
    pub quantity_to_pick: i32,
    pub pick_sequence: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pick_events)]
pub struct NewPickEvent {
    pub id: Uuid,
    pub pick_list_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl From<&OrderItem> for OrderLine {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_variant_id: item.product_variant_id,
            sku: item.sku.clone(),
            quantity: item.quantity,
        }
    }
}

impl From<&BackOrder> for BackOrderLine {
    fn from(bo: &BackOrder) -> Self {
        Self {
            product_variant_id: bo.product_variant_id,
            quantity_back_ordered: bo.quantity_back_ordered,
            quantity_fulfilled: bo.quantity_fulfilled,
        }
    }
}

impl From<&InventoryReservation> for ReservationSlice {
    fn from(row: &InventoryReservation) -> Self {
        Self {
            id: row.id,
            product_variant_id: row.product_variant_id,
            location: row.location.clone(),
            quantity: row.quantity,
        }
    }
}
