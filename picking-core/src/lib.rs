//! Pick-list generation pipeline: demand resolution, greedy reservation
//! allocation, and walk-order sequencing. Pure logic, no I/O — the service
//! crate feeds it rows and persists what comes out.

mod allocate;
mod demand;
mod plan;
mod sequence;

pub use allocate::{allocate_line, LineAllocation};
pub use demand::{resolve_demand, LineDemand};
pub use plan::{build_plan, OrderInput, PickPlan};
pub use sequence::{sequence_tasks, zone_of};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One order line as loaded from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_variant_id: Uuid,
    pub sku: String,
    pub quantity: i32,
}

/// Active back order for an order line. Presence of any back order flips the
/// whole order into back-order fulfillment mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackOrderLine {
    pub product_variant_id: Uuid,
    pub quantity_back_ordered: i32,
    pub quantity_fulfilled: i32,
}

impl BackOrderLine {
    pub fn outstanding(&self) -> i32 {
        self.quantity_back_ordered - self.quantity_fulfilled
    }
}

/// An active reservation row: a quantity of one product committed to one
/// order at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSlice {
    pub id: Uuid,
    pub product_variant_id: Uuid,
    pub location: String,
    pub quantity: i32,
}

/// A single pick task in the generated list. Each task draws from exactly
/// one reservation slice; `reservation_quantity` is the slice's quantity at
/// read time, kept so the writer can do a conditional consume against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickTask {
    pub order_id: Uuid,
    pub order_number: String,
    pub product_variant_id: Uuid,
    pub sku: String,
    pub location: String,
    pub zone: String,
    pub quantity_to_pick: i32,
    pub reservation_id: Uuid,
    pub reservation_quantity: i32,
}

/// A line that could not be (fully) planned: the SKU plus a human-readable
/// reason. Surfaced as a warning, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLine {
    pub sku: String,
    pub reason: String,
}
