//! Assembles the full pick plan for a batch of candidate orders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    allocate_line, resolve_demand, sequence_tasks, BackOrderLine, OrderLine, PickTask,
    ReservationSlice, SkippedLine,
};

/// Everything the planner needs to know about one candidate order, as loaded
/// from the store ahead of the write transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInput {
    pub order_id: Uuid,
    pub order_number: String,
    pub lines: Vec<OrderLine>,
    pub back_orders: Vec<BackOrderLine>,
    pub reservations: Vec<ReservationSlice>,
}

/// The generated plan: tasks in final walk order, plus every line that was
/// skipped or only partially covered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickPlan {
    pub tasks: Vec<PickTask>,
    pub skipped: Vec<SkippedLine>,
}

impl PickPlan {
    pub fn total_units(&self) -> i32 {
        self.tasks.iter().map(|t| t.quantity_to_pick).sum()
    }
}

/// Builds the pick plan for `orders`, capping the list at `max_items` total
/// units. Per-line failures are collected, not fatal; the caller decides what
/// an empty plan means.
pub fn build_plan(orders: &[OrderInput], max_items: i32) -> PickPlan {
    let mut tasks: Vec<PickTask> = Vec::new();
    let mut skipped: Vec<SkippedLine> = Vec::new();
    let mut capacity = max_items.max(0);

    for order in orders {
        for demand in resolve_demand(&order.lines, &order.back_orders) {
            let alloc = allocate_line(
                order.order_id,
                &order.order_number,
                &demand,
                &order.reservations,
                capacity,
            );
            capacity -= alloc.picked_units();
            tasks.extend(alloc.tasks);
            skipped.extend(alloc.shortfall);
        }
    }

    PickPlan {
        tasks: sequence_tasks(tasks),
        skipped,
    }
}
