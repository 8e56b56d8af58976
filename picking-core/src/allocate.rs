//! Greedy reservation allocation for a single resolved demand line.

use uuid::Uuid;

use crate::{sequence::zone_of, LineDemand, PickTask, ReservationSlice, SkippedLine};

/// Outcome of allocating one demand line: zero or more pick tasks, and a
/// shortfall record when the demand could not be fully covered.
#[derive(Debug, Clone)]
pub struct LineAllocation {
    pub tasks: Vec<PickTask>,
    pub shortfall: Option<SkippedLine>,
}

impl LineAllocation {
    pub fn picked_units(&self) -> i32 {
        self.tasks.iter().map(|t| t.quantity_to_pick).sum()
    }
}

/// Allocates `demand` against that order's active reservation slices for the
/// same product, largest slice first (fewer distinct pick stops).
///
/// Each slice contributes at most its own quantity, and the line as a whole
/// contributes at most `capacity` units (the remaining headroom under the
/// global pick-list cap). Unfilled demand becomes a named shortfall; partial
/// fills still emit their tasks.
pub fn allocate_line(
    order_id: Uuid,
    order_number: &str,
    demand: &LineDemand,
    slices: &[ReservationSlice],
    capacity: i32,
) -> LineAllocation {
    let mut slices: Vec<&ReservationSlice> = slices
        .iter()
        .filter(|s| s.product_variant_id == demand.product_variant_id && s.quantity > 0)
        .collect();

    if slices.is_empty() {
        return LineAllocation {
            tasks: Vec::new(),
            shortfall: Some(SkippedLine {
                sku: demand.sku.clone(),
                reason: format!("No active reservations for order {order_number}"),
            }),
        };
    }

    slices.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.location.cmp(&b.location))
    });

    let reserved_total: i32 = slices.iter().map(|s| s.quantity).sum();

    let mut remaining = demand.quantity.min(capacity.max(0));
    let capped = demand.quantity > capacity.max(0);
    let mut tasks = Vec::new();

    for slice in slices {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(slice.quantity);
        tasks.push(PickTask {
            order_id,
            order_number: order_number.to_string(),
            product_variant_id: demand.product_variant_id,
            sku: demand.sku.clone(),
            location: slice.location.clone(),
            zone: zone_of(&slice.location).to_string(),
            quantity_to_pick: take,
            reservation_id: slice.id,
            reservation_quantity: slice.quantity,
        });
        remaining -= take;
    }

    let shortfall = if reserved_total < demand.quantity {
        Some(SkippedLine {
            sku: demand.sku.clone(),
            reason: format!(
                "Insufficient reservations for order {order_number}. Need {}, only {} reserved",
                demand.quantity, reserved_total
            ),
        })
    } else if capped || remaining > 0 {
        Some(SkippedLine {
            sku: demand.sku.clone(),
            reason: format!(
                "Pick list item cap reached; {} of {} units deferred",
                demand.quantity - tasks.iter().map(|t| t.quantity_to_pick).sum::<i32>(),
                demand.quantity
            ),
        })
    } else {
        None
    };

    LineAllocation { tasks, shortfall }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(pv: Uuid, location: &str, qty: i32) -> ReservationSlice {
        ReservationSlice {
            id: Uuid::new_v4(),
            product_variant_id: pv,
            location: location.to_string(),
            quantity: qty,
        }
    }

    fn demand_of(pv: Uuid, sku: &str, qty: i32) -> LineDemand {
        LineDemand {
            product_variant_id: pv,
            sku: sku.to_string(),
            quantity: qty,
        }
    }

    #[test]
    fn consumes_largest_slice_first() {
        let pv = Uuid::new_v4();
        let order = Uuid::new_v4();
        let slices = vec![slice(pv, "A1-01", 4), slice(pv, "B2-07", 8)];

        let alloc = allocate_line(order, "ORD-1", &demand_of(pv, "WIDGET", 10), &slices, 50);

        assert!(alloc.shortfall.is_none());
        assert_eq!(alloc.tasks.len(), 2);
        assert_eq!(alloc.tasks[0].location, "B2-07");
        assert_eq!(alloc.tasks[0].quantity_to_pick, 8);
        assert_eq!(alloc.tasks[1].location, "A1-01");
        assert_eq!(alloc.tasks[1].quantity_to_pick, 2);
    }

    #[test]
    fn task_never_exceeds_its_slice() {
        let pv = Uuid::new_v4();
        let slices = vec![slice(pv, "A1-01", 3), slice(pv, "A1-02", 3)];

        let alloc = allocate_line(Uuid::new_v4(), "ORD-1", &demand_of(pv, "WIDGET", 5), &slices, 50);

        for task in &alloc.tasks {
            assert!(task.quantity_to_pick <= task.reservation_quantity);
        }
        assert_eq!(alloc.picked_units(), 5);
    }

    #[test]
    fn underfill_records_shortfall_but_keeps_partial_tasks() {
        let pv = Uuid::new_v4();
        let slices = vec![slice(pv, "A1-01", 6)];

        let alloc = allocate_line(Uuid::new_v4(), "ORD-1", &demand_of(pv, "WIDGET", 10), &slices, 50);

        assert_eq!(alloc.tasks.len(), 1);
        assert_eq!(alloc.tasks[0].quantity_to_pick, 6);
        let shortfall = alloc.shortfall.expect("shortfall expected");
        assert_eq!(shortfall.sku, "WIDGET");
        assert!(shortfall.reason.contains("Need 10, only 6 reserved"));
    }

    #[test]
    fn missing_reservations_record_named_failure() {
        let pv = Uuid::new_v4();
        let other = Uuid::new_v4();
        let slices = vec![slice(other, "A1-01", 6)];

        let alloc = allocate_line(Uuid::new_v4(), "ORD-9", &demand_of(pv, "WIDGET", 4), &slices, 50);

        assert!(alloc.tasks.is_empty());
        let shortfall = alloc.shortfall.expect("shortfall expected");
        assert!(shortfall.reason.contains("No active reservations"));
        assert!(shortfall.reason.contains("ORD-9"));
    }

    #[test]
    fn capacity_caps_the_take_and_defers_the_rest() {
        let pv = Uuid::new_v4();
        let slices = vec![slice(pv, "A1-01", 10)];

        let alloc = allocate_line(Uuid::new_v4(), "ORD-1", &demand_of(pv, "WIDGET", 10), &slices, 4);

        assert_eq!(alloc.picked_units(), 4);
        let shortfall = alloc.shortfall.expect("cap shortfall expected");
        assert!(shortfall.reason.contains("cap reached"));
    }

    #[test]
    fn zero_capacity_emits_no_tasks() {
        let pv = Uuid::new_v4();
        let slices = vec![slice(pv, "A1-01", 10)];

        let alloc = allocate_line(Uuid::new_v4(), "ORD-1", &demand_of(pv, "WIDGET", 5), &slices, 0);

        assert!(alloc.tasks.is_empty());
        assert!(alloc.shortfall.is_some());
    }
}
