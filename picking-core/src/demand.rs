//! Demand resolution: how many units of each line an order actually needs
//! picked right now.

use uuid::Uuid;

use crate::{BackOrderLine, OrderLine};

/// Resolved demand for one order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDemand {
    pub product_variant_id: Uuid,
    pub sku: String,
    pub quantity: i32,
}

/// Resolves per-line demand for one order.
///
/// The mode switch is per order, not per line: an order with any active back
/// orders is fulfilled purely against them — lines without a matching back
/// order (or whose back order is already fulfilled) were covered by the
/// original pick and are skipped outright, with no shortfall recorded.
pub fn resolve_demand(lines: &[OrderLine], back_orders: &[BackOrderLine]) -> Vec<LineDemand> {
    if back_orders.is_empty() {
        return lines
            .iter()
            .filter(|line| line.quantity > 0)
            .map(|line| LineDemand {
                product_variant_id: line.product_variant_id,
                sku: line.sku.clone(),
                quantity: line.quantity,
            })
            .collect();
    }

    lines
        .iter()
        .filter_map(|line| {
            let back_order = back_orders
                .iter()
                .find(|bo| bo.product_variant_id == line.product_variant_id)?;
            let outstanding = back_order.outstanding();
            if outstanding <= 0 {
                return None;
            }
            Some(LineDemand {
                product_variant_id: line.product_variant_id,
                sku: line.sku.clone(),
                quantity: outstanding,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pv: Uuid, sku: &str, qty: i32) -> OrderLine {
        OrderLine {
            product_variant_id: pv,
            sku: sku.to_string(),
            quantity: qty,
        }
    }

    #[test]
    fn normal_order_uses_ordered_quantities() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let demand = resolve_demand(&[line(a, "WIDGET", 10), line(b, "GADGET", 3)], &[]);

        assert_eq!(demand.len(), 2);
        assert_eq!(demand[0].sku, "WIDGET");
        assert_eq!(demand[0].quantity, 10);
        assert_eq!(demand[1].quantity, 3);
    }

    #[test]
    fn zero_quantity_lines_are_dropped() {
        let a = Uuid::new_v4();
        let demand = resolve_demand(&[line(a, "WIDGET", 0)], &[]);
        assert!(demand.is_empty());
    }

    #[test]
    fn back_order_mode_only_picks_outstanding_lines() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let back_orders = vec![BackOrderLine {
            product_variant_id: a,
            quantity_back_ordered: 5,
            quantity_fulfilled: 2,
        }];
        let demand = resolve_demand(
            &[line(a, "WIDGET", 10), line(b, "GADGET", 3)],
            &back_orders,
        );

        // GADGET has no back order, so it was already fulfilled and is skipped.
        assert_eq!(demand.len(), 1);
        assert_eq!(demand[0].sku, "WIDGET");
        assert_eq!(demand[0].quantity, 3);
    }

    #[test]
    fn fully_fulfilled_back_order_yields_no_demand() {
        let a = Uuid::new_v4();
        let back_orders = vec![BackOrderLine {
            product_variant_id: a,
            quantity_back_ordered: 5,
            quantity_fulfilled: 5,
        }];
        let demand = resolve_demand(&[line(a, "WIDGET", 5)], &back_orders);
        assert!(demand.is_empty());
    }
}
