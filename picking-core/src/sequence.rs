//! Walk-order sequencing. Zones come from a naming convention, not geometry:
//! the prefix of the location name before its first `-`.

use crate::PickTask;

/// Zone of a location name: the part before the first `-`, or `MAIN` when
/// the name carries no zone prefix.
pub fn zone_of(location: &str) -> &str {
    match location.split_once('-') {
        Some((zone, _)) if !zone.is_empty() => zone,
        _ => "MAIN",
    }
}

/// Orders tasks for walking: zone ascending, then location name ascending.
/// The sort is stable, so equal keys keep their allocation order and
/// re-running on the same input yields the same sequence.
pub fn sequence_tasks(mut tasks: Vec<PickTask>) -> Vec<PickTask> {
    tasks.sort_by(|a, b| a.zone.cmp(&b.zone).then_with(|| a.location.cmp(&b.location)));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn task(location: &str, sku: &str) -> PickTask {
        PickTask {
            order_id: Uuid::new_v4(),
            order_number: "ORD-1".to_string(),
            product_variant_id: Uuid::new_v4(),
            sku: sku.to_string(),
            location: location.to_string(),
            zone: zone_of(location).to_string(),
            quantity_to_pick: 1,
            reservation_id: Uuid::new_v4(),
            reservation_quantity: 1,
        }
    }

    #[test]
    fn zone_is_prefix_before_first_dash() {
        assert_eq!(zone_of("A1-01"), "A1");
        assert_eq!(zone_of("B2-07-HIGH"), "B2");
        assert_eq!(zone_of("RECEIVING"), "MAIN");
        assert_eq!(zone_of("-01"), "MAIN");
        assert_eq!(zone_of(""), "MAIN");
    }

    #[test]
    fn tasks_sort_by_zone_then_location() {
        let sorted = sequence_tasks(vec![
            task("B2-01", "A"),
            task("A1-05", "B"),
            task("A1-02", "C"),
            task("STAGING", "D"),
        ]);

        let locations: Vec<&str> = sorted.iter().map(|t| t.location.as_str()).collect();
        assert_eq!(locations, vec!["A1-02", "A1-05", "B2-01", "STAGING"]);
    }

    #[test]
    fn ordering_is_stable_for_equal_locations() {
        let input = vec![task("A1-01", "FIRST"), task("A1-01", "SECOND")];
        let sorted = sequence_tasks(input.clone());

        assert_eq!(sorted[0].sku, "FIRST");
        assert_eq!(sorted[1].sku, "SECOND");

        // Re-running yields an identical order.
        let again = sequence_tasks(sorted.clone());
        let a: Vec<&str> = sorted.iter().map(|t| t.sku.as_str()).collect();
        let b: Vec<&str> = again.iter().map(|t| t.sku.as_str()).collect();
        assert_eq!(a, b);
    }
}
