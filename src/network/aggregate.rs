use crate::network::types::Matrix;

/// Merges a new contribution into an existing arc.
///
/// Capacities add up. The cost becomes the capacity-weighted average of
/// the existing cost and `new_cost`, rounded half to even. When both
/// capacities are zero there is nothing to weigh by and `new_cost` is taken
/// as is.
///
/// Returns `(capacity, cost)` of the merged arc.
pub fn merge_arc(
    existing_capacity: u64,
    existing_cost: u64,
    new_capacity: u64,
    new_cost: u64,
) -> (u64, u64) {
    let capacity = existing_capacity + new_capacity;
    if capacity == 0 {
        return (0, new_cost);
    }

    let weighted = existing_capacity * existing_cost + new_capacity * new_cost;
    let cost = (weighted as f64 / capacity as f64).round_ties_even() as u64;
    (capacity, cost)
}

/// Applies [`merge_arc`] to cell `(i, j)` of the two matrices.
pub(crate) fn merge_into(
    capacities: &mut Matrix,
    costs: &mut Matrix,
    i: usize,
    j: usize,
    capacity: u64,
    cost: u64,
) {
    let (capacity, cost) = merge_arc(capacities.get(i, j), costs.get(i, j), capacity, cost);
    capacities.set(i, j, capacity);
    costs.set(i, j, cost);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_empty_arc() {
        assert_eq!(merge_arc(0, 0, 10, 5), (10, 5));
    }

    #[test]
    fn test_merge_weighted_average() {
        // (10 * 5 + 20 * 10) / 30 = 8.33
        assert_eq!(merge_arc(10, 5, 20, 10), (30, 8));
    }

    #[test]
    fn test_merge_rounds_half_to_even() {
        // (1 * 2 + 1 * 3) / 2 = 2.5
        assert_eq!(merge_arc(1, 2, 1, 3), (2, 2));
        // (1 * 3 + 1 * 4) / 2 = 3.5
        assert_eq!(merge_arc(1, 3, 1, 4), (2, 4));
    }

    #[test]
    fn test_merge_zero_contribution_keeps_cost() {
        assert_eq!(merge_arc(12, 7, 0, 30), (12, 7));
    }

    #[test]
    fn test_merge_zero_denominator() {
        assert_eq!(merge_arc(0, 0, 0, 9), (0, 9));
        assert_eq!(merge_arc(0, 9, 0, 4), (0, 4));
    }

    #[test]
    fn test_merge_replaces_zero_capacity_cost() {
        // a zero-capacity arc carries no weight
        assert_eq!(merge_arc(0, 9, 6, 3), (6, 3));
    }

    #[test]
    fn test_merge_order_independent_when_exact() {
        let (capacity, cost) = merge_arc(0, 0, 10, 6);
        let forward = merge_arc(capacity, cost, 20, 12);

        let (capacity, cost) = merge_arc(0, 0, 20, 12);
        let backward = merge_arc(capacity, cost, 10, 6);

        assert_eq!(forward, (30, 10));
        assert_eq!(forward, backward);
    }
}
