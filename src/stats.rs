use serde::Serialize;

use crate::network::Network;

/// Summary figures of a built network.
#[derive(Debug, Default, Serialize)]
pub struct NetworkStats {
    pub vertex_count: usize,
    /// Ordered pairs with nonzero capacity.
    pub arc_count: usize,
    pub arc_density: f64,
    pub capacity_total: u64,
    pub cost_max: u64,
    pub cost_mean: f64,
}

impl NetworkStats {
    pub fn from_network(network: &Network) -> Self {
        let mut s = NetworkStats {
            vertex_count: network.vertices.len(),
            ..Default::default()
        };

        let mut cost_sum = 0;
        for (i, j, capacity) in network.capacities.cells() {
            if capacity == 0 {
                continue;
            }
            let cost = network.costs.get(i, j);

            s.arc_count += 1;
            s.capacity_total += capacity;
            s.cost_max = s.cost_max.max(cost);
            cost_sum += cost;
        }

        s.arc_density = Self::ratio(s.arc_count, s.vertex_count.pow(2));
        s.cost_mean = Self::ratio(cost_sum as usize, s.arc_count);
        s
    }

    pub fn ratio(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Vertex, build_network};
    use crate::track::{TrackSegment, TrackType};

    #[test]
    fn test_ratio_with_zero_total() {
        assert_eq!(NetworkStats::ratio(10, 0), 0.0);
    }

    #[test]
    fn test_empty_network() {
        let network = build_network(&[], vec![]).unwrap();
        let stats = NetworkStats::from_network(&network);

        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.arc_count, 0);
        assert_eq!(stats.arc_density, 0.0);
    }

    #[test]
    fn test_counts_arcs() {
        let segments = vec![
            create_segment("A", "B", TrackType::Duplex, 4, 10),
            create_segment("B", "C", TrackType::Simplex, 8, 6),
            create_segment("C", "A", TrackType::Simplex, 20, 0),
        ];
        let vertices = vec![
            Vertex::new("A", 0.0, 0.0),
            Vertex::new("B", 1.0, 0.0),
            Vertex::new("C", 0.0, 1.0),
        ];
        let network = build_network(&segments, vertices).unwrap();
        let stats = NetworkStats::from_network(&network);

        assert_eq!(stats.vertex_count, 3);
        assert_eq!(stats.arc_count, 3);
        assert_eq!(stats.arc_density, 3.0 / 9.0);
        assert_eq!(stats.capacity_total, 26);
        assert_eq!(stats.cost_max, 8);
        assert_eq!(stats.cost_mean, 16.0 / 3.0);
    }

    // Helper functions for tests
    fn create_segment(source: &str, sink: &str, track_type: TrackType, cost: u64, capacity: u64) -> TrackSegment {
        TrackSegment {
            id: format!("{source}-{sink}"),
            source: source.to_string(),
            sink: sink.to_string(),
            track_type,
            cost,
            capacity,
        }
    }
}
