use std::collections::HashMap;

use tracing::debug;

use crate::error::BuildError;
use crate::network::aggregate::merge_into;
use crate::network::types::{Matrix, Network, Vertex};
use crate::track::TrackSegment;

/// Builds the solver network from normalized segments and resolved vertices.
///
/// Vertex order is kept as given and defines the matrix indices. Segments
/// are merged in input order: capacities of parallel segments between the
/// same ordered pair add up, and the arc cost is recomputed as their
/// capacity-weighted average. The reverse arc is only touched when the
/// track type gives it a nonzero capacity.
///
/// # Errors
///
/// Fails with [`BuildError::UnknownVertex`] on the first segment whose
/// source or sink is not among `vertices`.
pub fn build_network(segments: &[TrackSegment], vertices: Vec<Vertex>) -> Result<Network, BuildError> {
    let index: HashMap<&str, usize> = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (v.name.as_str(), i))
        .collect();

    let n = vertices.len();
    let mut capacities = Matrix::zeros(n);
    let mut costs = Matrix::zeros(n);

    for segment in segments {
        let i = lookup(&index, segment, &segment.source)?;
        let j = lookup(&index, segment, &segment.sink)?;

        let (forward, reverse) = segment.track_type.split_capacity(segment.capacity);

        merge_into(&mut capacities, &mut costs, i, j, forward, segment.cost);
        if reverse > 0 {
            merge_into(&mut capacities, &mut costs, j, i, reverse, segment.cost);
        }

        debug!(
            id = %segment.id,
            from = i,
            to = j,
            forward,
            reverse,
            "Segment merged"
        );
    }

    Ok(Network {
        vertices,
        capacities,
        costs,
        balances: Vec::new(),
        fixed_arcs: Vec::new(),
    })
}

fn lookup(index: &HashMap<&str, usize>, segment: &TrackSegment, name: &str) -> Result<usize, BuildError> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| BuildError::UnknownVertex {
            segment: segment.id.clone(),
            from: segment.source.clone(),
            to: segment.sink.clone(),
            name: name.to_string(),
        })
}
