//! Data types handed to the flow solver.

use serde::{Deserialize, Serialize};

/// A named location with planar coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
        }
    }
}

/// Square matrix serialized as a list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix(Vec<Vec<u64>>);

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self(vec![vec![0; n]; n])
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.0[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u64) {
        self.0[row][col] = value;
    }

    /// Iterates over `(row, col, value)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, v)| (i, j, *v)))
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.0
    }
}

/// The solver's input: ordered vertices and their arc matrices.
///
/// `balances` and `fixed_arcs` are reserved for the solver and always
/// written empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub vertices: Vec<Vertex>,
    pub capacities: Matrix,
    pub costs: Matrix,
    pub balances: Vec<Matrix>,
    pub fixed_arcs: Vec<(usize, usize)>,
}
