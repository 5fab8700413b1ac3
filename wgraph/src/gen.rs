//! Seeded random graphs with integer weights in `1..=max_weight`.
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::store::GraphStore;
use crate::Weight;

pub fn vertex_name(i: usize) -> String {
    format!("v{i}")
}

/// `rows x cols` lattice; vertex `r{r}c{c}` links to its right and lower neighbors.
pub fn grid(rows: usize, cols: usize, max_weight: u32, seed: u64) -> Result<GraphStore> {
    let mut rng = StdRng::seed_from_u64(seed);
    let vertices = rows.checked_mul(cols).ok_or_else(|| Error::capacity(usize::MAX))?;
    let mut g = GraphStore::with_capacity(vertices)?;
    let name = |r: usize, c: usize| format!("r{r}c{c}");
    for r in 0..rows {
        for c in 0..cols {
            let u = name(r, c);
            g.add_vertex(&u)?;
            if r + 1 < rows {
                let w = rng.gen_range(1..=max_weight.max(1)) as Weight;
                g.add_edge(&u, &name(r + 1, c), w)?;
            }
            if c + 1 < cols {
                let w = rng.gen_range(1..=max_weight.max(1)) as Weight;
                g.add_edge(&u, &name(r, c + 1), w)?;
            }
        }
    }
    Ok(g)
}

/// G(n, p): each unordered pair `v{i} - v{j}` is an edge with probability `p`.
/// Every vertex is present even when it ends up isolated.
pub fn erdos_renyi(n: usize, p: f64, max_weight: u32, seed: u64) -> Result<GraphStore> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = GraphStore::with_capacity(n)?;
    let names: Vec<String> = (0..n).map(vertex_name).collect();
    for name in &names {
        g.add_vertex(name)?;
    }
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen::<f64>() < p {
                let w = rng.gen_range(1..=max_weight.max(1)) as Weight;
                g.add_edge(&names[u], &names[v], w)?;
            }
        }
    }
    Ok(g)
}

/// A random spanning path over `v0..v{n-1}` plus G(n, p) extras, so the result is connected.
pub fn connected(n: usize, p: f64, max_weight: u32, seed: u64) -> Result<GraphStore> {
    let mut g = erdos_renyi(n, p, max_weight, seed)?;
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    for i in 1..n {
        let w = rng.gen_range(1..=max_weight.max(1)) as Weight;
        g.add_edge(&vertex_name(i - 1), &vertex_name(i), w)?;
    }
    Ok(g)
}
