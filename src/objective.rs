// src/objective.rs

//! Potential-energy objective for graph layout: every node pair repels with an
//! inverse-square-law force, every link pulls its endpoints toward a rest offset
//! like a spring. The first node is pinned at the origin, which removes the
//! translational degree of freedom; the free coordinate vector therefore has
//! exactly 2*(N-1) entries for N nodes.

use nalgebra::Vector2;

use crate::minimize::Objective;

/// Spring constraint between two nodes: the layout is happiest when
/// `pos[to] - pos[from]` equals `rest`.
#[derive(Debug, Clone)]
pub struct LinkInfo {
    pub from: usize,
    pub to: usize,
    pub rest: Vector2<f64>,
    pub stiffness: f64,
}

impl LinkInfo {
    /// A plain attraction link: zero rest offset, unit stiffness.
    pub fn attraction(from: usize, to: usize) -> Self {
        LinkInfo {
            from,
            to,
            rest: Vector2::zeros(),
            stiffness: 1.0,
        }
    }
}

/// Charged-particles-with-springs potential over 2D node positions.
pub struct GraphObjective {
    node_count: usize,
    links: Vec<LinkInfo>,
    repulsion: f64,
    /// Floor added to squared distances so coincident nodes stay finite.
    epsilon: f64,
}

const DEFAULT_REPULSION: f64 = 0.01;
const DISTANCE_EPSILON: f64 = 1e-9;

impl GraphObjective {
    pub fn new(node_count: usize, links: Vec<LinkInfo>) -> Self {
        GraphObjective {
            node_count,
            links,
            repulsion: DEFAULT_REPULSION,
            epsilon: DISTANCE_EPSILON,
        }
    }

    pub fn with_repulsion(mut self, repulsion: f64) -> Self {
        self.repulsion = repulsion;
        self
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn links(&self) -> &[LinkInfo] {
        &self.links
    }

    /// Position of node `i` given the free coordinate vector. Node 0 is the pinned
    /// one and always sits at the origin.
    fn position(&self, x: &[f64], i: usize) -> Vector2<f64> {
        if i == 0 {
            Vector2::zeros()
        } else {
            Vector2::new(x[2 * (i - 1)], x[2 * (i - 1) + 1])
        }
    }

    /// Accumulate a gradient contribution into node `i`'s slot, skipping the pinned
    /// node (its coordinates are not free).
    fn accumulate(&self, grad: &mut [f64], i: usize, g: Vector2<f64>) {
        if i > 0 {
            grad[2 * (i - 1)] += g.x;
            grad[2 * (i - 1) + 1] += g.y;
        }
    }
}

impl Objective for GraphObjective {
    fn dim(&self) -> usize {
        2 * self.node_count.saturating_sub(1)
    }

    fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        debug_assert_eq!(x.len(), self.dim());
        debug_assert_eq!(grad.len(), self.dim());

        for g in grad.iter_mut() {
            *g = 0.0;
        }
        let mut energy = 0.0;

        // Pairwise repulsion: potential k/d, force k/d^2 pushing apart.
        for i in 0..self.node_count {
            let pi = self.position(x, i);
            for j in (i + 1)..self.node_count {
                let pj = self.position(x, j);
                let delta = pi - pj;
                let dist = (delta.norm_squared() + self.epsilon).sqrt();
                energy += self.repulsion / dist;
                let g = delta * (-self.repulsion / (dist * dist * dist));
                self.accumulate(grad, i, g);
                self.accumulate(grad, j, -g);
            }
        }

        // Springs: quadratic penalty on the deviation from the rest offset.
        for link in &self.links {
            let e = self.position(x, link.to) - self.position(x, link.from) - link.rest;
            energy += 0.5 * link.stiffness * e.norm_squared();
            self.accumulate(grad, link.to, e * link.stiffness);
            self.accumulate(grad, link.from, -e * link.stiffness);
        }

        energy
    }
}

/// Expand a free coordinate vector back into per-node positions, pinned node
/// included.
pub fn node_positions(free: &[f64]) -> Vec<Vector2<f64>> {
    let mut out = Vec::with_capacity(free.len() / 2 + 1);
    out.push(Vector2::zeros());
    for pair in free.chunks_exact(2) {
        out.push(Vector2::new(pair[0], pair[1]));
    }
    out
}
