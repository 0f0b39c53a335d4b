//! Multi-stop route optimization (traveling-salesman variants).
//!
//! Three strategies share one contract: the tour starts and ends at the
//! first id in the input, the result carries the best closed-tour length,
//! and the trace records every strictly improving closed tour in discovery
//! order with the final entry achieving the returned length.
//!
//! Brute force and backtracking enumerate the same permutation tree and are
//! exact; backtracking additionally abandons any partial path whose length
//! already meets the incumbent. 2-opt is a local-improvement heuristic and
//! may return a local optimum.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::budget::{BudgetMeter, SearchBudget};
use crate::error::Result;
use crate::geo;
use crate::map::{NodeId, PoiMap};

/// Supported tour-optimization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TourStrategy {
    BruteForce,
    #[default]
    Backtracking,
    TwoOpt,
}

impl fmt::Display for TourStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TourStrategy::BruteForce => "brute-force",
            TourStrategy::Backtracking => "backtracking",
            TourStrategy::TwoOpt => "two-opt",
        };
        f.write_str(value)
    }
}

/// A closed tour: an ordered stop sequence starting and ending at the same
/// id, with its total geodesic length in miles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    pub stops: Vec<NodeId>,
    pub length: f64,
}

/// Result of a tour search: the best length found and the strictly
/// improving tours recorded along the way.
#[derive(Debug, Clone, Serialize)]
pub struct TourSearch {
    pub length: f64,
    pub trace: Vec<Tour>,
}

impl TourSearch {
    /// The tour achieving [`TourSearch::length`], when one exists.
    pub fn best(&self) -> Option<&Tour> {
        self.trace.last()
    }
}

/// Optimize a multi-stop tour with the requested strategy.
pub fn optimize_tour(
    map: &PoiMap,
    ids: &[NodeId],
    strategy: TourStrategy,
    budget: &SearchBudget,
) -> Result<TourSearch> {
    let search = match strategy {
        TourStrategy::BruteForce => solve_brute_force(map, ids, budget),
        TourStrategy::Backtracking => solve_backtracking(map, ids, budget),
        TourStrategy::TwoOpt => solve_two_opt(map, ids, budget),
    }?;
    debug!(
        %strategy,
        stops = ids.len(),
        improving_tours = search.trace.len(),
        length = search.length,
        "optimized tour"
    );
    Ok(search)
}

/// Exhaustive permutation search. Exact, factorial time.
pub fn solve_brute_force(
    map: &PoiMap,
    ids: &[NodeId],
    budget: &SearchBudget,
) -> Result<TourSearch> {
    solve_exhaustive(map, ids, budget, false)
}

/// Permutation search with branch-and-bound pruning: a partial path is
/// abandoned once its length meets or exceeds the best complete tour found
/// so far. Returns the same optimum as [`solve_brute_force`].
pub fn solve_backtracking(
    map: &PoiMap,
    ids: &[NodeId],
    budget: &SearchBudget,
) -> Result<TourSearch> {
    solve_exhaustive(map, ids, budget, true)
}

/// 2-opt local search: starting from the input order, repeatedly reverse the
/// segment between two positions whenever doing so strictly shortens the
/// closed tour, until a full scan finds no improvement.
///
/// Heuristic only; the result is a local optimum. The initial tour seeds the
/// trace so the final trace entry always matches the returned length.
pub fn solve_two_opt(map: &PoiMap, ids: &[NodeId], budget: &SearchBudget) -> Result<TourSearch> {
    if let Some(search) = degenerate_search(ids) {
        return Ok(search);
    }

    let matrix = DistanceMatrix::build(map, ids)?;
    let mut meter = budget.meter();
    let n = ids.len();

    let mut order: Vec<usize> = (0..n).collect();
    let mut best = matrix.tour_cost(&order);
    let mut trace = vec![close_tour(ids, &order, best)];

    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                meter.tick()?;
                let mut candidate = order.clone();
                candidate[i..=j].reverse();
                let cost = matrix.tour_cost(&candidate);
                if cost < best {
                    best = cost;
                    order = candidate;
                    trace.push(close_tour(ids, &order, best));
                    improved = true;
                }
            }
        }
    }

    Ok(TourSearch {
        length: best,
        trace,
    })
}

fn solve_exhaustive(
    map: &PoiMap,
    ids: &[NodeId],
    budget: &SearchBudget,
    prune: bool,
) -> Result<TourSearch> {
    if let Some(search) = degenerate_search(ids) {
        return Ok(search);
    }

    let matrix = DistanceMatrix::build(map, ids)?;
    let mut meter = budget.meter();
    let n = ids.len();

    let mut order = Vec::with_capacity(n + 1);
    order.push(0usize);
    let mut used = vec![false; n];
    used[0] = true;

    let mut search = PermutationSearch {
        matrix: &matrix,
        prune,
        best: f64::INFINITY,
        trace: Vec::new(),
    };
    search.descend(&mut order, &mut used, 0.0, &mut meter)?;

    let trace = search
        .trace
        .into_iter()
        .map(|(closed, length)| close_tour(ids, &closed, length))
        .collect();

    Ok(TourSearch {
        length: search.best,
        trace,
    })
}

struct PermutationSearch<'a> {
    matrix: &'a DistanceMatrix,
    prune: bool,
    best: f64,
    trace: Vec<(Vec<usize>, f64)>,
}

impl PermutationSearch<'_> {
    fn descend(
        &mut self,
        order: &mut Vec<usize>,
        used: &mut [bool],
        partial: f64,
        meter: &mut BudgetMeter,
    ) -> Result<()> {
        meter.tick()?;

        let n = used.len();
        let last = order[order.len() - 1];

        if order.len() == n {
            let cost = partial + self.matrix.get(last, 0);
            if cost < self.best {
                self.best = cost;
                let mut closed = order.clone();
                closed.push(0);
                self.trace.push((closed, cost));
            }
            return Ok(());
        }

        if self.prune && partial >= self.best {
            return Ok(());
        }

        for next in 1..n {
            if used[next] {
                continue;
            }
            used[next] = true;
            order.push(next);
            self.descend(order, used, partial + self.matrix.get(last, next), meter)?;
            order.pop();
            used[next] = false;
        }
        Ok(())
    }
}

/// Pairwise geodesic distances between the tour stops, indexed by position
/// in the input id list.
struct DistanceMatrix {
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    fn build(map: &PoiMap, ids: &[NodeId]) -> Result<Self> {
        let mut distances = vec![vec![0.0; ids.len()]; ids.len()];
        for (i, a) in ids.iter().enumerate() {
            for (j, b) in ids.iter().enumerate().skip(i + 1) {
                let distance = geo::distance(map, a, b)?;
                distances[i][j] = distance;
                distances[j][i] = distance;
            }
        }
        Ok(Self { distances })
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    /// Cost of the closed tour visiting positions in `order` and returning
    /// to the first.
    fn tour_cost(&self, order: &[usize]) -> f64 {
        let mut cost = 0.0;
        for pair in order.windows(2) {
            cost += self.get(pair[0], pair[1]);
        }
        if order.len() > 1 {
            cost += self.get(order[order.len() - 1], order[0]);
        }
        cost
    }
}

fn close_tour(ids: &[NodeId], order: &[usize], length: f64) -> Tour {
    let mut stops: Vec<NodeId> = order.iter().map(|&i| ids[i].clone()).collect();
    if stops.last() != stops.first() {
        stops.push(ids[order[0]].clone());
    }
    Tour { stops, length }
}

/// Tours over zero or one stop need no search: an empty input yields a
/// zero-cost empty trace, a single id a degenerate closed tour of cost 0.
fn degenerate_search(ids: &[NodeId]) -> Option<TourSearch> {
    match ids {
        [] => Some(TourSearch {
            length: 0.0,
            trace: Vec::new(),
        }),
        [only] => Some(TourSearch {
            length: 0.0,
            trace: vec![Tour {
                stops: vec![only.clone(), only.clone()],
                length: 0.0,
            }],
        }),
        _ => None,
    }
}
