use super::*;
use crate::{common::FullOrdFloat, *};
use std::cmp::Reverse;

/// Airports sorted by descending rank. Equal ranks keep insertion order.
pub fn rank_order(page_rank: &[f64]) -> Vec<AirportId> {
    let mut ids: Vec<_> = (0..page_rank.len()).collect();
    ids.sort_by_key(|u| (Reverse(FullOrdFloat(page_rank[*u])), *u));
    ids.into_iter().map(AirportId::from_index).collect()
}

pub fn publish(graph: &mut RouteGraph, outcome: &Outcome) {
    assert_eq!(
        outcome.page_rank.len(),
        graph.airport_size(),
        "outcome does not belong to this graph"
    );
    for (i, u) in rank_order(&outcome.page_rank).into_iter().enumerate() {
        graph.set_rank(u, outcome.page_rank[u.index()], i + 1);
    }
}

/// Publishes only on convergence; an exhausted run leaves `graph` untouched.
pub fn rank_airports(
    graph: &mut RouteGraph,
    config: &Config,
) -> Result<Convergence, PageRankError> {
    let outcome = IteratedPageRank::new(graph, config)?.calc().into_converged()?;
    publish(graph, &outcome);
    Ok(outcome.convergence)
}
