use crate::RouteGraph;

pub trait PageRank {
    type Outcome: PageRankOutcome;

    fn calc(&self) -> Self::Outcome;
}

pub trait PageRankOutcome {
    /// Rank per airport, indexed by [`crate::AirportId::index`].
    fn page_rank(&self) -> &[f64];
    fn debug<'a>(&'a self, graph: &'a RouteGraph) -> impl std::fmt::Debug + 'a;
}
