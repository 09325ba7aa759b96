use crate::GraphError;
use algograph::graph::{directed::TreeBackedGraph, *};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AirportId(usize);

impl AirportId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Airport {
    code: String,
    name: String,
    vertex: VertexId,
    out_weight: u64,
    routes: Vec<RouteId>,
    // destination -> route, for O(1) dedup of repeated route records
    route_index: HashMap<AirportId, RouteId, ahash::RandomState>,
    rank: f64,
    rank_position: usize,
}

impl Airport {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == summed weight of outgoing routes
    pub fn out_weight(&self) -> u64 {
        self.out_weight
    }

    pub fn is_sink(&self) -> bool {
        self.out_weight == 0
    }

    pub fn rank(&self) -> f64 {
        self.rank
    }

    /// 1-based, `0` until ranks are published.
    pub fn rank_position(&self) -> usize {
        self.rank_position
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    origin: AirportId,
    destination: AirportId,
    weight: u64,
}

impl Route {
    pub fn origin(&self) -> AirportId {
        self.origin
    }

    pub fn destination(&self) -> AirportId {
        self.destination
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedAirport<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub rank_position: usize,
    pub rank: f64,
    pub inbound_routes: usize,
}

/// Airports and deduplicated, weighted routes between them.
///
/// Airports and routes are only ever appended. The directed topology is
/// mirrored into an `algograph` graph, which answers in-edge queries.
#[derive(Clone)]
pub struct RouteGraph {
    topology: TreeBackedGraph,
    airports: Vec<Airport>,
    routes: Vec<Route>,
    by_code: HashMap<String, AirportId, ahash::RandomState>,
}

impl Default for RouteGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGraph {
    pub fn new() -> Self {
        Self {
            topology: TreeBackedGraph::new(),
            airports: vec![],
            routes: vec![],
            by_code: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// The first registration of a code wins.
    pub fn add_airport(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<AirportId, GraphError> {
        let code = code.into();
        if self.by_code.contains_key(&code) {
            return Err(GraphError::DuplicateAirport { code });
        }
        let id = AirportId(self.airports.len());
        let vertex = self.topology.add_vertex();
        self.by_code.insert(code.clone(), id);
        self.airports.push(Airport {
            code,
            name: name.into(),
            vertex,
            out_weight: 0,
            routes: vec![],
            route_index: HashMap::with_hasher(ahash::RandomState::new()),
            rank: 0.0,
            rank_position: 0,
        });
        Ok(id)
    }

    /// A repeated (origin, destination) pair strengthens the existing route.
    /// Either way the origin's out-weight grows by one.
    pub fn add_route(&mut self, origin: &str, destination: &str) -> Result<RouteId, GraphError> {
        let origin = self.require(origin)?;
        let destination = self.require(destination)?;

        if let Some(&id) = self.airports[origin.0].route_index.get(&destination) {
            self.routes[id.0].weight += 1;
            self.airports[origin.0].out_weight += 1;
            return Ok(id);
        }

        let id = RouteId(self.routes.len());
        self.topology.add_edge(
            self.airports[origin.0].vertex,
            self.airports[destination.0].vertex,
        );
        self.routes.push(Route {
            origin,
            destination,
            weight: 1,
        });
        let from = &mut self.airports[origin.0];
        from.routes.push(id);
        from.route_index.insert(destination, id);
        from.out_weight += 1;
        Ok(id)
    }

    fn require(&self, code: &str) -> Result<AirportId, GraphError> {
        self.find(code).ok_or_else(|| GraphError::UnknownAirport {
            code: code.to_string(),
        })
    }

    pub fn find(&self, code: &str) -> Option<AirportId> {
        self.by_code.get(code).copied()
    }

    pub fn airport_size(&self) -> usize {
        self.airports.len()
    }

    pub fn route_size(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn airport(&self, id: AirportId) -> &Airport {
        &self.airports[id.0]
    }

    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.0]
    }

    pub fn iter_airports(&self) -> impl Iterator<Item = (AirportId, &Airport)> + '_ {
        self.airports
            .iter()
            .enumerate()
            .map(|(i, a)| (AirportId(i), a))
    }

    pub fn iter_routes(&self) -> impl Iterator<Item = (RouteId, &Route)> + '_ {
        self.routes.iter().enumerate().map(|(i, r)| (RouteId(i), r))
    }

    // in the order they were first seen
    pub fn routes_from(&self, id: AirportId) -> impl Iterator<Item = &Route> + '_ {
        self.airports[id.0]
            .routes
            .iter()
            .map(|r| &self.routes[r.0])
    }

    pub fn find_route(&self, origin: &str, destination: &str) -> Option<&Route> {
        let origin = self.find(origin)?;
        let destination = self.find(destination)?;
        self.airports[origin.0]
            .route_index
            .get(&destination)
            .map(|r| &self.routes[r.0])
    }

    /// Distinct airports with a route into `id`.
    pub fn inbound_route_count(&self, id: AirportId) -> usize {
        self.topology.in_edges(&self.airports[id.0].vertex).count()
    }

    pub(crate) fn set_rank(&mut self, id: AirportId, rank: f64, rank_position: usize) {
        let airport = &mut self.airports[id.0];
        airport.rank = rank;
        airport.rank_position = rank_position;
    }

    /// Unranked airports (position `0`) come first, in insertion order.
    pub fn ranked(&self) -> Vec<RankedAirport<'_>> {
        let mut res: Vec<_> = self
            .airports
            .iter()
            .map(|a| RankedAirport {
                code: &a.code,
                name: &a.name,
                rank_position: a.rank_position,
                rank: a.rank,
                inbound_routes: self.topology.in_edges(&a.vertex).count(),
            })
            .collect();
        res.sort_by_key(|a| a.rank_position);
        res
    }
}
