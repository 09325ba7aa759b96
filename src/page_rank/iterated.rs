use super::*;
use crate::*;
use tracing::{info, warn};

/// Damped power iteration over a [`RouteGraph`].
///
/// Rank held by sinks (airports without outgoing routes) is spread evenly
/// over all airports every iteration, so the total rank stays at 1.
pub struct IteratedPageRank<'a> {
    graph: &'a RouteGraph,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
    sinks: Vec<usize>,
    transitions: Vec<Transition>,
}

struct Transition {
    source: usize,
    out_weight: f64,
    targets: Vec<(usize, f64)>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), PageRankError> {
        let damping = self.damping;
        if !(damping > 0.0 && damping < 1.0) {
            return Err(invalid(format!("damping={damping}, must be in (0, 1)")));
        }
        let tolerance = self.tolerance;
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(invalid(format!("tolerance={tolerance}, must be >= 0")));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations=0, must be > 0".to_string()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> PageRankError {
    PageRankError::InvalidConfig { reason }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub converged: bool,
    /// 1-based number of the last completed iteration.
    pub iterations: usize,
    /// L1 distance between the last two distributions.
    pub final_delta: f64,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub page_rank: Vec<f64>,
    pub convergence: Convergence,
}

impl Outcome {
    pub fn converged(&self) -> bool {
        self.convergence.converged
    }

    pub fn into_converged(self) -> Result<Self, PageRankError> {
        if self.converged() {
            Ok(self)
        } else {
            Err(PageRankError::NotConverged {
                iterations: self.convergence.iterations,
                delta: self.convergence.final_delta,
            })
        }
    }

    /// Like [`Outcome::into_converged`], but lets an exhausted run through
    /// with a warning when `allow_unconverged` is set.
    pub fn accept(self, allow_unconverged: bool) -> Result<Self, PageRankError> {
        if allow_unconverged && !self.converged() {
            warn!("Keeping an unconverged ranking");
            return Ok(self);
        }
        self.into_converged()
    }
}

impl<'a> IteratedPageRank<'a> {
    pub fn new(g: &'a RouteGraph, config: &Config) -> Result<Self, PageRankError> {
        config.validate()?;
        if g.is_empty() {
            return Err(PageRankError::EmptyGraph);
        }
        let mut sinks = vec![];
        let mut transitions = vec![];
        for (u, airport) in g.iter_airports() {
            if airport.is_sink() {
                sinks.push(u.index());
                continue;
            }
            let targets = g
                .routes_from(u)
                .map(|r| (r.destination().index(), r.weight() as f64))
                .collect();
            transitions.push(Transition {
                source: u.index(),
                out_weight: airport.out_weight() as f64,
                targets,
            });
        }
        Ok(Self {
            graph: g,
            damping: config.damping,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            sinks,
            transitions,
        })
    }
}

impl PageRank for IteratedPageRank<'_> {
    type Outcome = self::Outcome;

    fn calc(&self) -> Self::Outcome {
        let damping = self.damping;
        let n = self.graph.airport_size() as f64;
        let constant = (1.0 - damping) / n;

        let mut p = vec![1.0 / n; self.graph.airport_size()];
        let mut q = vec![0.0; self.graph.airport_size()];
        let mut convergence = Convergence {
            converged: false,
            iterations: self.max_iterations,
            final_delta: f64::INFINITY,
        };
        for iteration in 1..=self.max_iterations {
            let sink_sum: f64 = self.sinks.iter().map(|u| p[*u]).sum();
            q.fill(constant + damping * sink_sum / n);

            for t in self.transitions.iter() {
                let share = damping * p[t.source] / t.out_weight;
                for (v, w) in t.targets.iter() {
                    q[*v] += share * w;
                }
            }

            let delta = norm_1(&q, &p);
            std::mem::swap(&mut p, &mut q);
            if delta < self.tolerance {
                convergence = Convergence {
                    converged: true,
                    iterations: iteration,
                    final_delta: delta,
                };
                break;
            }
            convergence.final_delta = delta;
        }

        if convergence.converged {
            info!("Converged after {} iterations.", convergence.iterations);
        } else {
            warn!(
                "Not converged after {} iterations, delta={}",
                convergence.iterations, convergence.final_delta
            );
        }
        Outcome {
            page_rank: p,
            convergence,
        }
    }
}

impl PageRankOutcome for self::Outcome {
    fn page_rank(&self) -> &[f64] {
        &self.page_rank
    }

    fn debug<'a>(&'a self, graph: &'a RouteGraph) -> impl std::fmt::Debug + 'a {
        OutcomeDebug {
            graph,
            outcome: self,
        }
    }
}

pub struct OutcomeDebug<'a> {
    graph: &'a RouteGraph,
    outcome: &'a self::Outcome,
}

impl std::fmt::Debug for OutcomeDebug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self.outcome.convergence)?;
        for (u, airport) in self.graph.iter_airports() {
            let p = self.outcome.page_rank[u.index()];
            writeln!(f, "{}: {p:?}", airport.code())?;
        }
        Ok(())
    }
}
