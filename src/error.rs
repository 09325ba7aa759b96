use thiserror::Error;

/// Record-level failures while building a [`crate::RouteGraph`].
///
/// Both variants are recoverable: the offending record is skipped and the
/// batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate airport code {code}")]
    DuplicateAirport { code: String },

    #[error("unknown airport code {code}")]
    UnknownAirport { code: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageRankError {
    #[error("cannot rank an empty graph")]
    EmptyGraph,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// `max_iterations` ran out before the L1 delta dropped below tolerance.
    #[error("not converged after {iterations} iterations (delta={delta})")]
    NotConverged { iterations: usize, delta: f64 },
}

/// A malformed line in an airport or route file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing field {index}")]
    MissingField { index: usize },

    #[error("field {index} is not an IATA code: {value:?}")]
    BadCode { index: usize, value: String },

    #[error("field {index} is not quoted: {value:?}")]
    Unquoted { index: usize, value: String },
    #[error("line is not valid UTF-8")]
    NotUtf8,
}
