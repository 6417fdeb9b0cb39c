use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Start or end node of a query is not part of the network
    #[error("node {0} is not part of the road network")]
    InvalidEndpoint(String),
    /// A path step that is not an edge of the network
    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: String, to: String },
    /// The network only allows one edge per ordered pair of nodes
    #[error("edge from {from} to {to} already exists")]
    DuplicateEdge { from: String, to: String },
    #[error("edge from {from} to {to} has invalid length {length}")]
    InvalidLength { from: String, to: String, length: f64 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Cache not found")]
    CacheNotFound,
    #[error("Cannot read file")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    BincodeError(#[from] bincode::Error),
}
