use geo::Point;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Malformed edge at {point:?}: child point and distance to child must both be set or both be absent"
    )]
    MalformedEdge { point: Point<f64> },
    #[error("Inserting node at {point:?} would create a cycle in the drainage network")]
    CycleDetected { point: Point<f64> },
    #[error("Unknown road type: {0}")]
    UnknownRoadType(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
}
