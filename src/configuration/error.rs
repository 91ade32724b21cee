//! Errors raised while loading or validating a scenario
//!
//! The physics step itself never fails; everything that can go wrong is
//! caught here, before the first tick.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    /// A vector field did not have exactly two components
    VectorLength { body: usize, field: &'static str, len: usize },
    NonFinite { body: usize, field: &'static str },
    NonPositive { body: usize, field: &'static str, value: f64 },
    /// Two bodies start at the same position, gravity between them is undefined
    CoincidentBodies { first: usize, second: usize },
    UnknownColor { body: usize, name: String },
    InvalidParameter { name: &'static str, value: f64 },
    TriangleVertices([usize; 3]),
    EmptyWindow { start: u64, end: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read scenario: {}", err),
            Self::Yaml(err) => write!(f, "failed to parse scenario: {}", err),
            Self::VectorLength { body, field, len } => {
                write!(f, "body {}: `{}` must have 2 components, found {}", body, field, len)
            }
            Self::NonFinite { body, field } => write!(f, "body {}: `{}` is not finite", body, field),
            Self::NonPositive { body, field, value } => {
                write!(f, "body {}: `{}` must be positive, found {}", body, field, value)
            }
            Self::CoincidentBodies { first, second } => {
                write!(f, "bodies {} and {} start at the same position", first, second)
            }
            Self::UnknownColor { body, name } => write!(f, "body {}: unknown color `{}`", body, name),
            Self::InvalidParameter { name, value } => write!(f, "parameter `{}` is invalid: {}", name, value),
            Self::TriangleVertices(v) => {
                write!(f, "triangle vertices must be distinct, found {:?}", v)
            }
            Self::EmptyWindow { start, end } => {
                write!(f, "triangle window ({}, {}) contains no tick", start, end)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Yaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}
