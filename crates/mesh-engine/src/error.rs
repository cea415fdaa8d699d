//! Error types for mesh-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An availability string could not be parsed into a day and two times.
    #[error("Malformed availability range: {0}")]
    MalformedRange(String),

    /// A day or time falls outside the configured grid boundary.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A candidate references an identity missing from the participant set.
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A declaration failed to normalize. Carries the participant identity and
    /// the raw range string; the underlying kind is the error source.
    #[error("Invalid availability for {participant}: '{range}'")]
    Declaration {
        participant: String,
        range: String,
        source: Box<MeshError>,
    },
}

impl MeshError {
    /// The underlying error kind, looking through any [`MeshError::Declaration`]
    /// context.
    pub fn root(&self) -> &MeshError {
        match self {
            MeshError::Declaration { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_looks_through_declaration_context() {
        let err = MeshError::Declaration {
            participant: "a@example.com".to_string(),
            range: "Monday 9am".to_string(),
            source: Box::new(MeshError::MalformedRange("bad".to_string())),
        };
        assert_eq!(err.root(), &MeshError::MalformedRange("bad".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid availability for a@example.com: 'Monday 9am'"
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Malformed availability range: bad")
        );
    }
}
