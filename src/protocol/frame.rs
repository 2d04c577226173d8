use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    Intersect,
    /// Response-only: the request could not be read.
    Error,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Intersect => "intersect",
            Operation::Error => "error",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Operation::Search),
            "intersect" => Ok(Operation::Intersect),
            "error" => Ok(Operation::Error),
            other => Err(ProtocolError::UnknownOperation(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Frame must have the form <requestId>|<operation>|<payload>")]
    MissingSeparator,

    #[error("Invalid request id: {0:?}")]
    InvalidRequestId(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation {0} cannot be sent as a request")]
    NotARequest(Operation),

    #[error("Invalid {operation} payload: {source}")]
    InvalidPayload {
        operation: Operation,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One `<requestId>|<operation>|<payload>` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    request_id: String,
    operation: Operation,
    payload: String,
}

impl Frame {
    pub fn new(
        request_id: impl Into<String>,
        operation: Operation,
        payload: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let request_id = request_id.into();
        if !is_valid_request_id(&request_id) {
            return Err(ProtocolError::InvalidRequestId(request_id));
        }

        Ok(Self {
            request_id,
            operation,
            payload: payload.into(),
        })
    }

    /// Parse a line. Only the first two `|` split; the payload may contain
    /// more.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(3, '|');

        let (Some(request_id), Some(operation), Some(payload)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ProtocolError::MissingSeparator);
        };

        Self::new(request_id, operation.parse()?, payload)
    }

    /// Best-effort request id of a line that failed to parse.
    pub fn request_id_of(line: &str) -> Option<&str> {
        line.split_once('|')
            .map(|(request_id, _)| request_id)
            .filter(|request_id| is_valid_request_id(request_id))
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.request_id, self.operation, self.payload)
    }
}

fn is_valid_request_id(request_id: &str) -> bool {
    !request_id.is_empty() && !request_id.contains(['|', '\n', '\r'])
}
