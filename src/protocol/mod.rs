//! Line protocol between a caller and the worker pool.
//!
//! Each message is one line of the form `<requestId>|<operation>|<json>`.
//! Responses reuse the request id and operation; unreadable requests are
//! answered with an `error` frame.

pub mod frame;
pub mod pool;
pub mod server;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::dataset::DatasetCatalog;
use crate::intersect::intersect;
use crate::search::search;
use crate::types::{IntersectOptions, IntersectResult, SearchOptions, SearchOutcome, SearchResult};
pub use frame::{Frame, Operation, ProtocolError};
pub use pool::{Envelope, Pending, PoolError, WorkerPool};
pub use server::{serve, ServeStats};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Search(SearchOptions),
    Intersect(IntersectOptions),
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Search(_) => Operation::Search,
            Request::Intersect(_) => Operation::Intersect,
        }
    }

    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        let operation = frame.operation();
        let invalid = |source: serde_json::Error| ProtocolError::InvalidPayload { operation, source };

        match operation {
            Operation::Search => serde_json::from_str(frame.payload())
                .map(Request::Search)
                .map_err(invalid),
            Operation::Intersect => serde_json::from_str(frame.payload())
                .map(Request::Intersect)
                .map_err(invalid),
            Operation::Error => Err(ProtocolError::NotARequest(operation)),
        }
    }

    pub fn to_frame(&self, request_id: &str) -> Result<Frame, ProtocolError> {
        let payload = match self {
            Request::Search(options) => serde_json::to_string(options)?,
            Request::Intersect(options) => serde_json::to_string(options)?,
        };
        Frame::new(request_id, self.operation(), payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Search(SearchResult),
    Intersect(IntersectResult),
    Error(ErrorBody),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(ErrorBody {
            message: message.into(),
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            Response::Search(_) => Operation::Search,
            Response::Intersect(_) => Operation::Intersect,
            Response::Error(_) => Operation::Error,
        }
    }

    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        let operation = frame.operation();
        let invalid = |source: serde_json::Error| ProtocolError::InvalidPayload { operation, source };

        match operation {
            Operation::Search => serde_json::from_str(frame.payload())
                .map(Response::Search)
                .map_err(invalid),
            Operation::Intersect => serde_json::from_str(frame.payload())
                .map(Response::Intersect)
                .map_err(invalid),
            Operation::Error => serde_json::from_str(frame.payload())
                .map(Response::Error)
                .map_err(invalid),
        }
    }

    pub fn to_frame(&self, request_id: &str) -> Result<Frame, ProtocolError> {
        let payload = match self {
            Response::Search(result) => serde_json::to_string(result)?,
            Response::Intersect(result) => serde_json::to_string(result)?,
            Response::Error(body) => serde_json::to_string(body)?,
        };
        Frame::new(request_id, self.operation(), payload)
    }
}

/// Answer one request against the catalog.
///
/// An unknown dataset version is not a protocol error: searches report
/// `invalid` with the request seed unchanged, intersections come back
/// empty.
pub fn handle(catalog: &DatasetCatalog, request: Request, config: &EngineConfig) -> Response {
    match request {
        Request::Search(options) => {
            let Some(dataset) = catalog.get(&options.dataset_version) else {
                warn!(version = %options.dataset_version, "search against unknown dataset");
                return Response::Search(SearchResult::empty(
                    SearchOutcome::Invalid,
                    options.rng_seed,
                ));
            };
            Response::Search(search(
                &**dataset,
                &options,
                config.max_outer_iterations,
            ))
        }
        Request::Intersect(options) => {
            let entities = match catalog.get(&options.dataset_version) {
                Some(dataset) => intersect(&**dataset, &options.constraints),
                None => {
                    warn!(version = %options.dataset_version, "intersect against unknown dataset");
                    Vec::new()
                }
            };
            Response::Intersect(IntersectResult {
                constraints: options.constraints,
                entities,
            })
        }
    }
}

/// Answer one raw line synchronously, producing the response line.
pub fn handle_line(catalog: &DatasetCatalog, line: &str, config: &EngineConfig) -> String {
    let (request_id, response) = match decode_request(line) {
        Ok((request_id, request)) => (request_id, handle(catalog, request, config)),
        Err((request_id, error)) => (request_id, Response::error(error.to_string())),
    };
    encode_response(&request_id, &response)
}

/// Parse a request line. On failure, returns whatever request id could be
/// salvaged along with the error.
pub(crate) fn decode_request(line: &str) -> Result<(String, Request), (String, ProtocolError)> {
    let frame = Frame::parse(line).map_err(|error| (salvage_request_id(line), error))?;
    let request = Request::from_frame(&frame)
        .map_err(|error| (frame.request_id().to_string(), error))?;
    Ok((frame.request_id().to_string(), request))
}

pub(crate) fn encode_response(request_id: &str, response: &Response) -> String {
    // Error frames may carry an empty id, which `Frame` refuses.
    if let Response::Error(body) = response {
        return error_line(request_id, &body.message);
    }

    match response.to_frame(request_id) {
        Ok(frame) => frame.encode(),
        Err(error) => {
            warn!(request_id, %error, "failed to encode response");
            error_line(request_id, &error.to_string())
        }
    }
}

fn salvage_request_id(line: &str) -> String {
    Frame::request_id_of(line).unwrap_or_default().to_string()
}

fn error_line(request_id: &str, message: &str) -> String {
    let body = serde_json::json!({ "message": message });
    format!("{}|{}|{}", request_id, Operation::Error, body)
}
