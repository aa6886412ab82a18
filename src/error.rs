//! Client-level error types shared across the gateway, session, and API helpers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); no response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Server answered with a non-success status; the payload is forwarded verbatim.
	#[error("Request to `{path}` failed with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the server.
		status: u16,
		/// API path of the request that failed.
		path: String,
		/// Raw response body, usually a DRF error document.
		body: String,
	},
	/// Server answered successfully but the payload did not match the expected shape.
	#[error("Response from `{path}` could not be decoded.")]
	Decode {
		/// API path of the request whose payload failed to decode.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Access-token renewal failed; the session has been torn down.
	#[error("Access token renewal failed.")]
	RenewalFailed {
		/// Failure reported by the renewal call itself.
		#[source]
		source: Arc<Error>,
	},
	/// Login or registration succeeded at the transport level without returning a user.
	#[error("Authentication response did not include a user record.")]
	MissingUser,
	/// Caller-supplied input failed a presence or type check.
	#[error("Invalid {field}: {reason}.")]
	InvalidInput {
		/// Name of the rejected input.
		field: &'static str,
		/// Why the input was rejected.
		reason: &'static str,
	},
}
impl Error {
	/// Returns the HTTP status carried by this error, looking through renewal failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::RenewalFailed { source } => source.status(),
			_ => None,
		}
	}

	/// Returns `true` when the server rejected the request as unauthorized (HTTP 401).
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Status { status: 401, .. })
	}

	/// Returns `true` when the session was torn down by a failed renewal.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::RenewalFailed { .. })
	}

	/// Extracts a human-readable message from a server error payload.
	///
	/// DRF views answer with `{"message": ..}`, `{"error": ..}`, or `{"detail": ..}`; field
	/// validation errors and unknown shapes fall back to the raw body.
	pub fn server_message(&self) -> Option<String> {
		match self {
			Self::Status { body, .. } => {
				if body.trim().is_empty() {
					return None;
				}

				let message = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
					["message", "error", "detail"]
						.iter()
						.find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_owned))
				});

				Some(message.unwrap_or_else(|| body.clone()))
			},
			Self::RenewalFailed { source } => source.server_message(),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Descriptor validation failed.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::DescriptorError),
	/// An API path could not be resolved against the base URL.
	#[error("Path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[from] serde_json::Error),
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
