//! Client-level error types shared across the signer, codec, and request pipeline.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request signing failure; fatal, never retried.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Request body serialization failure.
	#[error(transparent)]
	Encode(#[from] EncodeError),
	/// Response body could not be decoded into the requested type.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Remote endpoint answered with a non-2xx status.
	///
	/// Surfacing the status lets callers tell "not found" apart from transport
	/// success with an unexpected status instead of collapsing both into an absent
	/// result.
	#[error("Endpoint `{endpoint}` answered with status {status}.")]
	Status {
		/// HTTP status code returned by the marketplace.
		status: u16,
		/// Endpoint path that produced the response.
		endpoint: String,
	},
}

/// Configuration and validation failures raised while building the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Host base URL was never supplied.
	#[error("Missing host base URL.")]
	MissingHost,
	/// Host base URL cannot be parsed.
	#[error("Host base URL is invalid.")]
	InvalidHost {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Host base URL uses a scheme other than http/https.
	#[error("Host base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Host URL that failed validation.
		url: String,
	},
	/// Request timeout must be a positive duration.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Signature construction failures.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum SigningError {
	/// Configured signature method is not implemented.
	#[error("Unsupported OAuth signature method: `{method}`.")]
	UnsupportedSignatureMethod {
		/// Method string supplied by the configuration.
		method: String,
	},
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{endpoint}`.")]
	Network {
		/// Endpoint path the request targeted.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured per-request timeout.
	#[error("Request to `{endpoint}` timed out.")]
	Timeout {
		/// Endpoint path the request targeted.
		endpoint: String,
	},
}
impl TransportError {
	/// Classifies a reqwest failure for the given endpoint.
	pub fn from_reqwest(endpoint: &str, e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout { endpoint: endpoint.to_owned() }
		} else {
			Self::Network { endpoint: endpoint.to_owned(), source: Box::new(e) }
		}
	}
}

/// Request body serialization failures.
#[derive(Debug, ThisError)]
pub enum EncodeError {
	/// Payload could not be serialized as XML.
	#[error("Payload could not be serialized as XML.")]
	Xml(#[from] quick_xml::SeError),
	/// Payload could not be serialized as JSON.
	#[error("Payload could not be serialized as JSON.")]
	Json(#[from] serde_json::Error),
}

/// Response body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body is not valid JSON for the requested type.
	#[error("Response body returned malformed JSON.")]
	Json {
		/// Structured parsing failure including the path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response that failed to decode.
		status: u16,
	},
}
