//! Client configuration and credential material.
//!
//! [`ClientConfig`] captures everything the pipeline treats as opaque input: the host
//! base URL, the OAuth signature-method/version strings, the per-request timeout, and
//! the request body format. [`Credentials`] carries the consumer/access token
//! quadruple; secrets are wrapped so they never leak through `Debug` output. Both are
//! immutable once built and shared read-only across concurrent requests.

// self
use crate::{_prelude::*, codec::BodyFormat, error::ConfigError};

/// Default OAuth signature method expected by the marketplace.
pub const DEFAULT_SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Default OAuth protocol version string.
pub const DEFAULT_OAUTH_VERSION: &str = "1.0";
/// Default per-request timeout applied by the pipeline.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(60);

/// Redacted secret wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// OAuth 1.0a credential quadruple supplied at construction and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Consumer key registered for the application.
	pub app_token: String,
	/// Consumer secret paired with the app token.
	pub app_secret: Secret,
	/// Access token granted to the account.
	pub access_token: String,
	/// Access token secret paired with the access token.
	pub access_token_secret: Secret,
}
impl Credentials {
	/// Bundles the four credential strings.
	pub fn new(
		app_token: impl Into<String>,
		app_secret: impl Into<String>,
		access_token: impl Into<String>,
		access_token_secret: impl Into<String>,
	) -> Self {
		Self {
			app_token: app_token.into(),
			app_secret: Secret::new(app_secret),
			access_token: access_token.into(),
			access_token_secret: Secret::new(access_token_secret),
		}
	}
}

/// OAuth protocol strings advertised in every signed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthConfig {
	/// Signature method identifier, e.g. `HMAC-SHA1`.
	pub signature_method: String,
	/// Protocol version string, e.g. `1.0`.
	pub version: String,
}
impl Default for OauthConfig {
	fn default() -> Self {
		Self {
			signature_method: DEFAULT_SIGNATURE_METHOD.into(),
			version: DEFAULT_OAUTH_VERSION.into(),
		}
	}
}

/// Immutable client configuration consumed by the request pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Host base URL endpoints are appended to.
	pub host: Url,
	/// OAuth protocol strings used by the signer.
	pub oauth: OauthConfig,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Serialization format for PUT request bodies.
	///
	/// Responses always decode as JSON; the marketplace accepts XML bodies while
	/// answering in JSON, so the two directions are configured independently.
	pub request_body: BodyFormat,
}
impl ClientConfig {
	/// Creates a new builder seeded with the provided host base URL string.
	pub fn builder(host: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(host)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Host base URL string (validated on build).
	pub host: String,
	/// OAuth protocol strings.
	pub oauth: OauthConfig,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Request body serialization format.
	pub request_body: BodyFormat,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided host base URL string.
	pub fn new(host: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			oauth: OauthConfig::default(),
			timeout: DEFAULT_TIMEOUT,
			request_body: BodyFormat::Xml,
		}
	}

	/// Overrides the OAuth signature method string.
	pub fn signature_method(mut self, method: impl Into<String>) -> Self {
		self.oauth.signature_method = method.into();

		self
	}

	/// Overrides the OAuth version string.
	pub fn oauth_version(mut self, version: impl Into<String>) -> Self {
		self.oauth.version = version.into();

		self
	}

	/// Overrides the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the request body serialization format.
	pub fn request_body(mut self, format: BodyFormat) -> Self {
		self.request_body = format;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.host.is_empty() {
			return Err(ConfigError::MissingHost);
		}

		let host = Url::parse(&self.host).map_err(|source| ConfigError::InvalidHost { source })?;

		if !matches!(host.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: host.to_string() });
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(ClientConfig {
			host,
			oauth: self.oauth,
			timeout: self.timeout,
			request_body: self.request_body,
		})
	}
}
