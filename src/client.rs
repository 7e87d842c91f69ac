//! Typed async request pipeline for the marketplace API.
//!
//! [`MarketClient`] signs every request through the [`Signer`], dispatches it over a
//! shared reqwest transport with a per-request timeout, and classifies the response:
//! 2xx bodies decode as JSON into the caller's type, anything else surfaces as
//! [`Error::Status`]. Requests are independent; concurrent calls each draw their own
//! nonce and timestamp and no ordering between them is guaranteed or required.

// crates.io
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	codec,
	config::{ClientConfig, Credentials},
	http::ReqwestHttpClient,
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
	signer::{Clock, HttpMethod, NonceSource, Signer},
};

/// Signed HTTP client for a single marketplace host.
///
/// The client owns the configuration, signer, and transport so request methods can
/// focus on pipeline logic. Everything inside is read-only after construction and the
/// client is cheap to clone and share across tasks.
#[derive(Clone)]
pub struct MarketClient {
	/// Immutable client configuration.
	pub config: ClientConfig,
	/// Request signer bundling credentials with the nonce/clock seams.
	pub signer: Signer,
	/// Shared HTTP transport used for every outbound request.
	pub http_client: ReqwestHttpClient,
}
impl MarketClient {
	/// Creates a client with the crate's default reqwest transport.
	pub fn new(config: ClientConfig, credentials: Credentials) -> Self {
		Self::with_http_client(config, credentials, ReqwestHttpClient::default())
	}

	/// Creates a client that reuses a caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		credentials: Credentials,
		http_client: ReqwestHttpClient,
	) -> Self {
		let signer = Signer::new(credentials, config.oauth.clone());

		Self { config, signer, http_client }
	}

	/// Replaces the signer's nonce source; intended for deterministic tests.
	pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
		self.signer = self.signer.with_nonce_source(source);

		self
	}

	/// Replaces the signer's clock; intended for deterministic tests.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.signer = self.signer.with_clock(clock);

		self
	}

	/// Issues a GET request without query parameters.
	pub async fn get<T>(&self, endpoint: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.get_with_query(endpoint, &BTreeMap::new()).await
	}

	/// Issues a GET request with query parameters.
	pub async fn get_with_query<T>(
		&self,
		endpoint: &str,
		query: &BTreeMap<String, String>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute(HttpMethod::Get, endpoint, query, None).await
	}

	/// Issues a PUT request without query parameters.
	pub async fn put<T, U>(&self, endpoint: &str, payload: &U) -> Result<T>
	where
		T: DeserializeOwned,
		U: Serialize,
	{
		self.put_with_query(endpoint, &BTreeMap::new(), payload).await
	}

	/// Issues a PUT request with query parameters.
	///
	/// The payload is serialized with the configured [`BodyFormat`](crate::codec::BodyFormat);
	/// the body never contributes parameters to the OAuth signature (the marketplace
	/// does not use the OAuth 1.0a body hash extension).
	pub async fn put_with_query<T, U>(
		&self,
		endpoint: &str,
		query: &BTreeMap<String, String>,
		payload: &U,
	) -> Result<T>
	where
		T: DeserializeOwned,
		U: Serialize,
	{
		let body = self.config.request_body.encode(payload)?;

		self.execute(HttpMethod::Put, endpoint, query, Some(body)).await
	}

	async fn execute<T>(
		&self,
		method: HttpMethod,
		endpoint: &str,
		query: &BTreeMap<String, String>,
		body: Option<String>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let kind = RequestKind::from(method);
		let span = RequestSpan::new(kind, endpoint);

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span.instrument(self.execute_inner(method, endpoint, query, body)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(kind, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(kind, RequestOutcome::Failure),
		}

		result
	}

	async fn execute_inner<T>(
		&self,
		method: HttpMethod,
		endpoint: &str,
		query: &BTreeMap<String, String>,
		body: Option<String>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let base_url = self.endpoint_url(endpoint);
		let signed = self.signer.sign(method, &base_url, query)?;
		let mut builder = match method {
			HttpMethod::Get => self.http_client.get(&signed.url),
			HttpMethod::Put => self.http_client.put(&signed.url),
		}
		.timeout(self.config.timeout.unsigned_abs())
		.header(AUTHORIZATION, signed.authorization.as_str());

		if let Some(body) = body {
			builder =
				builder.header(CONTENT_TYPE, self.config.request_body.content_type()).body(body);
		}

		let (status, bytes) = self.http_client.send(endpoint, builder).await?;

		if (200..300).contains(&status) {
			Ok(codec::decode_json(&bytes, status)?)
		} else {
			obs::warn_request_failed(endpoint, status);

			Err(Error::Status { status, endpoint: endpoint.to_owned() })
		}
	}

	/// Joins the configured host with an endpoint path such as `/expansions`.
	fn endpoint_url(&self, endpoint: &str) -> String {
		format!("{}{}", self.config.host.as_str().trim_end_matches('/'), endpoint)
	}
}
impl Debug for MarketClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MarketClient")
			.field("host", &self.config.host.as_str())
			.field("app_token", &self.signer.credentials.app_token)
			.finish()
	}
}
