//! Transport primitives for marketplace requests.
//!
//! The pipeline talks to a single shared [`ReqwestHttpClient`]; reqwest's client is
//! already reusable and thread-safe, so one instance serves any number of concurrent
//! requests without coordination. Error mapping into [`TransportError`] happens here
//! so the pipeline only sees classified failures.

// std
use std::ops::Deref;
// crates.io
use reqwest::RequestBuilder;
// self
use crate::{_prelude::*, error::TransportError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts are applied per request by the pipeline, so a custom client only needs
/// connection-level settings (proxies, TLS roots, etc.).
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Dispatches a prepared request and collects the status code and raw body.
	///
	/// Timeouts and network failures are classified into [`TransportError`] tagged
	/// with the endpoint that was being called.
	pub(crate) async fn send(
		&self,
		endpoint: &str,
		builder: RequestBuilder,
	) -> Result<(u16, Vec<u8>), TransportError> {
		let response =
			builder.send().await.map_err(|e| TransportError::from_reqwest(endpoint, e))?;
		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|e| TransportError::from_reqwest(endpoint, e))?
			.to_vec();

		Ok((status, body))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
