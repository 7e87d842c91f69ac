//! Shared helpers for pipeline integration tests: a mock-server-backed client with
//! pinned nonce/timestamp seams so Authorization headers are reproducible.

#![allow(dead_code)]

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::MockServer;
// self
use cardmarket_client::{
	client::MarketClient,
	codec::BodyFormat,
	config::{ClientConfig, Credentials, OauthConfig},
	signer::{Clock, HttpMethod, NonceSource, sign_request},
};

pub const NONCE: &str = "0.5";
pub const TIMESTAMP: i64 = 1_700_000_000_000;

pub struct FixedNonceSource;
impl NonceSource for FixedNonceSource {
	fn next_nonce(&self) -> String {
		NONCE.to_owned()
	}
}

pub struct FixedClock;
impl Clock for FixedClock {
	fn timestamp_millis(&self) -> i64 {
		TIMESTAMP
	}
}

pub fn credentials() -> Credentials {
	Credentials::new("app-token", "app-secret", "access-token", "access-secret")
}

pub fn test_client(server: &MockServer) -> MarketClient {
	test_client_with(server, BodyFormat::Xml)
}

pub fn test_client_with(server: &MockServer, body: BodyFormat) -> MarketClient {
	let config = ClientConfig::builder(server.base_url())
		.request_body(body)
		.build()
		.expect("Mock server configuration should build successfully.");

	MarketClient::new(config, credentials())
		.with_nonce_source(Arc::new(FixedNonceSource))
		.with_clock(Arc::new(FixedClock))
}

/// Computes the Authorization header the client must send for the pinned seams.
pub fn expected_authorization(
	server: &MockServer,
	method: HttpMethod,
	endpoint: &str,
	query: &BTreeMap<String, String>,
) -> String {
	let url = format!("{}{endpoint}", server.base_url());

	sign_request(method, &url, query, &credentials(), &OauthConfig::default(), NONCE, TIMESTAMP)
		.expect("Signing with pinned inputs should succeed.")
		.authorization
}
