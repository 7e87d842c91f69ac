//! Demonstrates fetching a game's expansions through the signed GET pipeline, using a
//! local mock marketplace so the demo runs without real credentials.

// std
use std::collections::BTreeMap;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use cardmarket_client::{
	client::MarketClient,
	config::{ClientConfig, Credentials},
};

#[derive(Debug, Deserialize)]
struct Expansion {
	#[serde(rename = "idExpansion")]
	id_expansion: u32,
	#[serde(rename = "enName")]
	en_name: String,
}

#[derive(Debug, Deserialize)]
struct ExpansionsResponse {
	expansion: Vec<Expansion>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/expansions").query_param("idGame", "1");
			then.status(200).header("content-type", "application/json").body(
				"{\"expansion\":[{\"idExpansion\":1,\"enName\":\"Alpha\"},\
				 {\"idExpansion\":2,\"enName\":\"Beta\"}]}",
			);
		})
		.await;
	let config = ClientConfig::builder(server.base_url()).build()?;
	let credentials = Credentials::new("app-token", "app-secret", "access-token", "access-secret");
	let client = MarketClient::new(config, credentials);
	let query = BTreeMap::from([("idGame".to_owned(), "1".to_owned())]);
	let response: ExpansionsResponse = client.get_with_query("/expansions", &query).await?;

	for expansion in response.expansion {
		println!("{} {}", expansion.id_expansion, expansion.en_name);
	}

	Ok(())
}
