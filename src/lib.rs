//! Async client for the Cardmarket marketplace API: OAuth 1.0a request signing plus a
//! typed GET/PUT pipeline that sends XML bodies and decodes JSON responses.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod signer;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use time;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
