//! Request and response body codecs.
//!
//! The marketplace is asymmetric: PUT bodies travel as XML while every response comes
//! back as JSON. [`BodyFormat`] makes the request side configurable; [`decode_json`]
//! is the single response-side decoder and reports the JSON path that failed.

// self
use crate::{
	_prelude::*,
	error::{DecodeError, EncodeError},
};

/// Serialization formats accepted for request bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
	#[default]
	/// XML document, the marketplace's native request format.
	Xml,
	/// JSON document.
	Json,
}
impl BodyFormat {
	/// Returns the `Content-Type` header value matching the format.
	pub const fn content_type(self) -> &'static str {
		match self {
			BodyFormat::Xml => "application/xml",
			BodyFormat::Json => "application/json",
		}
	}

	/// Serializes a payload into a request body string.
	pub fn encode<T>(self, payload: &T) -> Result<String, EncodeError>
	where
		T: Serialize,
	{
		match self {
			BodyFormat::Xml => quick_xml::se::to_string(payload).map_err(EncodeError::from),
			BodyFormat::Json => serde_json::to_string(payload).map_err(EncodeError::from),
		}
	}
}

/// Decodes a JSON response body into the caller's type.
///
/// Unknown fields are ignored for forward compatibility; a shape mismatch surfaces as
/// [`DecodeError::Json`] carrying the offending path and the HTTP status. Trailing
/// content after the first complete document is tolerated, matching the marketplace's
/// lenient server-side parsing.
pub fn decode_json<T>(bytes: &[u8], status: u16) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { source, status })
}
