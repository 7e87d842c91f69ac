//! Pure OAuth 1.0a request signer.
//!
//! [`sign_request`] is a deterministic function of its inputs: given a method, URL,
//! query map, credentials, and a fixed nonce + timestamp it always produces the same
//! Authorization header and final URL. Nonce and timestamp generation live behind the
//! [`NonceSource`] and [`Clock`] seams so tests can pin them while production code
//! draws from a high-entropy RNG and the system clock. The signer holds no shared
//! mutable state and never caches signatures.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	config::{Credentials, OauthConfig},
	error::SigningError,
};

type HmacSha1 = Hmac<Sha1>;

const OAUTH_PARAM_CONSUMER_KEY: &str = "oauth_consumer_key";
const OAUTH_PARAM_NONCE: &str = "oauth_nonce";
const OAUTH_PARAM_SIGNATURE: &str = "oauth_signature";
const OAUTH_PARAM_SIGNATURE_METHOD: &str = "oauth_signature_method";
const OAUTH_PARAM_TIMESTAMP: &str = "oauth_timestamp";
const OAUTH_PARAM_TOKEN: &str = "oauth_token";
const OAUTH_PARAM_VERSION: &str = "oauth_version";
const OAUTH_PARAM_REALM: &str = "realm";

// RFC 5849 §3.6: ALPHA, DIGIT, '-', '.', '_', '~' stay unencoded; everything else is
// percent-encoded with uppercase hex. The same set is applied at every encode site
// (URL, parameter string, composed base string); diverging sets break signatures
// silently on the server side.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// HTTP methods supported by the marketplace pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// HTTP GET; no request body.
	Get,
	/// HTTP PUT; carries a serialized payload.
	Put,
}
impl HttpMethod {
	/// Returns the uppercase wire name used in the signature base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Put => "PUT",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Signature algorithms implemented by the signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureMethod {
	/// HMAC-SHA1 over the signature base string.
	HmacSha1,
}
impl SignatureMethod {
	/// Resolves the configured method string, rejecting anything unimplemented.
	pub fn from_config(method: &str) -> Result<Self, SigningError> {
		match method {
			"HMAC-SHA1" => Ok(Self::HmacSha1),
			_ => Err(SigningError::UnsupportedSignatureMethod { method: method.to_owned() }),
		}
	}
}

/// Supplies a fresh nonce for each signed request.
pub trait NonceSource
where
	Self: Send + Sync,
{
	/// Returns a single-use nonce; values must not repeat across concurrent requests.
	fn next_nonce(&self) -> String;
}

/// Default nonce source backed by the thread-local RNG.
///
/// The marketplace accepts any high-entropy string; a random double in `[0, 1)`
/// formatted as a decimal string is what it historically receives.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNonceSource;
impl NonceSource for RandomNonceSource {
	fn next_nonce(&self) -> String {
		rand::rng().random::<f64>().to_string()
	}
}

/// Supplies the `oauth_timestamp` value for each signed request.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns milliseconds since the Unix epoch.
	fn timestamp_millis(&self) -> i64;
}

/// Default clock reading the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn timestamp_millis(&self) -> i64 {
		(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
	}
}

/// Output of a signing pass: the final request URL and the Authorization header value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Base URL with the caller's query string appended when non-empty.
	pub url: String,
	/// Complete `Authorization` header value, `OAuth ` scheme prefix included.
	pub authorization: String,
}

/// Signs a single request with a fixed nonce and timestamp.
///
/// The signature base string follows the marketplace's OAuth 1.0a profile:
/// `METHOD&enc(url)&enc(sorted k=v pairs)`, HMAC-SHA1 under
/// `enc(app_secret)&enc(access_token_secret)`, base64-encoded. The Authorization
/// header covers exactly the OAuth parameters plus `realm` (the unencoded URL) and
/// the signature; the caller's query parameters appear only in the base string and
/// the final URL.
pub fn sign_request(
	method: HttpMethod,
	base_url: &str,
	query: &BTreeMap<String, String>,
	credentials: &Credentials,
	oauth: &OauthConfig,
	nonce: &str,
	timestamp_millis: i64,
) -> Result<SignedRequest, SigningError> {
	let signature_method = SignatureMethod::from_config(&oauth.signature_method)?;
	let timestamp = timestamp_millis.to_string();
	let oauth_params = [
		(OAUTH_PARAM_CONSUMER_KEY, credentials.app_token.as_str()),
		(OAUTH_PARAM_TOKEN, credentials.access_token.as_str()),
		(OAUTH_PARAM_NONCE, nonce),
		(OAUTH_PARAM_TIMESTAMP, timestamp.as_str()),
		(OAUTH_PARAM_SIGNATURE_METHOD, oauth.signature_method.as_str()),
		(OAUTH_PARAM_VERSION, oauth.version.as_str()),
	];
	// BTreeMap keeps the merged mapping sorted by key, which is what makes the
	// signature independent of the caller's insertion order.
	let mut base_params: BTreeMap<&str, &str> =
		query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

	base_params.extend(oauth_params);

	let param_str = base_params
		.iter()
		.map(|(k, v)| {
			format!(
				"{}={}",
				utf8_percent_encode(k, OAUTH_ENCODE_SET),
				utf8_percent_encode(v, OAUTH_ENCODE_SET),
			)
		})
		.collect::<Vec<_>>()
		.join("&");
	let base_str = format!(
		"{}&{}&{}",
		method.as_str(),
		utf8_percent_encode(base_url, OAUTH_ENCODE_SET),
		utf8_percent_encode(&param_str, OAUTH_ENCODE_SET),
	);
	let signing_key = format!(
		"{}&{}",
		utf8_percent_encode(credentials.app_secret.expose(), OAUTH_ENCODE_SET),
		utf8_percent_encode(credentials.access_token_secret.expose(), OAUTH_ENCODE_SET),
	);
	let signature = match signature_method {
		SignatureMethod::HmacSha1 => hmac_sha1_base64(&signing_key, &base_str),
	};
	let mut header_params: BTreeMap<&str, &str> = oauth_params.into_iter().collect();

	header_params.insert(OAUTH_PARAM_REALM, base_url);
	header_params.insert(OAUTH_PARAM_SIGNATURE, &signature);

	let authorization = format!(
		"OAuth {}",
		header_params
			.iter()
			.map(|(k, v)| format!("{k}=\"{v}\""))
			.collect::<Vec<_>>()
			.join(", "),
	);
	// The query string appended to the URL stays unescaped beyond the values'
	// natural encoding so it agrees with what was signed.
	let url = if query.is_empty() {
		base_url.to_owned()
	} else {
		let query_str =
			query.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

		format!("{base_url}?{query_str}")
	};

	Ok(SignedRequest { url, authorization })
}

fn hmac_sha1_base64(key: &str, message: &str) -> String {
	// HMAC accepts keys of any length, so construction cannot fail.
	let mut mac = HmacSha1::new_from_slice(key.as_bytes())
		.expect("HMAC-SHA1 should accept keys of any length.");

	mac.update(message.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

/// Bundles credentials, OAuth strings, and the nonce/clock seams behind one handle.
#[derive(Clone)]
pub struct Signer {
	/// Credential quadruple used for every signature.
	pub credentials: Credentials,
	/// OAuth protocol strings advertised in every request.
	pub oauth: OauthConfig,
	nonce_source: Arc<dyn NonceSource>,
	clock: Arc<dyn Clock>,
}
impl Signer {
	/// Creates a signer with the default RNG nonce source and system clock.
	pub fn new(credentials: Credentials, oauth: OauthConfig) -> Self {
		Self {
			credentials,
			oauth,
			nonce_source: Arc::new(RandomNonceSource),
			clock: Arc::new(SystemClock),
		}
	}

	/// Replaces the nonce source.
	pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
		self.nonce_source = source;

		self
	}

	/// Replaces the clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Signs a request, drawing a fresh nonce and timestamp.
	pub fn sign(
		&self,
		method: HttpMethod,
		base_url: &str,
		query: &BTreeMap<String, String>,
	) -> Result<SignedRequest, SigningError> {
		sign_request(
			method,
			base_url,
			query,
			&self.credentials,
			&self.oauth,
			&self.nonce_source.next_nonce(),
			self.clock.timestamp_millis(),
		)
	}
}
impl Debug for Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Signer")
			.field("app_token", &self.credentials.app_token)
			.field("oauth", &self.oauth)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// crates.io
	use percent_encoding::percent_decode_str;
	// self
	use super::*;

	const BASE_URL: &str = "https://api.cardmarket.com/ws/v2.0/output.json/expansions";
	const NONCE: &str = "0.5";
	const TIMESTAMP: i64 = 1_700_000_000_000;

	fn credentials() -> Credentials {
		Credentials::new("app-token", "app-secret", "access-token", "access-secret")
	}

	fn query() -> BTreeMap<String, String> {
		BTreeMap::from([("idGame".to_owned(), "1".to_owned())])
	}

	struct FixedClock(i64);
	impl Clock for FixedClock {
		fn timestamp_millis(&self) -> i64 {
			self.0
		}
	}

	struct SequenceNonceSource(Mutex<Vec<String>>);
	impl SequenceNonceSource {
		fn new(nonces: impl IntoIterator<Item = &'static str>) -> Self {
			let mut values = nonces.into_iter().map(str::to_owned).collect::<Vec<_>>();

			values.reverse();

			Self(Mutex::new(values))
		}
	}
	impl NonceSource for SequenceNonceSource {
		fn next_nonce(&self) -> String {
			self.0.lock().expect("Nonce sequence lock should not be poisoned.").pop().expect(
				"Nonce sequence should hold a value for every request issued by the test.",
			)
		}
	}

	#[test]
	fn get_signature_matches_golden_value() {
		let signed = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("Signing with HMAC-SHA1 should succeed.");

		assert_eq!(signed.url, format!("{BASE_URL}?idGame=1"));
		assert_eq!(
			signed.authorization,
			"OAuth oauth_consumer_key=\"app-token\", oauth_nonce=\"0.5\", \
			 oauth_signature=\"gS4Av6dH+Xj7EYApDKABBN4Kow8=\", \
			 oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000000\", \
			 oauth_token=\"access-token\", oauth_version=\"1.0\", \
			 realm=\"https://api.cardmarket.com/ws/v2.0/output.json/expansions\"",
		);
	}

	#[test]
	fn put_signature_differs_only_in_method() {
		let get = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("GET signing should succeed.");
		let put = sign_request(
			HttpMethod::Put,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("PUT signing should succeed.");

		assert!(put.authorization.contains("oauth_signature=\"nuVIIDu7H2IsZb9NU/CpLGgkjIQ=\""));
		assert_eq!(put.url, get.url);
	}

	#[test]
	fn signing_is_deterministic_for_fixed_inputs() {
		let first = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("First signing pass should succeed.");
		let second = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("Second signing pass should succeed.");

		assert_eq!(first, second);
	}

	#[test]
	fn insertion_order_does_not_affect_signature() {
		let base_url = "https://api.cardmarket.com/ws/v2.0/output.json/products/find";
		let mut forward = BTreeMap::new();

		forward.insert("idGame".to_owned(), "1".to_owned());
		forward.insert("search".to_owned(), "Fire & Ice".to_owned());

		let mut reverse = BTreeMap::new();

		reverse.insert("search".to_owned(), "Fire & Ice".to_owned());
		reverse.insert("idGame".to_owned(), "1".to_owned());

		for map in [&forward, &reverse] {
			let signed = sign_request(
				HttpMethod::Get,
				base_url,
				map,
				&credentials(),
				&OauthConfig::default(),
				NONCE,
				TIMESTAMP,
			)
			.expect("Signing should succeed regardless of insertion order.");

			assert!(
				signed.authorization.contains("oauth_signature=\"23v41Qgg1LDu+VGh/NxwuS+PNHc=\"")
			);
		}
	}

	#[test]
	fn nonce_variation_changes_only_the_signature() {
		let base = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("Signing with the base nonce should succeed.");
		let varied = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			"0.75",
			TIMESTAMP,
		)
		.expect("Signing with the varied nonce should succeed.");

		assert!(varied.authorization.contains("oauth_signature=\"77kphZYzpz7ko9mU6xXqr1dP6p8=\""));
		assert_ne!(base.authorization, varied.authorization);

		let keys = |header: &str| {
			header
				.trim_start_matches("OAuth ")
				.split(", ")
				.map(|pair| pair.split('=').next().expect("Header pair should carry a key."))
				.map(str::to_owned)
				.collect::<Vec<_>>()
		};

		assert_eq!(keys(&base.authorization), keys(&varied.authorization));
	}

	#[test]
	fn empty_query_leaves_url_untouched() {
		let base_url = "https://api.cardmarket.com/ws/v2.0/output.json/account";
		let signed = sign_request(
			HttpMethod::Get,
			base_url,
			&BTreeMap::new(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("Signing without query parameters should succeed.");

		assert_eq!(signed.url, base_url);
		assert!(signed.authorization.contains("oauth_signature=\"ZW7wxpndDwKcRBSVCDMQsnNLeTo=\""));
	}

	#[test]
	fn header_excludes_query_parameters() {
		let signed = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&OauthConfig::default(),
			NONCE,
			TIMESTAMP,
		)
		.expect("Signing should succeed.");

		assert!(!signed.authorization.contains("idGame"));
	}

	#[test]
	fn percent_encoding_round_trips() {
		let value = "Fire & Ice + Lightning/100%~_.-";
		let encoded = utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string();
		let decoded = percent_decode_str(&encoded)
			.decode_utf8()
			.expect("Encoded value should decode back to UTF-8.");

		assert_eq!(decoded, value);
		assert_eq!(
			utf8_percent_encode("Fire & Ice", OAUTH_ENCODE_SET).to_string(),
			"Fire%20%26%20Ice",
		);
	}

	#[test]
	fn unsupported_signature_method_is_fatal() {
		let oauth = OauthConfig { signature_method: "RSA-SHA1".into(), version: "1.0".into() };
		let err = sign_request(
			HttpMethod::Get,
			BASE_URL,
			&query(),
			&credentials(),
			&oauth,
			NONCE,
			TIMESTAMP,
		)
		.expect_err("Unimplemented signature methods should be rejected.");

		assert_eq!(err, SigningError::UnsupportedSignatureMethod { method: "RSA-SHA1".into() });
	}

	#[test]
	fn signer_draws_from_injected_seams() {
		let signer = Signer::new(credentials(), OauthConfig::default())
			.with_nonce_source(Arc::new(SequenceNonceSource::new(["0.5", "0.75"])))
			.with_clock(Arc::new(FixedClock(TIMESTAMP)));
		let first = signer
			.sign(HttpMethod::Get, BASE_URL, &query())
			.expect("First signer pass should succeed.");
		let second = signer
			.sign(HttpMethod::Get, BASE_URL, &query())
			.expect("Second signer pass should succeed.");

		assert!(first.authorization.contains("oauth_signature=\"gS4Av6dH+Xj7EYApDKABBN4Kow8=\""));
		assert!(second.authorization.contains("oauth_signature=\"77kphZYzpz7ko9mU6xXqr1dP6p8=\""));
	}

	#[test]
	fn random_nonces_differ_across_calls() {
		let source = RandomNonceSource;

		assert_ne!(source.next_nonce(), source.next_nonce());
	}
}
