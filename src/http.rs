//! Transport primitives for API calls.
//!
//! The module exposes [`ApiRequest`] (the replayable request descriptor), [`HttpResponse`],
//! and the [`HttpTransport`] trait so downstream crates can plug in their own HTTP stack or a
//! scripted fake. The gateway never talks to an HTTP library directly; it resolves the
//! request URL from its descriptor and hands an owned [`ApiRequest`] to the transport once
//! per attempt.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Name of the credential header.
pub const AUTHORIZATION: &str = "authorization";
/// Name of the content type header.
pub const CONTENT_TYPE: &str = "content-type";

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, crate::error::TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute API requests.
///
/// Implementations must be `Send + Sync + 'static` so a gateway can be cloned across tasks,
/// and must return every HTTP status as an [`HttpResponse`]; only failures that produced no
/// response at all are reported as errors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` to the fully resolved `url`.
	fn execute(&self, url: Url, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl Method {
	/// Returns the canonical verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One part of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
	/// Plain text field.
	Text {
		/// Field name.
		name: String,
		/// Field value.
		value: String,
	},
	/// File field.
	File {
		/// Field name.
		name: String,
		/// File name reported to the server.
		file_name: String,
		/// MIME type of the payload.
		mime: String,
		/// File contents.
		bytes: Arc<[u8]>,
	},
}
impl FormPart {
	/// Returns the field name.
	pub fn name(&self) -> &str {
		match self {
			Self::Text { name, .. } | Self::File { name, .. } => name,
		}
	}
}

/// Request payload kept in owned form so the request can be replayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Serialized JSON document.
	Json(Vec<u8>),
	/// Multipart form.
	Multipart(Vec<FormPart>),
}

/// Pending request descriptor.
///
/// Created per call and dropped once the call completes. The `retried` flag records whether
/// the request has already been replayed after a credential renewal; it is never reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Path relative to the API base URL.
	pub path: String,
	/// Extra headers, keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Payload.
	pub body: RequestBody,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request without body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			headers: BTreeMap::new(),
			body: RequestBody::Empty,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Attaches a JSON body and the matching content type.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_vec(body)?);

		Ok(self.header(CONTENT_TYPE, "application/json"))
	}

	/// Attaches a multipart form; the transport supplies the boundary.
	pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
		self.headers.remove(CONTENT_TYPE);
		self.body = RequestBody::Multipart(parts);

		self
	}

	/// Sets a header, replacing any previous value.
	pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Returns the value of a header, if set.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Sets the bearer credential.
	pub fn set_bearer(&mut self, token: &TokenSecret) {
		self.headers.insert(AUTHORIZATION.into(), token.bearer());
	}

	/// Returns the current `Authorization` header value.
	pub fn authorization(&self) -> Option<&str> {
		self.header_value(AUTHORIZATION)
	}

	/// Returns `true` once the request has been replayed after a renewal.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}
}

/// Response captured from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers, keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Raw body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Builds a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the server rejected the credential.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Returns the body as lossy UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes a JSON body, reporting the failing field path.
	pub fn json<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { path: path.to_owned(), source })
	}

	/// Converts a non-success response into [`Error::Status`].
	pub fn error_for_status(self, path: &str) -> Result<Self> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(Error::Status { status: self.status, path: path.to_owned(), body: self.text() })
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn build_request(
		&self,
		url: Url,
		request: ApiRequest,
	) -> Result<reqwest::RequestBuilder, reqwest::Error> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		};
		let mut builder = self.0.request(method, url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		Ok(match request.body {
			RequestBody::Empty => builder,
			RequestBody::Json(bytes) => builder.body(bytes),
			RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
		})
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, url: Url, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.build_request(url, request)?.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn build_form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, reqwest::Error> {
	use reqwest::multipart::{Form, Part};

	let mut form = Form::new();

	for part in parts {
		form = match part {
			FormPart::Text { name, value } => form.text(name, value),
			FormPart::File { name, file_name, mime, bytes } => form.part(
				name,
				Part::bytes(bytes.to_vec()).file_name(file_name).mime_str(&mime)?,
			),
		};
	}

	Ok(form)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_body_sets_content_type() {
		let request = ApiRequest::post("/api/folders/")
			.json(&serde_json::json!({ "name": "Porodično pravo" }))
			.expect("JSON body should serialize.");

		assert_eq!(request.header_value("Content-Type"), Some("application/json"));
		assert!(matches!(request.body, RequestBody::Json(_)));
		assert!(!request.is_retried());
	}

	#[test]
	fn multipart_drops_explicit_content_type() {
		let request = ApiRequest::post("/api/admin/upload/")
			.header(CONTENT_TYPE, "application/json")
			.multipart(vec![FormPart::Text { name: "title".into(), value: "Zakon".into() }]);

		assert_eq!(request.header_value(CONTENT_TYPE), None);
	}

	#[test]
	fn bearer_is_replaced_not_appended() {
		let mut request = ApiRequest::get("/api/folders/");

		request.set_bearer(&TokenSecret::new("t1"));
		request.set_bearer(&TokenSecret::new("t2"));

		assert_eq!(request.authorization(), Some("Bearer t2"));
		assert_eq!(request.headers.len(), 1);
	}

	#[test]
	fn decode_errors_report_field_path() {
		let response = HttpResponse::new(200, "{\"answer\":5}");
		let err = response
			.json::<crate::api::Answer>("/api/chat/")
			.expect_err("Numeric answer should not decode.");

		match err {
			Error::Decode { path, source } => {
				assert_eq!(path, "/api/chat/");
				assert_eq!(source.path().to_string(), "answer");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn error_for_status_keeps_body() {
		let err = HttpResponse::new(403, "{\"detail\":\"Nemate dozvolu\"}")
			.error_for_status("/api/admin/upload/")
			.expect_err("403 should surface as an error.");

		assert_eq!(err.status(), Some(403));
		assert_eq!(err.server_message().as_deref(), Some("Nemate dozvolu"));
	}
}
