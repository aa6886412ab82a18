//! Authenticated request gateway.
//!
//! Every API call goes through [`Gateway::send`]: the current access token is attached as a
//! bearer credential, and a `401` on the first attempt triggers one silent renewal followed by
//! one replay. Everything else (other statuses, transport failures) is surfaced unchanged.
//! Login and registration use [`Gateway::send_public`], which skips both steps.

pub mod metrics;

mod renewal;

pub use metrics::RenewalMetrics;

pub(crate) use renewal::RenewalGuard;

// self
use crate::{
	_prelude::*,
	descriptor::ApiDescriptor,
	http::{ApiRequest, HttpResponse, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	route::{Navigator, NoopNavigator},
	session::Session,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Issues API requests on behalf of one session.
///
/// The gateway owns the transport, the API descriptor, the [`Session`] handle, and the renewal
/// guard so that concurrent callers sharing a gateway (or its clones) share a single in-flight
/// renewal.
pub struct Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Base URL and endpoint table.
	pub descriptor: ApiDescriptor,
	/// Persisted credentials and user record.
	pub session: Session,
	/// Receives redirect signals, e.g. after a failed renewal.
	pub navigator: Arc<dyn Navigator>,
	/// Shared counters for renewal outcomes.
	pub renewal_metrics: Arc<RenewalMetrics>,
	renewal: Arc<RenewalGuard>,
}
impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ApiDescriptor,
		session: Session,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			session,
			navigator: Arc::new(NoopNavigator),
			renewal_metrics: Default::default(),
			renewal: Default::default(),
		}
	}

	/// Sets the navigator that receives redirect signals.
	pub fn with_navigator(mut self, navigator: impl 'static + Navigator) -> Self {
		self.navigator = Arc::new(navigator);

		self
	}

	/// Attaches the stored access token, if any, as a bearer credential.
	///
	/// Calling it repeatedly with an unchanged store yields the same header. A token that
	/// cannot be read is treated as absent, so the request goes out without a credential and
	/// the server decides.
	pub async fn authorize(&self, request: &mut ApiRequest) {
		match self.session.access_token().await {
			Ok(Some(token)) => request.set_bearer(&token),
			Ok(None) => (),
			Err(err) => CallSpan::new(CallKind::Request, "authorize")
				.warn("access token unreadable; sending without credential", &err),
		}
	}

	/// Sends an authenticated request, renewing the access token once on `401`.
	///
	/// Returns the successful response, or the error of the last step that ran: the original
	/// status error, the replay's status error, a transport error, or
	/// [`Error::RenewalFailed`] when the renewal itself failed.
	pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.send_authorized(request, &span)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Sends a request without credentials and without renewal.
	pub async fn send_public(&self, request: ApiRequest) -> Result<HttpResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send_public");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let path = request.path.clone();
		let result = span
			.instrument(async move { self.dispatch(&request).await?.error_for_status(&path) })
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn send_authorized(
		&self,
		mut request: ApiRequest,
		span: &CallSpan,
	) -> Result<HttpResponse> {
		let observed = self.observe();

		self.authorize(&mut request).await;

		let response = self.dispatch(&request).await?;

		if !response.is_unauthorized() || request.is_retried() {
			return response.error_for_status(&request.path);
		}

		request.mark_retried();

		let Some(token) = self.renew_after(observed).await? else {
			span.note("no refresh token stored; surfacing the original 401");

			return response.error_for_status(&request.path);
		};

		span.note("replaying request with renewed access token");
		request.set_bearer(&token);

		self.dispatch(&request).await?.error_for_status(&request.path)
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse> {
		let url = self.descriptor.resolve(&request.path)?;

		Ok(self.http_client.execute(url, request.clone()).await?)
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a new gateway that provisions its own reqwest-backed transport.
	pub fn new(descriptor: ApiDescriptor, session: Session) -> Self {
		Self::with_http_client(descriptor, session, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			session: self.session.clone(),
			navigator: self.navigator.clone(),
			renewal_metrics: self.renewal_metrics.clone(),
			renewal: self.renewal.clone(),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("renewal_metrics", &self.renewal_metrics)
			.finish()
	}
}
