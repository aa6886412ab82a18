//! Single-flight access-token renewal.
//!
//! A request records the renewal generation and the session epoch before it is sent. When it
//! comes back with `401` it takes the renewal guard; if the generation moved while the request
//! was in flight, another request already renewed (or failed to) and its recorded outcome is
//! reused, provided the session it was produced for is still the current one. A request whose
//! session was replaced underneath it replays with whatever the store holds now. Otherwise this
//! request calls the refresh endpoint and publishes the outcome for everyone queued behind it.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	api::{RenewedTokens, models::RefreshBody},
	auth::TokenSecret,
	gateway::Gateway,
	http::{ApiRequest, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	route::Route,
};

#[derive(Clone, Debug)]
enum RenewalOutcome {
	Renewed(TokenSecret),
	Failed(Arc<Error>),
}
impl RenewalOutcome {
	fn into_result(self) -> Result<TokenSecret> {
		match self {
			Self::Renewed(token) => Ok(token),
			Self::Failed(source) => Err(Error::RenewalFailed { source }),
		}
	}
}

// Outcome tagged with the session epoch that was current once it settled.
#[derive(Debug)]
struct Recorded {
	epoch: u64,
	outcome: RenewalOutcome,
}

/// Renewal generation and session epoch seen by a request before it was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Observed {
	generation: u64,
	epoch: u64,
}

/// Serializes renewals and remembers the latest outcome.
#[derive(Debug, Default)]
pub(crate) struct RenewalGuard {
	generation: AtomicU64,
	latest: AsyncMutex<Option<Recorded>>,
}
impl RenewalGuard {
	pub(crate) fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn observe(&self) -> Observed {
		Observed { generation: self.renewal.generation(), epoch: self.session.epoch() }
	}

	/// Obtains a fresh access token for a request sent at `observed`.
	///
	/// Returns `Ok(None)` when there is nothing to replay with: no refresh token is stored, or
	/// the session was replaced and the new one holds no access token. No renewal call is made
	/// in either case and the caller surfaces its original `401`.
	pub(crate) async fn renew_after(&self, observed: Observed) -> Result<Option<TokenSecret>> {
		let mut latest = self.renewal.latest.lock().await;
		let epoch = self.session.epoch();

		if let Some(recorded) = latest
			.as_ref()
			.filter(|r| r.epoch == epoch && self.renewal.generation() != observed.generation)
		{
			self.renewal_metrics.record_coalesced();

			return recorded.outcome.clone().into_result().map(Some);
		}
		// Signed out or in again while the request was in flight.
		if epoch != observed.epoch {
			return self.session.access_token().await;
		}

		let Some(refresh) = self.session.refresh_token().await? else {
			return Ok(None);
		};
		let outcome = self.renew_with(&refresh).await;

		*latest = Some(Recorded { epoch: self.session.epoch(), outcome: outcome.clone() });
		self.renewal.generation.fetch_add(1, Ordering::AcqRel);

		outcome.into_result().map(Some)
	}

	async fn renew_with(&self, refresh: &TokenSecret) -> RenewalOutcome {
		const KIND: CallKind = CallKind::Renewal;

		let span = CallSpan::new(KIND, "renew_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.renewal_metrics.record_attempt();

		let result = span
			.instrument(async {
				let renewed = self.request_renewal(refresh).await?;

				self.session.rotate(&renewed).await?;

				Ok::<_, Error>(renewed.access)
			})
			.await;

		match result {
			Ok(access) => {
				obs::record_call_outcome(KIND, CallOutcome::Success);
				self.renewal_metrics.record_success();

				RenewalOutcome::Renewed(access)
			},
			Err(err) => {
				obs::record_call_outcome(KIND, CallOutcome::Failure);
				self.renewal_metrics.record_failure();
				span.note("renewal failed; clearing session");

				if let Err(clear_err) = self.session.clear().await {
					span.warn("session could not be cleared after a failed renewal", &clear_err);
				}

				self.navigator.navigate(Route::Auth);

				RenewalOutcome::Failed(Arc::new(err))
			},
		}
	}

	// Bypasses `send` so a rejected refresh token can never trigger another renewal.
	async fn request_renewal(&self, refresh: &TokenSecret) -> Result<RenewedTokens> {
		let path = self.descriptor.endpoints.token_refresh.as_str();
		let request = ApiRequest::post(path).json(&RefreshBody { refresh: refresh.expose() })?;

		self.dispatch(&request).await?.error_for_status(path)?.json(path)
	}
}
