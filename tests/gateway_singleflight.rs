//! Exercises concurrent renewal against a scripted transport so the interleaving is exact.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use async_lock::Barrier;
use url::Url;
// self
use legal_assistant_client::{
	descriptor::ApiDescriptor,
	gateway::Gateway,
	http::{ApiRequest, HttpResponse, HttpTransport, TransportFuture},
	route::{Route, RouteSignal},
	session::Session,
	store::{MemoryStore, SessionStore, StoreKey},
};

const REFRESH: &str = "/api/token/refresh/";

/// Rejects the stale token until both callers have seen the rejection, then serves the renewed one.
struct Scripted {
	stale_barrier: Barrier,
	refresh_status: u16,
	refresh_calls: AtomicUsize,
	api_calls: AtomicUsize,
}
impl Scripted {
	fn new(refresh_status: u16) -> Self {
		Self {
			stale_barrier: Barrier::new(2),
			refresh_status,
			refresh_calls: AtomicUsize::new(0),
			api_calls: AtomicUsize::new(0),
		}
	}
}
impl HttpTransport for Scripted {
	fn execute(&self, url: Url, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if url.path() == REFRESH {
				self.refresh_calls.fetch_add(1, Ordering::SeqCst);

				return Ok(match self.refresh_status {
					200 => HttpResponse::new(200, "{\"access\":\"a2\"}"),
					status => HttpResponse::new(status, "{\"detail\":\"Token is blacklisted\"}"),
				});
			}

			self.api_calls.fetch_add(1, Ordering::SeqCst);

			match request.authorization() {
				Some("Bearer a2") => Ok(HttpResponse::new(200, "[]")),
				_ => {
					self.stale_barrier.wait().await;

					Ok(HttpResponse::new(401, ""))
				},
			}
		})
	}
}

async fn build_gateway(refresh_status: u16) -> (Gateway<Scripted>, Arc<MemoryStore>, RouteSignal) {
	let backend = Arc::new(MemoryStore::default());

	backend.set(StoreKey::AccessToken, "a1".into()).await.expect("Seeding should succeed.");
	backend.set(StoreKey::RefreshToken, "r1".into()).await.expect("Seeding should succeed.");

	let descriptor = ApiDescriptor::builder(
		Url::parse("http://legal-assistant.test/").expect("Fixture URL should parse."),
	)
	.build()
	.expect("Descriptor should build.");
	let routes = RouteSignal::default();
	let gateway = Gateway::<Scripted>::with_http_client(
		descriptor,
		Session::new(backend.clone()),
		Scripted::new(refresh_status),
	)
	.with_navigator(routes.clone());

	(gateway, backend, routes)
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_renewal() {
	let (gateway, backend, routes) = build_gateway(200).await;
	let (first, second) = tokio::join!(gateway.folders(), gateway.folders());

	assert!(first.expect("First request should succeed after renewal.").is_empty());
	assert!(second.expect("Second request should succeed after renewal.").is_empty());
	assert_eq!(gateway.http_client.refresh_calls.load(Ordering::SeqCst), 1);
	assert_eq!(gateway.http_client.api_calls.load(Ordering::SeqCst), 4);
	assert_eq!(gateway.renewal_metrics.attempts(), 1);
	assert_eq!(gateway.renewal_metrics.coalesced(), 1);
	assert_eq!(backend.peek(StoreKey::AccessToken).as_deref(), Some("a2"));
	assert_eq!(routes.peek(), None);
}

#[tokio::test]
async fn concurrent_requests_share_a_failed_renewal() {
	let (gateway, backend, routes) = build_gateway(401).await;
	let (first, second) = tokio::join!(gateway.folders(), gateway.folders());
	let first = first.expect_err("First request should surface the renewal failure.");
	let second = second.expect_err("Second request should surface the renewal failure.");

	assert!(first.is_session_expired());
	assert!(second.is_session_expired());
	assert_eq!(second.server_message().as_deref(), Some("Token is blacklisted"));
	assert_eq!(gateway.http_client.refresh_calls.load(Ordering::SeqCst), 1);
	assert_eq!(gateway.http_client.api_calls.load(Ordering::SeqCst), 2);
	assert_eq!(gateway.renewal_metrics.failures(), 1);
	assert!(backend.is_empty());
	assert_eq!(routes.take(), Some(Route::Auth));
}

#[tokio::test]
async fn authorize_is_idempotent() {
	let (gateway, _backend, _routes) = build_gateway(200).await;
	let mut request = ApiRequest::get("/api/folders/");

	gateway.authorize(&mut request).await;

	let once = request.clone();

	gateway.authorize(&mut request).await;

	assert_eq!(request, once);
	assert_eq!(request.authorization(), Some("Bearer a1"));
}
