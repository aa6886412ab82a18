//! Signs in against a mocked legal-assistant server, asks a question after the access token
//! silently expires, and restores the session from a file-backed store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use legal_assistant_client::{
	auth::ChatId,
	descriptor::ApiDescriptor,
	gateway::ReqwestGateway,
	http::ReqwestHttpClient,
	reqwest::Client,
	session::Session,
	store::{FileStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/login/");
			then.status(200).header("content-type", "application/json").body(
				"{\"access\":\"demo-access\",\"refresh\":\"demo-refresh\",\
				 \"user\":{\"id\":1,\"username\":\"gradjanin\",\"email\":\"g@primer.rs\",\"role\":\"Citizen\"}}",
			);
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/chat/").header("authorization", "Bearer demo-access");
			then.status(401).body("{\"detail\":\"Given token not valid for any token type\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"demo-access-2\"}");
		})
		.await;
	let answer = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/chat/").header("authorization", "Bearer demo-access-2");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"answer\":\"Zastarelost potraživanja iznosi deset godina.\"}");
		})
		.await;
	let path = std::env::temp_dir().join("legal-assistant-demo-session.json");
	let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(&path)?);

	store.clear().await?;

	let descriptor = ApiDescriptor::builder(Url::parse(&server.base_url())?).build()?;
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder().danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true).build()?,
	);
	let gateway =
		ReqwestGateway::with_http_client(descriptor.clone(), Session::new(store), http_client.clone());
	let user = gateway.login("gradjanin", "lozinka").await?;

	println!("Signed in as {} ({}).", user.username, user.role);

	let reply = gateway.ask(ChatId::new(7), "Koliki je rok zastarelosti?").await?;

	println!("Answer: {}", reply.answer);
	println!("Renewals performed: {}.", gateway.renewal_metrics.successes());

	let reopened = ReqwestGateway::with_http_client(
		descriptor,
		Session::new(Arc::new(FileStore::open(&path)?)),
		http_client,
	);
	let restored = reopened.restore_session().await?;

	println!("Restored from {}: {:?}.", path.display(), restored.map(|u| u.username));

	login.assert_async().await;
	expired.assert_async().await;
	refresh.assert_async().await;
	answer.assert_async().await;

	reopened.logout().await?;

	Ok(())
}
