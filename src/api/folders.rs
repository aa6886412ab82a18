//! Folder listing and creation.

// self
use crate::{
	_prelude::*,
	api::{Chat, Folder, models::NewFolderBody, require_text},
	auth::FolderId,
	gateway::Gateway,
	http::{ApiRequest, HttpTransport},
};

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the signed-in user's folders.
	pub async fn folders(&self) -> Result<Vec<Folder>> {
		let path = self.descriptor.endpoints.folders.as_str();

		self.send(ApiRequest::get(path)).await?.json(path)
	}

	/// Creates a folder; the name is trimmed and must not be blank.
	pub async fn create_folder(&self, name: &str) -> Result<Folder> {
		let name = require_text("name", name)?;
		let path = self.descriptor.endpoints.folders.as_str();
		let request = ApiRequest::post(path).json(&NewFolderBody { name })?;

		self.send(request).await?.json(path)
	}

	/// Lists the chats stored under `folder`.
	pub async fn folder_chats(&self, folder: FolderId) -> Result<Vec<Chat>> {
		let path = self.descriptor.endpoints.folder_chats(folder);

		self.send(ApiRequest::get(&path)).await?.json(&path)
	}
}
