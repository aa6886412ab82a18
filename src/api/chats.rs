//! Chat creation, transcripts, and question answering.

// self
use crate::{
	_prelude::*,
	api::{
		Answer, Chat, ChatMessage,
		models::{NewChatBody, QuestionBody},
		require_text,
	},
	auth::{ChatId, FolderId},
	gateway::Gateway,
	http::{ApiRequest, HttpTransport},
};

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a chat inside `folder`.
	pub async fn create_chat(&self, name: &str, folder: FolderId) -> Result<Chat> {
		let name = require_text("name", name)?;
		let path = self.descriptor.endpoints.chats.as_str();
		let request = ApiRequest::post(path).json(&NewChatBody { name, folder_id: folder })?;

		self.send(request).await?.json(path)
	}

	/// Returns the stored transcript of `chat`, oldest first as the server orders it.
	pub async fn chat_history(&self, chat: ChatId) -> Result<Vec<ChatMessage>> {
		let path = self.descriptor.endpoints.chat_history(chat);

		self.send(ApiRequest::get(&path)).await?.json(&path)
	}

	/// Asks a question within `chat` and returns the server's answer.
	///
	/// The question is sent as typed, but it must contain something other than whitespace.
	pub async fn ask(&self, chat: ChatId, question: &str) -> Result<Answer> {
		require_text("question", question)?;

		let path = self.descriptor.endpoints.chat.as_str();
		let request = ApiRequest::post(path).json(&QuestionBody { question, chat_id: chat })?;

		self.send(request).await?.json(path)
	}
}
