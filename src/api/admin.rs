//! Administrative document upload.

// self
use crate::{
	_prelude::*,
	api::{UploadReceipt, require_text},
	gateway::Gateway,
	http::{ApiRequest, FormPart, HttpTransport},
};

const PDF_SUFFIX: &str = ".pdf";
const PDF_MIME: &str = "application/pdf";

/// PDF document staged for upload to the knowledge base.
#[derive(Clone, PartialEq, Eq)]
pub struct PdfDocument {
	file_name: String,
	title: String,
	bytes: Arc<[u8]>,
}
impl PdfDocument {
	/// Stages `bytes` under `file_name`.
	///
	/// The file name must carry a `.pdf` extension (any case) and the payload must not be empty.
	/// The title defaults to the file name without its extension.
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
		let file_name = file_name.into();
		let bytes = bytes.into();
		let stem = pdf_stem(&file_name).ok_or(Error::InvalidInput {
			field: "file_path",
			reason: "only PDF documents are accepted",
		})?;

		if bytes.is_empty() {
			return Err(Error::InvalidInput { field: "file_path", reason: "document is empty" });
		}

		let title = require_text("title", stem)?.to_owned();

		Ok(Self { file_name, title, bytes })
	}

	/// Overrides the title stored alongside the document.
	pub fn with_title(mut self, title: &str) -> Result<Self> {
		self.title = require_text("title", title)?.to_owned();

		Ok(self)
	}

	/// Returns the file name reported to the server.
	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	/// Returns the title stored alongside the document.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Returns the payload size in bytes.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Returns `true` when the payload is empty; never the case for a staged document.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	fn into_parts(self) -> Vec<FormPart> {
		vec![
			FormPart::File {
				name: "file_path".into(),
				file_name: self.file_name,
				mime: PDF_MIME.into(),
				bytes: self.bytes,
			},
			FormPart::Text { name: "title".into(), value: self.title },
		]
	}
}
impl Debug for PdfDocument {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PdfDocument")
			.field("file_name", &self.file_name)
			.field("title", &self.title)
			.field("len", &self.bytes.len())
			.finish()
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Uploads a PDF into the knowledge base. The server rejects callers without the admin role.
	pub async fn upload_document(&self, document: PdfDocument) -> Result<UploadReceipt> {
		let path = self.descriptor.endpoints.admin_upload.as_str();
		let request = ApiRequest::post(path).multipart(document.into_parts());
		let response = self.send(request).await?;

		if response.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(UploadReceipt(serde_json::Value::Null));
		}

		response.json(path)
	}
}

fn pdf_stem(file_name: &str) -> Option<&str> {
	let split = file_name.len().checked_sub(PDF_SUFFIX.len())?;

	if !file_name.is_char_boundary(split) {
		return None;
	}

	let (stem, suffix) = file_name.split_at(split);

	suffix.eq_ignore_ascii_case(PDF_SUFFIX).then_some(stem)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn title_defaults_to_file_stem() {
		let doc = PdfDocument::new("Zakon o radu.PDF", b"%PDF-1.7".to_vec())
			.expect("PDF upload should stage.");

		assert_eq!(doc.title(), "Zakon o radu");
		assert_eq!(doc.len(), 8);

		let doc = doc.with_title("  ZOR ").expect("Non-blank title is accepted.");

		assert_eq!(doc.title(), "ZOR");
		assert!(doc.clone().with_title(" ").is_err());
	}

	#[test]
	fn non_pdf_and_empty_payloads_are_rejected() {
		assert!(matches!(
			PdfDocument::new("ugovor.docx", b"data".to_vec()),
			Err(Error::InvalidInput { field: "file_path", .. })
		));
		assert!(matches!(
			PdfDocument::new("ugovor.pdf", Vec::<u8>::new()),
			Err(Error::InvalidInput { reason: "document is empty", .. })
		));
		assert!(PdfDocument::new(".pdf", b"x".to_vec()).is_err());
		assert!(PdfDocument::new("čš", b"x".to_vec()).is_err());
	}

	#[test]
	fn form_uses_server_field_names() {
		let parts = PdfDocument::new("a.pdf", b"x".to_vec())
			.expect("PDF upload should stage.")
			.into_parts();
		let names = parts.iter().map(FormPart::name).collect::<Vec<_>>();

		assert_eq!(names, ["file_path", "title"]);
		assert!(matches!(&parts[0], FormPart::File { mime, .. } if mime == PDF_MIME));
	}
}
