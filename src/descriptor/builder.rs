// self
use crate::{
	_prelude::*,
	descriptor::{ApiDescriptor, Endpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
	/// Base URL must use HTTP or HTTPS.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot have paths joined onto it (e.g. `mailto:`).
	#[error("Base URL cannot act as a base: {url}.")]
	NotABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL carries a query string or fragment.
	#[error("Base URL must not carry a query or fragment: {url}.")]
	UnexpectedQueryOrFragment {
		/// Base URL that failed validation.
		url: String,
	},
	/// Endpoint paths must be slash-delimited on both ends.
	#[error("The {endpoint} endpoint path must start and end with '/': {path}.")]
	MalformedPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug)]
pub struct ApiDescriptorBuilder {
	/// Base URL of the API server.
	pub base_url: Url,
	/// Endpoint table; defaults to the standard contract.
	pub endpoints: Endpoints,
}
impl ApiDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, endpoints: Endpoints::default() }
	}

	/// Overrides the whole endpoint table.
	pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the token-refresh path.
	pub fn token_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.token_refresh = path.into();

		self
	}

	/// Overrides the login path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.login = path.into();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, DescriptorError> {
		let mut base_url = self.base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let descriptor = ApiDescriptor { base_url, endpoints: self.endpoints };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ApiDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), DescriptorError> {
		let url = &self.base_url;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(DescriptorError::UnsupportedScheme { url: url.to_string() });
		}
		if url.cannot_be_a_base() {
			return Err(DescriptorError::NotABase { url: url.to_string() });
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(DescriptorError::UnexpectedQueryOrFragment { url: url.to_string() });
		}

		for (endpoint, path) in self.endpoints.entries() {
			validate_path(endpoint, path)?;
		}

		Ok(())
	}
}

fn validate_path(endpoint: &'static str, path: &str) -> Result<(), DescriptorError> {
	if path.len() < 2 || !path.starts_with('/') || !path.ends_with('/') {
		Err(DescriptorError::MalformedPath { endpoint, path: path.to_owned() })
	} else {
		Ok(())
	}
}
