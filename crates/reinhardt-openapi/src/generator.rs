//! OpenAPI document generation from documentation options
//!
//! This module turns [`Options`] into the pieces of an OpenAPI 3 document:
//! the info block, the security schemes and their global requirements, the
//! default responses of each kind of operation, and the Swagger UI settings.

use crate::error::OpenApiResult;
use crate::options::{ApiKeyLocation, OAuthFlow, Options};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use utoipa::openapi::security::{
	ApiKey, ApiKeyValue, AuthorizationCode, ClientCredentials, Flow, Implicit, OAuth2, Password,
	Scopes, SecurityRequirement, SecurityScheme,
};
use utoipa::openapi::{
	ComponentsBuilder, ContactBuilder, Info, InfoBuilder, LicenseBuilder, OpenApi, OpenApiBuilder,
	RefOr, Response, ResponseBuilder, Responses, ResponsesBuilder,
};

/// Name of the OAuth security scheme
pub const OAUTH_SCHEME: &str = "oauth";

/// Kind of operation, used to pick default responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Retrieve one resource
	Get,
	/// List resources
	GetCollection,
	Post,
	Put,
	Patch,
	Delete,
}

impl OperationKind {
	fn default_responses(&self) -> Vec<(&'static str, &'static str)> {
		match self {
			OperationKind::Get => vec![("200", "Resource retrieved"), ("404", "Resource not found")],
			OperationKind::GetCollection => vec![("200", "Resource collection")],
			OperationKind::Post => vec![
				("201", "Resource created"),
				("400", "Invalid input"),
				("422", "Unprocessable entity"),
			],
			OperationKind::Put | OperationKind::Patch => vec![
				("200", "Resource updated"),
				("400", "Invalid input"),
				("404", "Resource not found"),
				("422", "Unprocessable entity"),
			],
			OperationKind::Delete => vec![("204", "Resource deleted"), ("404", "Resource not found")],
		}
	}
}

/// Builds OpenAPI documents from shared [`Options`]
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use reinhardt_openapi::generator::DocumentationGenerator;
/// use reinhardt_openapi::options::{ApiKeyLocation, Options};
///
/// let options = Options::builder()
///     .title("Library API")
///     .version("1.0.0")
///     .api_key("apiKey", "X-API-KEY", ApiKeyLocation::Header)
///     .build();
///
/// let generator = DocumentationGenerator::new(Arc::new(options));
/// let json = generator.to_json().unwrap();
/// assert!(json.contains("\"title\": \"Library API\""));
/// assert!(json.contains("\"X-API-KEY\""));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentationGenerator {
	options: Arc<Options>,
}

impl DocumentationGenerator {
	pub fn new(options: Arc<Options>) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Info block: title, description, version, terms, contact and license
	pub fn info(&self) -> Info {
		let options = &self.options;

		let contact = (options.contact_name().is_some()
			|| options.contact_url().is_some()
			|| options.contact_email().is_some())
		.then(|| {
			ContactBuilder::new()
				.name(options.contact_name())
				.url(options.contact_url())
				.email(options.contact_email())
				.build()
		});

		let license = options.license_name().map(|name| {
			LicenseBuilder::new()
				.name(name)
				.url(options.license_url())
				.build()
		});

		InfoBuilder::new()
			.title(options.title())
			.version(options.version())
			.description(non_empty(options.description()))
			.terms_of_service(options.terms_of_service())
			.contact(contact)
			.license(license)
			.build()
	}

	/// Security schemes by name: `oauth` when enabled, then one per API key
	pub fn security_schemes(&self) -> IndexMap<String, SecurityScheme> {
		let mut schemes = IndexMap::new();

		if self.options.oauth_enabled() {
			schemes.insert(OAUTH_SCHEME.to_string(), SecurityScheme::OAuth2(self.oauth2()));
		}

		for (scheme, key) in self.options.api_keys() {
			let value = ApiKeyValue::with_description(
				key.name().to_string(),
				format!("Value for the {} {} parameter.", key.name(), key.location()),
			);
			let api_key = match key.location() {
				ApiKeyLocation::Query => ApiKey::Query(value),
				ApiKeyLocation::Header => ApiKey::Header(value),
				ApiKeyLocation::Cookie => ApiKey::Cookie(value),
			};
			schemes.insert(scheme.clone(), SecurityScheme::ApiKey(api_key));
		}

		schemes
	}

	/// Global security requirements, one per scheme
	pub fn security_requirements(&self) -> Vec<SecurityRequirement> {
		let mut requirements = Vec::new();

		if self.options.oauth_enabled() {
			requirements.push(SecurityRequirement::new(
				OAUTH_SCHEME,
				self.options.oauth_scopes().keys().cloned().collect::<Vec<_>>(),
			));
		}
		for scheme in self.options.api_keys().keys() {
			requirements.push(SecurityRequirement::new(scheme.as_str(), Vec::<String>::new()));
		}

		requirements
	}

	/// Generate the OpenAPI document
	pub fn generate(&self) -> OpenApiResult<OpenApi> {
		let mut components = ComponentsBuilder::new();
		for (name, scheme) in self.security_schemes() {
			components = components.security_scheme(name, scheme);
		}

		let requirements = self.security_requirements();
		tracing::debug!(
			title = %self.options.title(),
			security_schemes = requirements.len(),
			"generating OpenAPI document"
		);

		Ok(OpenApiBuilder::new()
			.info(self.info())
			.components(Some(components.build()))
			.security((!requirements.is_empty()).then_some(requirements))
			.build())
	}

	/// Generate the OpenAPI document as a JSON string
	pub fn to_json(&self) -> OpenApiResult<String> {
		let document = self.generate()?;
		Ok(serde_json::to_string_pretty(&document)?)
	}

	/// Responses documented for an operation
	///
	/// Declared responses are kept as they are unless response overriding is
	/// enabled or none are declared; then the defaults of `kind` are used and
	/// declared responses replace defaults with the same status code.
	///
	/// # Example
	///
	/// ```rust
	/// use std::sync::Arc;
	/// use reinhardt_openapi::generator::{DocumentationGenerator, OperationKind};
	/// use reinhardt_openapi::options::Options;
	///
	/// let generator = DocumentationGenerator::new(Arc::new(Options::default()));
	/// let responses = generator.responses_for(OperationKind::Delete, None);
	///
	/// let codes: Vec<&str> = responses.responses.keys().map(String::as_str).collect();
	/// assert_eq!(codes, vec!["204", "404"]);
	/// ```
	pub fn responses_for(&self, kind: OperationKind, declared: Option<Responses>) -> Responses {
		let declared = declared.filter(|responses| !responses.responses.is_empty());

		match declared {
			Some(declared) if !self.options.override_responses() => declared,
			declared => {
				let mut merged: IndexMap<String, RefOr<Response>> = kind
					.default_responses()
					.into_iter()
					.map(|(code, description)| {
						(code.to_string(), RefOr::T(ResponseBuilder::new().description(description).build()))
					})
					.collect();
				if let Some(declared) = declared {
					merged.extend(declared.responses);
				}
				ResponsesBuilder::new().responses_from_iter(merged).build()
			}
		}
	}

	/// Settings for Swagger UI
	///
	/// URLs the configured flow never calls are left out.
	///
	/// # Example
	///
	/// ```rust
	/// use std::sync::Arc;
	/// use reinhardt_openapi::generator::DocumentationGenerator;
	/// use reinhardt_openapi::options::Options;
	///
	/// let options = Options::builder().persist_authorization(true).build();
	/// let parameters = DocumentationGenerator::new(Arc::new(options)).swagger_ui_parameters();
	///
	/// assert_eq!(parameters["persistAuthorization"], true);
	/// assert_eq!(parameters["oauth"]["enabled"], false);
	/// ```
	pub fn swagger_ui_parameters(&self) -> Value {
		let options = &self.options;
		let flow = options.oauth_flow();

		let mut oauth = Map::new();
		oauth.insert("enabled".to_string(), json!(options.oauth_enabled()));
		oauth.insert("type".to_string(), json!(options.oauth_type()));
		oauth.insert("flow".to_string(), json!(flow.as_str()));
		if flow.uses_token_url() {
			oauth.insert("tokenUrl".to_string(), json!(options.oauth_token_url()));
		}
		if flow.uses_authorization_url() {
			oauth.insert(
				"authorizationUrl".to_string(),
				json!(options.oauth_authorization_url()),
			);
		}
		oauth.insert("refreshUrl".to_string(), json!(options.oauth_refresh_url()));
		oauth.insert(
			"scopes".to_string(),
			json!(options.oauth_scopes().keys().collect::<Vec<_>>()),
		);

		json!({
			"persistAuthorization": options.persist_authorization(),
			"oauth": oauth,
		})
	}

	fn oauth2(&self) -> OAuth2 {
		let options = &self.options;
		let scopes = if options.oauth_scopes().is_empty() {
			Scopes::new()
		} else {
			Scopes::from_iter(
				options
					.oauth_scopes()
					.iter()
					.map(|(name, description)| (name.as_str(), description.as_str())),
			)
		};

		let authorization_url = options.oauth_authorization_url();
		let token_url = options.oauth_token_url();
		let refresh_url = options.oauth_refresh_url();

		let flow = match options.oauth_flow() {
			OAuthFlow::Implicit => Flow::Implicit(Implicit::with_refresh_url(authorization_url, scopes, refresh_url)),
			OAuthFlow::Password => Flow::Password(Password::with_refresh_url(token_url, scopes, refresh_url)),
			OAuthFlow::ClientCredentials => {
				Flow::ClientCredentials(ClientCredentials::with_refresh_url(token_url, scopes, refresh_url))
			}
			OAuthFlow::AuthorizationCode => Flow::AuthorizationCode(AuthorizationCode::with_refresh_url(
				authorization_url,
				token_url,
				scopes,
				refresh_url,
			)),
		};

		OAuth2::with_description([flow], format!("OAuth 2.0 {} Grant", options.oauth_flow()))
	}
}

fn non_empty(value: &str) -> Option<&str> {
	(!value.is_empty()).then_some(value)
}
