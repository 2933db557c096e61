//! API documentation options
//!
//! [`Options`] is a read-only record built once at startup, either with
//! [`OptionsBuilder`] or from a TOML table, and then shared with the
//! [`DocumentationGenerator`](crate::generator::DocumentationGenerator).

use crate::error::{OpenApiError, OpenApiResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OAuth 2.0 grant type advertised in the documentation
///
/// Parsed from its camel case name; `application` and `accessCode` are
/// accepted as the OAuth 2.0 draft names of the client credentials and
/// authorization code grants.
///
/// # Examples
///
/// ```
/// use reinhardt_openapi::options::OAuthFlow;
///
/// assert_eq!("application".parse::<OAuthFlow>().unwrap(), OAuthFlow::ClientCredentials);
/// assert_eq!(OAuthFlow::AuthorizationCode.to_string(), "authorizationCode");
/// assert!("magic".parse::<OAuthFlow>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OAuthFlow {
	Implicit,
	Password,
	ClientCredentials,
	AuthorizationCode,
}

impl OAuthFlow {
	pub fn as_str(&self) -> &'static str {
		match self {
			OAuthFlow::Implicit => "implicit",
			OAuthFlow::Password => "password",
			OAuthFlow::ClientCredentials => "clientCredentials",
			OAuthFlow::AuthorizationCode => "authorizationCode",
		}
	}

	/// Whether the grant redirects the user agent to the authorization URL
	pub fn uses_authorization_url(&self) -> bool {
		matches!(self, OAuthFlow::Implicit | OAuthFlow::AuthorizationCode)
	}

	/// Whether the grant exchanges credentials at the token URL
	pub fn uses_token_url(&self) -> bool {
		!matches!(self, OAuthFlow::Implicit)
	}
}

impl FromStr for OAuthFlow {
	type Err = OpenApiError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"implicit" => Ok(OAuthFlow::Implicit),
			"password" => Ok(OAuthFlow::Password),
			"clientCredentials" | "application" => Ok(OAuthFlow::ClientCredentials),
			"authorizationCode" | "accessCode" => Ok(OAuthFlow::AuthorizationCode),
			other => Err(OpenApiError::InvalidOAuthFlow(other.to_string())),
		}
	}
}

impl TryFrom<String> for OAuthFlow {
	type Error = OpenApiError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<OAuthFlow> for String {
	fn from(flow: OAuthFlow) -> Self {
		flow.as_str().to_string()
	}
}

impl fmt::Display for OAuthFlow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where an API key is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiKeyLocation {
	Query,
	Header,
	Cookie,
}

impl ApiKeyLocation {
	pub fn as_str(&self) -> &'static str {
		match self {
			ApiKeyLocation::Query => "query",
			ApiKeyLocation::Header => "header",
			ApiKeyLocation::Cookie => "cookie",
		}
	}
}

impl FromStr for ApiKeyLocation {
	type Err = OpenApiError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"query" => Ok(ApiKeyLocation::Query),
			"header" => Ok(ApiKeyLocation::Header),
			"cookie" => Ok(ApiKeyLocation::Cookie),
			other => Err(OpenApiError::InvalidApiKeyLocation(other.to_string())),
		}
	}
}

impl TryFrom<String> for ApiKeyLocation {
	type Error = OpenApiError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<ApiKeyLocation> for String {
	fn from(location: ApiKeyLocation) -> Self {
		location.as_str().to_string()
	}
}

impl fmt::Display for ApiKeyLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An API key accepted by the documented API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyDefinition {
	name: String,
	#[serde(rename = "type")]
	location: ApiKeyLocation,
}

impl ApiKeyDefinition {
	pub fn new(name: impl Into<String>, location: ApiKeyLocation) -> Self {
		Self {
			name: name.into(),
			location,
		}
	}

	/// Name of the header, query parameter or cookie carrying the key
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn location(&self) -> ApiKeyLocation {
		self.location
	}
}

/// API documentation options
///
/// # Examples
///
/// ```
/// use reinhardt_openapi::options::{ApiKeyLocation, OAuthFlow, Options};
///
/// let options = Options::builder()
///     .title("Library API")
///     .version("1.2.0")
///     .oauth_enabled(true)
///     .oauth_flow(OAuthFlow::AuthorizationCode)
///     .oauth_scope("books:read", "Read books")
///     .api_key("apiKey", "X-API-KEY", ApiKeyLocation::Header)
///     .build();
///
/// assert_eq!(options.title(), "Library API");
/// assert_eq!(options.oauth_flow(), OAuthFlow::AuthorizationCode);
/// assert_eq!(options.api_keys()["apiKey"].name(), "X-API-KEY");
/// assert!(options.override_responses());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
	title: String,
	description: String,
	version: String,
	oauth_enabled: bool,
	oauth_type: String,
	oauth_flow: OAuthFlow,
	oauth_token_url: String,
	oauth_authorization_url: String,
	oauth_refresh_url: String,
	oauth_scopes: IndexMap<String, String>,
	api_keys: IndexMap<String, ApiKeyDefinition>,
	contact_name: Option<String>,
	contact_url: Option<String>,
	contact_email: Option<String>,
	terms_of_service: Option<String>,
	license_name: Option<String>,
	license_url: Option<String>,
	override_responses: bool,
	persist_authorization: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			title: String::new(),
			description: String::new(),
			version: String::new(),
			oauth_enabled: false,
			oauth_type: "oauth2".to_string(),
			oauth_flow: OAuthFlow::ClientCredentials,
			oauth_token_url: "/oauth/v2/token".to_string(),
			oauth_authorization_url: "/oauth/v2/auth".to_string(),
			oauth_refresh_url: "/oauth/v2/refresh".to_string(),
			oauth_scopes: IndexMap::new(),
			api_keys: IndexMap::new(),
			contact_name: None,
			contact_url: None,
			contact_email: None,
			terms_of_service: None,
			license_name: None,
			license_url: None,
			override_responses: true,
			persist_authorization: false,
		}
	}
}

impl Options {
	pub fn builder() -> OptionsBuilder {
		OptionsBuilder::new()
	}

	/// Load options from a TOML document; missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_openapi::options::{OAuthFlow, Options};
	///
	/// let options = Options::from_toml_str(r#"
	///     title = "Library API"
	///     oauth_enabled = true
	///     oauth_flow = "accessCode"
	///
	///     [oauth_scopes]
	///     "books:read" = "Read books"
	/// "#).unwrap();
	///
	/// assert_eq!(options.oauth_flow(), OAuthFlow::AuthorizationCode);
	/// assert_eq!(options.oauth_scopes()["books:read"], "Read books");
	/// assert_eq!(options.oauth_token_url(), "/oauth/v2/token");
	/// ```
	pub fn from_toml_str(source: &str) -> OpenApiResult<Self> {
		let options: Self = toml::from_str(source)?;
		tracing::debug!(title = %options.title, version = %options.version, "loaded documentation options");
		Ok(options)
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn oauth_enabled(&self) -> bool {
		self.oauth_enabled
	}

	/// Security scheme type of the OAuth scheme, `oauth2` by default
	pub fn oauth_type(&self) -> &str {
		&self.oauth_type
	}

	pub fn oauth_flow(&self) -> OAuthFlow {
		self.oauth_flow
	}

	pub fn oauth_token_url(&self) -> &str {
		&self.oauth_token_url
	}

	pub fn oauth_authorization_url(&self) -> &str {
		&self.oauth_authorization_url
	}

	pub fn oauth_refresh_url(&self) -> &str {
		&self.oauth_refresh_url
	}

	/// Scope name to description
	pub fn oauth_scopes(&self) -> &IndexMap<String, String> {
		&self.oauth_scopes
	}

	/// Security scheme name to API key
	pub fn api_keys(&self) -> &IndexMap<String, ApiKeyDefinition> {
		&self.api_keys
	}

	pub fn contact_name(&self) -> Option<&str> {
		self.contact_name.as_deref()
	}

	pub fn contact_url(&self) -> Option<&str> {
		self.contact_url.as_deref()
	}

	pub fn contact_email(&self) -> Option<&str> {
		self.contact_email.as_deref()
	}

	pub fn terms_of_service(&self) -> Option<&str> {
		self.terms_of_service.as_deref()
	}

	pub fn license_name(&self) -> Option<&str> {
		self.license_name.as_deref()
	}

	pub fn license_url(&self) -> Option<&str> {
		self.license_url.as_deref()
	}

	/// Whether default responses are added to operations that declare their own
	pub fn override_responses(&self) -> bool {
		self.override_responses
	}

	/// Whether Swagger UI keeps the authorization across page reloads
	pub fn persist_authorization(&self) -> bool {
		self.persist_authorization
	}
}

/// Consuming builder for [`Options`]
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
	options: Options,
}

impl OptionsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.options.title = title.into();
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.options.description = description.into();
		self
	}

	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.options.version = version.into();
		self
	}

	pub fn oauth_enabled(mut self, enabled: bool) -> Self {
		self.options.oauth_enabled = enabled;
		self
	}

	pub fn oauth_type(mut self, oauth_type: impl Into<String>) -> Self {
		self.options.oauth_type = oauth_type.into();
		self
	}

	pub fn oauth_flow(mut self, flow: OAuthFlow) -> Self {
		self.options.oauth_flow = flow;
		self
	}

	pub fn oauth_token_url(mut self, url: impl Into<String>) -> Self {
		self.options.oauth_token_url = url.into();
		self
	}

	pub fn oauth_authorization_url(mut self, url: impl Into<String>) -> Self {
		self.options.oauth_authorization_url = url.into();
		self
	}

	pub fn oauth_refresh_url(mut self, url: impl Into<String>) -> Self {
		self.options.oauth_refresh_url = url.into();
		self
	}

	/// Add one OAuth scope
	pub fn oauth_scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
		self.options.oauth_scopes.insert(name.into(), description.into());
		self
	}

	/// Add one API key under the security scheme name `scheme`
	pub fn api_key(
		mut self,
		scheme: impl Into<String>,
		name: impl Into<String>,
		location: ApiKeyLocation,
	) -> Self {
		self.options
			.api_keys
			.insert(scheme.into(), ApiKeyDefinition::new(name, location));
		self
	}

	pub fn contact_name(mut self, name: impl Into<String>) -> Self {
		self.options.contact_name = Some(name.into());
		self
	}

	pub fn contact_url(mut self, url: impl Into<String>) -> Self {
		self.options.contact_url = Some(url.into());
		self
	}

	pub fn contact_email(mut self, email: impl Into<String>) -> Self {
		self.options.contact_email = Some(email.into());
		self
	}

	pub fn terms_of_service(mut self, url: impl Into<String>) -> Self {
		self.options.terms_of_service = Some(url.into());
		self
	}

	pub fn license_name(mut self, name: impl Into<String>) -> Self {
		self.options.license_name = Some(name.into());
		self
	}

	pub fn license_url(mut self, url: impl Into<String>) -> Self {
		self.options.license_url = Some(url.into());
		self
	}

	pub fn override_responses(mut self, override_responses: bool) -> Self {
		self.options.override_responses = override_responses;
		self
	}

	pub fn persist_authorization(mut self, persist: bool) -> Self {
		self.options.persist_authorization = persist;
		self
	}

	pub fn build(self) -> Options {
		self.options
	}
}
