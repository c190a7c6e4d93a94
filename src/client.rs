use std::{sync::Arc, time::Duration};

use crate::{
    api_key::ApiKey,
    capabilities::{Capabilities, Capability, DEFAULT_CAPABILITIES},
    completions::CompletionsClient,
    edits::EditsClient,
    embeddings::EmbeddingsClient,
    engines::EnginesClient,
    errors::{CapabilityError, ConnectionError, ConnectionErrorKind, Error, Result, ValidationError},
    files::FilesClient,
    fine_tunes::FineTunesClient,
    http::{BaseUri, Headers},
    images::ImagesClient,
    models::ModelsClient,
    moderations::ModerationsClient,
    transporter::{HttpTransporter, Transporter},
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    GOOSE_AI_BASE_URL,
};

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Defaults to `api.openai.com/v1`; a missing scheme means `https://`.
    pub base_url: Option<String>,
    /// Sent as the `OpenAI-Organization` header when set.
    pub organization: Option<String>,
    /// Defaults to [`DEFAULT_CAPABILITIES`].
    pub capabilities: Option<Capabilities>,
    pub http_client: Option<reqwest::blocking::Client>,
    /// Override the connect timeout (defaults to 5s). Ignored with `http_client`.
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 120s). Ignored with `http_client`.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// GooseAI preset: its base URL plus completions and engines only.
    pub fn goose_ai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: Some(GOOSE_AI_BASE_URL.to_string()),
            capabilities: Some(Capabilities::goose_ai()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }
}

/// Entry point to the API resources.
///
/// Resource accessors check the client's [`Capabilities`] and return a fresh,
/// stateless resource client sharing this client's transporter.
#[derive(Clone)]
pub struct Client {
    transporter: Arc<dyn Transporter>,
    capabilities: Capabilities,
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
        let api_key = ApiKey::parse(cfg.api_key.as_deref().unwrap_or_default())?;
        let base_uri = BaseUri::parse(cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let mut headers = Headers::with_authorization(&api_key);
        if let Some(organization) = cfg.organization.as_deref() {
            if organization.trim().is_empty() {
                return Err(Error::Validation(
                    ValidationError::new("organization must not be empty")
                        .with_field("organization"),
                ));
            }
            headers = headers.with_organization(organization.trim());
        }

        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::blocking::Client::builder()
                .user_agent(DEFAULT_USER_AGENT)
                .connect_timeout(cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
                .build()
                .map_err(|err| ConnectionError {
                    kind: ConnectionErrorKind::Other,
                    message: "failed to build http client".to_string(),
                    source: Some(err),
                })?,
        };

        let transporter = HttpTransporter::new(http, base_uri, headers)?;
        Ok(Self::with_transporter(
            Arc::new(transporter),
            cfg.capabilities.unwrap_or(DEFAULT_CAPABILITIES),
        ))
    }

    /// Builds a client over any transporter, e.g. a mock in tests.
    pub fn with_transporter(transporter: Arc<dyn Transporter>, capabilities: Capabilities) -> Self {
        Self {
            transporter,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn require(&self, capability: Capability) -> Result<Arc<dyn Transporter>> {
        if !self.capabilities.is_enabled(capability) {
            return Err(CapabilityError { capability }.into());
        }
        Ok(self.transporter.clone())
    }

    pub fn completions(&self) -> Result<CompletionsClient> {
        Ok(CompletionsClient {
            transporter: self.require(Capability::Completions)?,
        })
    }

    pub fn edits(&self) -> Result<EditsClient> {
        Ok(EditsClient {
            transporter: self.require(Capability::Edits)?,
        })
    }

    pub fn embeddings(&self) -> Result<EmbeddingsClient> {
        Ok(EmbeddingsClient {
            transporter: self.require(Capability::Embeddings)?,
        })
    }

    pub fn files(&self) -> Result<FilesClient> {
        Ok(FilesClient {
            transporter: self.require(Capability::Files)?,
        })
    }

    pub fn fine_tunes(&self) -> Result<FineTunesClient> {
        Ok(FineTunesClient {
            transporter: self.require(Capability::FineTunes)?,
        })
    }

    pub fn images(&self) -> Result<ImagesClient> {
        Ok(ImagesClient {
            transporter: self.require(Capability::Images)?,
        })
    }

    pub fn moderations(&self) -> Result<ModerationsClient> {
        Ok(ModerationsClient {
            transporter: self.require(Capability::Moderations)?,
        })
    }

    pub fn engines(&self) -> Result<EnginesClient> {
        Ok(EnginesClient {
            transporter: self.require(Capability::Engines)?,
        })
    }

    /// The model catalog for this provider.
    ///
    /// With `engines` enabled this is the engines catalog. Otherwise the
    /// models resource is returned, gated on the `completions` capability
    /// rather than `models`; that coupling is kept for compatibility with
    /// existing capability maps and may be narrowed to `models` later.
    pub fn models(&self) -> Result<ModelCatalog> {
        if self.capabilities.is_enabled(Capability::Engines) {
            return self.engines().map(ModelCatalog::Engines);
        }
        Ok(ModelCatalog::Models(ModelsClient {
            transporter: self.require(Capability::Completions)?,
        }))
    }
}

/// Which catalog resource [`Client::models`] resolved to.
#[derive(Clone)]
pub enum ModelCatalog {
    Models(ModelsClient),
    Engines(EnginesClient),
}

impl ModelCatalog {
    pub fn into_models(self) -> Option<ModelsClient> {
        match self {
            ModelCatalog::Models(models) => Some(models),
            ModelCatalog::Engines(_) => None,
        }
    }

    pub fn into_engines(self) -> Option<EnginesClient> {
        match self {
            ModelCatalog::Engines(engines) => Some(engines),
            ModelCatalog::Models(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{mock::MockTransporter, response::ApiResponse, testing::mock_client};

    fn client_with(caps: Capabilities, mock: MockTransporter) -> (Client, Arc<MockTransporter>) {
        mock_client(mock, caps)
    }

    fn engines_body() -> serde_json::Value {
        json!({
            "object": "list",
            "data": [{"id": "gpt-neo-20b", "object": "engine", "owner": "goose.ai", "ready": true}]
        })
    }

    fn expect_capability_error<T>(result: Result<T>, expected: Capability) {
        match result {
            Err(Error::Capability(err)) => assert_eq!(err.capability, expected),
            Err(other) => panic!("expected capability error, got {other:?}"),
            Ok(_) => panic!("expected capability error for {expected}"),
        }
    }

    #[test]
    fn default_client_allows_everything_but_engines() {
        let (client, _) = client_with(Capabilities::default(), MockTransporter::new());
        assert!(client.completions().is_ok());
        assert!(client.edits().is_ok());
        assert!(client.embeddings().is_ok());
        assert!(client.files().is_ok());
        assert!(client.fine_tunes().is_ok());
        assert!(client.images().is_ok());
        assert!(client.moderations().is_ok());
        assert!(matches!(client.models(), Ok(ModelCatalog::Models(_))));
        expect_capability_error(client.engines(), Capability::Engines);
    }

    #[test]
    fn disabled_capability_fails_every_call_and_leaves_others_alone() {
        let caps = Capabilities::default().disable(Capability::Files);
        let (client, _) = client_with(caps, MockTransporter::new());
        for _ in 0..3 {
            expect_capability_error(client.files(), Capability::Files);
        }
        assert!(client.completions().is_ok());
        assert!(client.fine_tunes().is_ok());
        assert!(client.images().is_ok());
    }

    #[test]
    fn each_accessor_checks_its_own_capability() {
        let cases: Vec<(Capability, fn(&Client) -> Result<()>)> = vec![
            (Capability::Completions, |c: &Client| c.completions().map(|_| ())),
            (Capability::Edits, |c: &Client| c.edits().map(|_| ())),
            (Capability::Embeddings, |c: &Client| c.embeddings().map(|_| ())),
            (Capability::Files, |c: &Client| c.files().map(|_| ())),
            (Capability::FineTunes, |c: &Client| c.fine_tunes().map(|_| ())),
            (Capability::Images, |c: &Client| c.images().map(|_| ())),
            (Capability::Moderations, |c: &Client| c.moderations().map(|_| ())),
        ];
        for (capability, access) in cases {
            let (client, _) = client_with(
                Capabilities::default().disable(capability),
                MockTransporter::new(),
            );
            expect_capability_error(access(&client), capability);
        }
    }

    #[test]
    fn models_requires_completions_when_engines_are_off() {
        let caps = Capabilities::default().disable(Capability::Completions);
        let (client, _) = client_with(caps, MockTransporter::new());
        expect_capability_error(client.models(), Capability::Completions);

        let caps = Capabilities::default().disable(Capability::Models);
        let (client, _) = client_with(caps, MockTransporter::new());
        assert!(client.models().is_ok());
    }

    #[test]
    fn models_redirects_to_engines_when_enabled() {
        let mock = MockTransporter::new()
            .with_response(engines_body())
            .with_response(engines_body());
        let (client, mock) = client_with(Capabilities::goose_ai(), mock);

        let via_models = match client.models().unwrap() {
            ModelCatalog::Engines(engines) => engines.list().unwrap(),
            ModelCatalog::Models(_) => panic!("expected engines catalog"),
        };
        let direct = client.engines().unwrap().list().unwrap();

        assert_eq!(via_models, direct);
        assert_eq!(via_models.to_value(), engines_body());
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[0].path(), "/engines");
    }

    #[test]
    fn resource_clients_share_the_transporter() {
        let mock = MockTransporter::new()
            .with_response(json!({"id": "file-1", "object": "file", "deleted": true}))
            .with_response(json!({"id": "m", "object": "model", "deleted": true}));
        let (client, mock) = client_with(Capabilities::default(), mock);

        client.files().unwrap().delete("file-1").unwrap();
        client
            .models()
            .unwrap()
            .into_models()
            .unwrap()
            .delete("m")
            .unwrap();

        let paths: Vec<_> = mock.requests().iter().map(|p| p.path()).collect();
        assert_eq!(paths, ["/files/file-1", "/models/m"]);
    }

    #[test]
    fn new_rejects_missing_empty_or_unsendable_key() {
        assert!(matches!(Client::new(Config::default()), Err(Error::Validation(_))));
        assert!(matches!(Client::new(Config::new("")), Err(Error::Validation(_))));
        assert!(Client::new(Config::new(" ")).is_ok());
        assert!(matches!(Client::new(Config::new("sk-\nbroken")), Err(Error::Validation(_))));
    }

    #[test]
    fn new_rejects_bad_base_url_and_organization() {
        let err = Client::new(Config::new("sk-test").with_base_url("http://bad host")).err();
        assert!(matches!(err, Some(Error::Validation(_))));

        let err = Client::new(Config::new("sk-test").with_organization(" ")).err();
        assert!(matches!(err, Some(Error::Validation(_))));
    }

    #[test]
    fn test_clients_honor_capabilities() {
        let client = crate::testing::test_client("http://127.0.0.1:9");
        assert_eq!(client.capabilities(), &DEFAULT_CAPABILITIES);

        let client = crate::testing::test_client_with("http://127.0.0.1:9", Capabilities::none());
        expect_capability_error(client.completions(), Capability::Completions);
        expect_capability_error(client.models(), Capability::Completions);
    }

    #[test]
    fn goose_ai_preset_configures_capabilities() {
        let client = Client::new(Config::goose_ai("goose-key")).unwrap();
        assert_eq!(client.capabilities(), &Capabilities::goose_ai());
        assert!(matches!(client.models(), Ok(ModelCatalog::Engines(_))));
        expect_capability_error(client.files(), Capability::Files);
    }
}
