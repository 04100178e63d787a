#![deny(clippy::all, clippy::pedantic)]

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or ATELIER_SITE_URL)")]
    MissingSite,
    #[error("credentials are required (use --email plus ATELIER_ADMIN_PASSWORD)")]
    MissingCredentials,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmittedPost {
    pub id: uuid::Uuid,
    pub title: String,
}

impl Ctx {
    pub fn new(site: &str, email: String, password: String) -> Result<Self, CliError> {
        let base = Url::parse(site)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            email,
            password,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("atelier-cli/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, path: &str) -> Result<Url, CliError> {
        self.base.join(path).map_err(CliError::Url)
    }

    /// Sign in with the service credentials and return the bearer token.
    pub async fn sign_in(&self) -> Result<String, CliError> {
        let resp = self
            .client
            .post(self.url("/admin/session")?)
            .json(&serde_json::json!({
                "email": self.email,
                "password": self.password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CliError::Server(format!("status {status} body {text}")));
        }

        let session: SessionResponse = resp
            .json()
            .await
            .map_err(|e| CliError::Server(format!("failed to parse session: {e}")))?;
        Ok(session.token)
    }

    pub async fn create_post(
        &self,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<SubmittedPost, CliError> {
        let resp = self
            .client
            .post(self.url("/admin/posts")?)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(CliError::Server(format!("status {status} body {text}")));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let site = cli.site.clone().ok_or(CliError::MissingSite)?;
    let email = cli.email.clone().ok_or(CliError::MissingCredentials)?;
    let password = cli.password.clone().ok_or(CliError::MissingCredentials)?;

    Ctx::new(&site, email, password)
}
