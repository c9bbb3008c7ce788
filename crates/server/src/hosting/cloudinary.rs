use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, info, instrument};

use crate::config::HostingConfig;
use crate::hosting::{FileHost, HostedFile, HostingError, UploadRequest};

pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_NAME";
pub const API_KEY_VAR: &str = "CLOUDINARY_KEY";
pub const API_SECRET_VAR: &str = "CLOUDINARY_SECRET";

#[derive(Clone, Debug)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryCredentials {
    pub fn from_env() -> Result<Self, HostingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, HostingError> {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(HostingError::MissingCredential(key))
        };
        Ok(Self {
            cloud_name: require(CLOUD_NAME_VAR)?,
            api_key: require(API_KEY_VAR)?,
            api_secret: require(API_SECRET_VAR)?,
        })
    }
}

/// Signs request parameters: sorted `k=v` pairs joined by `&`, secret appended, SHA-1 hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryHost {
    client: Client,
    api_base: String,
    /// Read from the environment on every call when unset.
    credentials: Option<CloudinaryCredentials>,
}

impl CloudinaryHost {
    pub fn new(config: &HostingConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(config: &HostingConfig, credentials: CloudinaryCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::new(config)
        }
    }

    fn credentials(&self) -> Result<CloudinaryCredentials, HostingError> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => CloudinaryCredentials::from_env(),
        }
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, HostingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(HostingError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FileHost for CloudinaryHost {
    #[instrument(skip(self))]
    async fn upload(&self, request: UploadRequest) -> Result<HostedFile, HostingError> {
        let credentials = self.credentials()?;
        let timestamp = Utc::now().timestamp().to_string();
        let tags = request.tags.join(",");
        let signature = sign(
            &[
                ("public_id", request.public_id.as_str()),
                ("tags", tags.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &credentials.api_secret,
        );

        let content = tokio::fs::read(&request.path).await?;
        let form = Form::new()
            .part("file", Part::bytes(content).file_name(request.file_name))
            .text("api_key", credentials.api_key)
            .text("timestamp", timestamp)
            .text("public_id", request.public_id)
            .text("tags", tags)
            .text("signature", signature);

        let url = format!("{}/{}/auto/upload", self.api_base, credentials.cloud_name);
        let response = self.client.post(url).multipart(form).send().await?;
        let hosted: HostedFile = parse_response(response).await?;
        info!("file uploaded to host as `{}`", hosted.public_id);
        Ok(hosted)
    }

    #[instrument(skip(self))]
    async fn destroy(&self, file: &HostedFile) -> Result<(), HostingError> {
        let credentials = self.credentials()?;
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("public_id", file.public_id.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &credentials.api_secret,
        );
        let url = format!(
            "{}/{}/{}/destroy",
            self.api_base, credentials.cloud_name, file.resource_type
        );
        let response = self
            .client
            .post(url)
            .form(&[
                ("public_id", file.public_id.as_str()),
                ("api_key", credentials.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;
        let outcome: DestroyResponse = parse_response(response).await?;
        debug!("host destroy of `{}`: {}", file.public_id, outcome.result);
        Ok(())
    }
}
