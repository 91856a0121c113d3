use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::Error;

/// Builder for the shared provider HTTP client
pub struct BaseProviderBuilder {
    pub client_builder: ClientBuilder,
    pub info: ProviderInfo,
}

/// Shared provider state: configured HTTP client and identity
pub struct BaseProvider {
    pub client: Client,
    pub info: ProviderInfo,
}

/// Provider identity shown in listings and error messages
pub struct ProviderInfo {
    pub name: String,
    pub description: String,
}

impl BaseProviderBuilder {
    pub fn new(info: ProviderInfo) -> Self {
        let client_builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("prayer-csv/0.1.0")
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert("Accept", "application/json".parse().unwrap());
                headers.insert(
                    "Accept-Encoding",
                    "br;q=1.0, gzip;q=0.9, deflate;q=0.8".parse().unwrap(),
                );
                headers
            });

        Self {
            client_builder,
            info,
        }
    }

    pub fn build(self) -> BaseProvider {
        let client = self
            .client_builder
            .build()
            .expect("Failed to create HTTP client");

        BaseProvider {
            client,
            info: self.info,
        }
    }
}

impl BaseProvider {
    /// Map a transport error to the crate error taxonomy
    pub fn handle_error_req(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout
        } else if error.is_request() {
            Error::Provider {
                provider: self.info.name.clone(),
                message: format!("Request failed: {}", error),
            }
        } else {
            Error::Http(error)
        }
    }

    pub fn custom_error(&self, message: impl Into<String>) -> Error {
        Error::Provider {
            provider: self.info.name.clone(),
            message: message.into(),
        }
    }
}
