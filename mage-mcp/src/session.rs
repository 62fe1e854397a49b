//! Session lifecycle
//!
//! A session owns the single [`MageClient`] used for its lifetime. Every
//! resource read and tool call borrows it through [`Session::client`].

use thiserror::Error;

use mage_client::{ClientError, MageClient};

use crate::config::{Config, ConfigError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug)]
pub struct Session {
    client: MageClient,
}

impl Session {
    /// Validate the configuration and build the session's client
    pub fn start(config: &Config) -> Result<Self, SessionError> {
        config.validate()?;

        let client =
            MageClient::with_options(&config.api_url, config.api_key.as_deref(), config.timeout)?;

        tracing::info!(
            "Session started against {} (api key: {})",
            client.base_url(),
            if config.api_key.is_some() { "set" } else { "none" }
        );
        Ok(Self { client })
    }

    pub fn client(&self) -> &MageClient {
        &self.client
    }

    /// Release the client; consuming `self` makes this happen once
    pub fn end(self) {
        tracing::info!("Session against {} ended", self.client.base_url());
        drop(self.client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_rejects_invalid_config() {
        let config = Config::new("ftp://mage");
        assert!(matches!(
            Session::start(&config),
            Err(SessionError::Config(ConfigError::InvalidUrl))
        ));

        let config = Config::default().with_timeout(Duration::ZERO);
        assert!(matches!(
            Session::start(&config),
            Err(SessionError::Config(ConfigError::ZeroTimeout))
        ));
    }

    #[test]
    fn test_start_builds_client_from_config() {
        let config = Config::new("http://mage.local:6789/api/").with_api_key("secret");
        let session = Session::start(&config).unwrap();

        assert_eq!(session.client().base_url(), "http://mage.local:6789/api");
        session.end();
    }

    #[tokio::test]
    async fn test_session_client_reaches_service() {
        let addr = mage_mock::spawn().await.unwrap();
        let session = Session::start(&Config::new(mage_mock::api_url(addr))).unwrap();

        let pipelines = session.client().list_pipelines().await.unwrap();

        assert_eq!(pipelines.len(), 2);
        session.end();
    }
}
