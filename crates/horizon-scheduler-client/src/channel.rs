//! Channel construction for the scheduler service.
//!
//! Builds the single shared tonic channel a transport multiplexes all of
//! its calls over. Connections are always TLS; mutual TLS is supported by
//! supplying a client identity in PEM form.

use std::time::Duration;

use tonic::transport::{Channel, ClientTlsConfig, Identity, Uri};

use crate::error::{Result, SchedulerError};

/// Append the default HTTPS port when the host does not carry one.
pub(crate) fn normalize_authority(host: &str) -> String {
    if host.contains(':') {
        host.to_string()
    } else {
        format!("{host}:443")
    }
}

/// Configuration for the shared channel of a transport.
///
/// Two acquisition modes share this configuration: [`connect`] dials
/// eagerly and surfaces resolution or dial failures right away, while
/// [`connect_lazy`] defers the dial to the first call.
///
/// [`connect`]: ChannelConfig::connect
/// [`connect_lazy`]: ChannelConfig::connect_lazy
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    authority: String,
    identity: Option<(Vec<u8>, Vec<u8>)>,
    connect_timeout: Option<Duration>,
}

impl ChannelConfig {
    /// Create a configuration for the given host.
    ///
    /// The host may carry an explicit port; port 443 is assumed otherwise.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            authority: normalize_authority(&host.into()),
            identity: None,
            connect_timeout: None,
        }
    }

    /// The `host:port` authority this configuration dials.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Present a client certificate and private key, both PEM-encoded,
    /// for mutual TLS.
    pub fn identity_pem(mut self, cert: Vec<u8>, key: Vec<u8>) -> Self {
        self.identity = Some((cert, key));
        self
    }

    /// Maximum time to wait for connection establishment.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    fn endpoint(&self) -> Result<tonic::transport::Endpoint> {
        let uri: Uri = format!("https://{}", self.authority)
            .parse()
            .map_err(|e| SchedulerError::InvalidEndpoint(format!("{}: {e}", self.authority)))?;

        let mut endpoint = tonic::transport::Endpoint::from(uri);

        let mut tls = ClientTlsConfig::new().with_native_roots();
        if let Some((cert, key)) = &self.identity {
            tls = tls.identity(Identity::from_pem(cert, key));
        }
        endpoint = endpoint
            .tls_config(tls)
            .map_err(|e| SchedulerError::Tls(e.to_string()))?;

        if let Some(timeout) = self.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }
        endpoint = endpoint.tcp_nodelay(true);

        Ok(endpoint)
    }

    /// Dial the endpoint and return the connected channel.
    ///
    /// DNS resolution and the TLS handshake happen here; failures surface
    /// as [`SchedulerError::Connection`] and are not retried. Per-call
    /// retry is layered above the channel.
    pub async fn connect(&self) -> Result<Channel> {
        let channel = self
            .endpoint()?
            .connect()
            .await
            .map_err(|e| SchedulerError::Connection(e.to_string()))?;
        tracing::debug!(authority = %self.authority, "channel connected");
        Ok(channel)
    }

    /// Build a channel that dials on first use.
    pub fn connect_lazy(&self) -> Result<Channel> {
        Ok(self.endpoint()?.connect_lazy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_applied() {
        let config = ChannelConfig::new("cloudscheduler.googleapis.com");
        assert_eq!(config.authority(), "cloudscheduler.googleapis.com:443");
    }

    #[test]
    fn test_explicit_port_preserved() {
        let config = ChannelConfig::new("localhost:8443");
        assert_eq!(config.authority(), "localhost:8443");
    }

    #[tokio::test]
    async fn test_connect_lazy_performs_no_io() {
        let config = ChannelConfig::new("cloudscheduler.googleapis.com")
            .connect_timeout(Duration::from_secs(5));
        assert!(config.connect_lazy().is_ok());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let config = ChannelConfig::new("not a host name");
        assert!(matches!(
            config.connect_lazy(),
            Err(SchedulerError::InvalidEndpoint(_))
        ));
    }
}
