//! Transport construction and the abstract capability contract.
//!
//! A transport owns one shared channel, a lazily populated stub cache and
//! the baseline call metadata. Every remote method goes through the same
//! pipeline: look up (or bind) the method's stub, then run it under the
//! method's reliability policy.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tonic::transport::Channel;

use crate::auth::{CallContext, ClientInfo, Credentials, DEFAULT_SCOPES};
use crate::channel::{normalize_authority, ChannelConfig};
use crate::error::{Result, SchedulerError};
use crate::method::{ApiVersion, Method};
use crate::proto::{
    CreateJobRequest, DeleteJobRequest, Empty, GetJobRequest, Job, ListJobsRequest,
    ListJobsResponse, PauseJobRequest, ResumeJobRequest, RunJobRequest, UpdateJobRequest,
};
use crate::stub::{StubCache, UnaryStub};

/// Default host of the scheduler service.
pub const DEFAULT_HOST: &str = "cloudscheduler.googleapis.com";

/// Callback producing a PEM client certificate and private key for
/// mutual TLS.
pub type ClientCertSource = Arc<dyn Fn() -> Result<(Vec<u8>, Vec<u8>)> + Send + Sync>;

/// The capability contract of the scheduler service.
///
/// Both the gRPC transport and any test double implement the same eight
/// operations, so callers are written against this trait and stay
/// transport-agnostic.
#[allow(async_fn_in_trait)]
pub trait SchedulerTransport {
    /// Lists jobs in a location.
    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse>;
    /// Gets a single job.
    async fn get_job(&self, request: GetJobRequest) -> Result<Job>;
    /// Creates a job.
    async fn create_job(&self, request: CreateJobRequest) -> Result<Job>;
    /// Updates a job.
    async fn update_job(&self, request: UpdateJobRequest) -> Result<Job>;
    /// Deletes a job.
    async fn delete_job(&self, request: DeleteJobRequest) -> Result<Empty>;
    /// Pauses a job.
    async fn pause_job(&self, request: PauseJobRequest) -> Result<Job>;
    /// Resumes a paused job.
    async fn resume_job(&self, request: ResumeJobRequest) -> Result<Job>;
    /// Forces a job to run now.
    async fn run_job(&self, request: RunJobRequest) -> Result<Job>;
}

/// Builder for a [`GrpcTransport`].
///
/// # Example
///
/// ```ignore
/// use horizon_scheduler_client::{Credentials, TransportBuilder};
///
/// let transport = TransportBuilder::new()
///     .credentials(Credentials::from_token(token))
///     .connect()
///     .await?;
/// ```
#[derive(Default)]
pub struct TransportBuilder {
    host: Option<String>,
    version: ApiVersion,
    credentials: Option<Credentials>,
    credentials_file: Option<PathBuf>,
    scopes: Option<Vec<String>>,
    channel: Option<Channel>,
    mtls_endpoint: Option<String>,
    client_cert_source: Option<ClientCertSource>,
    quota_project_id: Option<String>,
    client_info: Option<ClientInfo>,
    connect_timeout: Option<Duration>,
}

enum ChannelSource {
    Provided(Channel),
    Config(ChannelConfig),
}

impl TransportBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the service host. Port 443 is assumed when absent.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Select the protocol version. Defaults to v1.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Attach pre-resolved credentials.
    ///
    /// Mutually exclusive with [`credentials_file`](Self::credentials_file).
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load credentials from a file at construction time.
    ///
    /// Mutually exclusive with [`credentials`](Self::credentials).
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Scopes used when resolving credentials. Defaults to the
    /// cloud-platform scope.
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Use an existing channel instead of constructing one.
    ///
    /// The channel takes precedence over host, mutual TLS and connect
    /// timeout settings, and disables ambient credential resolution; the
    /// channel is assumed to carry whatever identity it needs.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Mutual TLS endpoint. Overrides the host when set.
    pub fn mtls_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.mtls_endpoint = Some(endpoint.into());
        self
    }

    /// Callback supplying the PEM client certificate and key used with
    /// the mutual TLS endpoint. Ignored unless
    /// [`mtls_endpoint`](Self::mtls_endpoint) is set.
    pub fn client_cert_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Result<(Vec<u8>, Vec<u8>)> + Send + Sync + 'static,
    {
        self.client_cert_source = Some(Arc::new(source));
        self
    }

    /// Project billed for quota consumed by these calls.
    pub fn quota_project_id(mut self, project: impl Into<String>) -> Self {
        self.quota_project_id = Some(project.into());
        self
    }

    /// Report a custom library name and version to the service.
    pub fn client_info(mut self, info: ClientInfo) -> Self {
        self.client_info = Some(info);
        self
    }

    /// Maximum time to wait for connection establishment.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Validate the configuration and resolve everything except the dial.
    fn prepare(self) -> Result<(ChannelSource, CallContext, ApiVersion, String)> {
        if self.credentials.is_some() && self.credentials_file.is_some() {
            return Err(SchedulerError::Configuration(
                "`credentials` and `credentials_file` are mutually exclusive".into(),
            ));
        }

        let scopes: Vec<String> = self
            .scopes
            .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect());

        let host = match (&self.mtls_endpoint, &self.host) {
            (Some(mtls), _) => normalize_authority(mtls),
            (None, Some(host)) => normalize_authority(host),
            (None, None) => normalize_authority(DEFAULT_HOST),
        };

        let (source, credentials) = if let Some(channel) = self.channel {
            // An explicit channel bypasses the channel provider entirely
            // and disables ambient credential resolution.
            (ChannelSource::Provided(channel), self.credentials)
        } else {
            let credentials = if let Some(path) = self.credentials_file {
                Credentials::from_file(&path, &scopes)?
            } else if let Some(credentials) = self.credentials {
                credentials
            } else {
                Credentials::ambient(&scopes)?
            };

            let mut config = ChannelConfig::new(host.clone());
            if self.mtls_endpoint.is_some() {
                if let Some(cert_source) = &self.client_cert_source {
                    let (cert, key) = cert_source()?;
                    config = config.identity_pem(cert, key);
                }
            }
            if let Some(timeout) = self.connect_timeout {
                config = config.connect_timeout(timeout);
            }
            (ChannelSource::Config(config), Some(credentials))
        };

        let context = CallContext::new(
            credentials.as_ref(),
            self.quota_project_id.as_deref(),
            &self.client_info.unwrap_or_default(),
        )?;

        Ok((source, context, self.version, host))
    }

    /// Build the transport, dialing the service eagerly.
    pub async fn connect(self) -> Result<GrpcTransport> {
        let (source, context, version, host) = self.prepare()?;
        let channel = match source {
            ChannelSource::Provided(channel) => channel,
            ChannelSource::Config(config) => config.connect().await?,
        };
        Ok(GrpcTransport::from_parts(channel, context, version, host))
    }

    /// Build the transport without dialing; the connection is established
    /// on the first call.
    pub fn build_lazy(self) -> Result<GrpcTransport> {
        let (source, context, version, host) = self.prepare()?;
        let channel = match source {
            ChannelSource::Provided(channel) => channel,
            ChannelSource::Config(config) => config.connect_lazy()?,
        };
        Ok(GrpcTransport::from_parts(channel, context, version, host))
    }
}

struct TransportInner {
    host: String,
    version: ApiVersion,
    channel: Channel,
    context: CallContext,
    stubs: StubCache,
}

/// The non-blocking transport.
///
/// Cloning is cheap and all clones share the channel and stub cache.
/// Concurrent calls multiplex over the shared channel; no ordering is
/// guaranteed between them.
#[derive(Clone)]
pub struct GrpcTransport {
    inner: Arc<TransportInner>,
}

impl GrpcTransport {
    /// Start building a transport.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::new()
    }

    fn from_parts(
        channel: Channel,
        context: CallContext,
        version: ApiVersion,
        host: String,
    ) -> Self {
        Self {
            inner: Arc::new(TransportInner {
                host,
                version,
                channel,
                context,
                stubs: StubCache::default(),
            }),
        }
    }

    /// The `host:port` authority this transport talks to.
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// The protocol version in use.
    pub fn api_version(&self) -> ApiVersion {
        self.inner.version
    }

    async fn call<Req, Res>(
        &self,
        method: Method,
        request: Req,
        stub: &UnaryStub<Req, Res>,
    ) -> Result<Res>
    where
        Req: prost::Message + Clone + Default + 'static,
        Res: prost::Message + Default + 'static,
    {
        let policy = method.policy();
        policy
            .invoke(method, request, |req, remaining| {
                stub.call(req, &self.inner.context, remaining)
            })
            .await
    }
}

impl SchedulerTransport for GrpcTransport {
    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse> {
        let inner = &self.inner;
        let stub = inner.stubs.list_jobs(&inner.channel, inner.version);
        self.call(Method::ListJobs, request, stub).await
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.get_job(&inner.channel, inner.version);
        self.call(Method::GetJob, request, stub).await
    }

    async fn create_job(&self, request: CreateJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.create_job(&inner.channel, inner.version);
        self.call(Method::CreateJob, request, stub).await
    }

    async fn update_job(&self, request: UpdateJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.update_job(&inner.channel, inner.version);
        self.call(Method::UpdateJob, request, stub).await
    }

    async fn delete_job(&self, request: DeleteJobRequest) -> Result<Empty> {
        let inner = &self.inner;
        let stub = inner.stubs.delete_job(&inner.channel, inner.version);
        self.call(Method::DeleteJob, request, stub).await
    }

    async fn pause_job(&self, request: PauseJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.pause_job(&inner.channel, inner.version);
        self.call(Method::PauseJob, request, stub).await
    }

    async fn resume_job(&self, request: ResumeJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.resume_job(&inner.channel, inner.version);
        self.call(Method::ResumeJob, request, stub).await
    }

    async fn run_job(&self, request: RunJobRequest) -> Result<Job> {
        let inner = &self.inner;
        let stub = inner.stubs.run_job(&inner.channel, inner.version);
        self.call(Method::RunJob, request, stub).await
    }
}

impl fmt::Debug for GrpcTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcTransport")
            .field("host", &self.inner.host)
            .field("version", &self.inner.version)
            .finish()
    }
}
