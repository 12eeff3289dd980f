//! gRPC client for the Cloud Scheduler job-scheduling API.
//!
//! This crate provides a transport layer with per-method reliability
//! policy for a remote job-scheduling service:
//!
//! - **Typed method stubs**: one bound callable per remote method, built
//!   lazily and cached for the transport's lifetime
//! - **Automatic retry**: transient failures (unavailable, deadline
//!   exceeded) on idempotent methods are resubmitted with exponential
//!   backoff
//! - **Deadlines**: every call runs under a wall-clock deadline covering
//!   all of its attempts
//! - **Blocking and non-blocking variants** with an identical surface
//! - **TLS by default**, with mutual TLS support
//!
//! # Example
//!
//! ```ignore
//! use horizon_scheduler_client::proto::ListJobsRequest;
//! use horizon_scheduler_client::{
//!     location_path, Credentials, SchedulerClient, TransportBuilder,
//! };
//!
//! let client = SchedulerClient::connect(
//!     TransportBuilder::new().credentials(Credentials::from_token(token)),
//! )
//! .await?;
//!
//! let response = client
//!     .list_jobs(ListJobsRequest {
//!         parent: location_path("my-project", "us-central1"),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! for job in response.jobs {
//!     println!("{}: {}", job.name, job.schedule);
//! }
//! ```
//!
//! # Blocking usage
//!
//! ```ignore
//! use horizon_scheduler_client::blocking::BlockingTransport;
//! use horizon_scheduler_client::{Credentials, TransportBuilder};
//!
//! let transport = BlockingTransport::connect(
//!     TransportBuilder::new().credentials(Credentials::from_token(token)),
//! )?;
//! let response = transport.list_jobs(request)?;
//! ```
//!
//! # Supplying a channel
//!
//! A pre-built [`tonic`] channel can be attached directly, in which case
//! the builder performs no connection or credential resolution of its own:
//!
//! ```ignore
//! let transport = TransportBuilder::new()
//!     .channel(my_channel)
//!     .build_lazy()?;
//! ```

mod auth;
pub mod blocking;
mod channel;
mod client;
mod error;
mod method;
pub mod proto;
mod retry;
pub mod runtime;
mod status;
mod stub;
mod transport;

pub use auth::{ClientInfo, Credentials, CREDENTIALS_ENV, DEFAULT_SCOPES};
pub use channel::ChannelConfig;
pub use client::{job_path, location_path, SchedulerClient};
pub use error::{Result, SchedulerError};
pub use method::{ApiVersion, Method};
pub use retry::{CallPolicy, RetryPolicy};
pub use status::{RpcCode, RpcStatus};
pub use transport::{
    ClientCertSource, GrpcTransport, SchedulerTransport, TransportBuilder, DEFAULT_HOST,
};

// Re-export tonic for advanced usage such as building custom channels
pub use tonic;
