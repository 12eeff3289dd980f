//! Blocking transport for callers without an async runtime.
//!
//! Mirrors the non-blocking surface method for method. Each call drives
//! the underlying async transport to completion on the shared library
//! runtime, so the stub cache and reliability policy behave identically
//! in both variants.

use crate::error::Result;
use crate::proto::{
    CreateJobRequest, DeleteJobRequest, Empty, GetJobRequest, Job, ListJobsRequest,
    ListJobsResponse, PauseJobRequest, ResumeJobRequest, RunJobRequest, UpdateJobRequest,
};
use crate::runtime;
use crate::transport::{GrpcTransport, SchedulerTransport, TransportBuilder};

/// The blocking transport.
///
/// # Example
///
/// ```ignore
/// use horizon_scheduler_client::blocking::BlockingTransport;
/// use horizon_scheduler_client::{Credentials, TransportBuilder};
///
/// let transport = BlockingTransport::connect(
///     TransportBuilder::new().credentials(Credentials::from_token(token)),
/// )?;
/// let response = transport.list_jobs(request)?;
/// ```
#[derive(Clone, Debug)]
pub struct BlockingTransport {
    inner: GrpcTransport,
}

impl BlockingTransport {
    /// Build the transport, dialing the service eagerly.
    pub fn connect(builder: TransportBuilder) -> Result<Self> {
        let inner = runtime::block_on(builder.connect())?;
        Ok(Self { inner })
    }

    /// Build the transport without dialing; the connection is established
    /// on the first call.
    pub fn build_lazy(builder: TransportBuilder) -> Result<Self> {
        Ok(Self {
            inner: builder.build_lazy()?,
        })
    }

    /// Borrow the underlying non-blocking transport.
    pub fn as_async(&self) -> &GrpcTransport {
        &self.inner
    }

    /// Unwrap into the underlying non-blocking transport.
    pub fn into_async(self) -> GrpcTransport {
        self.inner
    }

    /// Lists jobs in a location.
    pub fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse> {
        runtime::block_on(self.inner.list_jobs(request))
    }

    /// Gets a single job.
    pub fn get_job(&self, request: GetJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.get_job(request))
    }

    /// Creates a job.
    pub fn create_job(&self, request: CreateJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.create_job(request))
    }

    /// Updates a job.
    pub fn update_job(&self, request: UpdateJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.update_job(request))
    }

    /// Deletes a job.
    pub fn delete_job(&self, request: DeleteJobRequest) -> Result<Empty> {
        runtime::block_on(self.inner.delete_job(request))
    }

    /// Pauses a job.
    pub fn pause_job(&self, request: PauseJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.pause_job(request))
    }

    /// Resumes a paused job.
    pub fn resume_job(&self, request: ResumeJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.resume_job(request))
    }

    /// Forces a job to run now.
    pub fn run_job(&self, request: RunJobRequest) -> Result<Job> {
        runtime::block_on(self.inner.run_job(request))
    }
}
