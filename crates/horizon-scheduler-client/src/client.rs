//! High-level client facade.
//!
//! Thin convenience layer over any [`SchedulerTransport`]: the eight
//! operations, a pagination helper and resource name formatting.

use crate::error::Result;
use crate::proto::{
    CreateJobRequest, DeleteJobRequest, Empty, GetJobRequest, Job, ListJobsRequest,
    ListJobsResponse, PauseJobRequest, ResumeJobRequest, RunJobRequest, UpdateJobRequest,
};
use crate::transport::{GrpcTransport, SchedulerTransport, TransportBuilder};

/// Format a location resource name, `projects/{project}/locations/{location}`.
pub fn location_path(project: &str, location: &str) -> String {
    format!("projects/{project}/locations/{location}")
}

/// Format a job resource name,
/// `projects/{project}/locations/{location}/jobs/{job}`.
pub fn job_path(project: &str, location: &str, job: &str) -> String {
    format!("projects/{project}/locations/{location}/jobs/{job}")
}

/// A client for the scheduler service, generic over the transport.
#[derive(Clone, Debug)]
pub struct SchedulerClient<T> {
    transport: T,
}

impl SchedulerClient<GrpcTransport> {
    /// Build a client over a freshly connected gRPC transport.
    pub async fn connect(builder: TransportBuilder) -> Result<Self> {
        Ok(Self::new(builder.connect().await?))
    }
}

impl<T: SchedulerTransport> SchedulerClient<T> {
    /// Wrap an existing transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists jobs in a location, one page at a time.
    pub async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse> {
        self.transport.list_jobs(request).await
    }

    /// Lists every job in a location, walking all pages.
    pub async fn list_all_jobs(&self, parent: impl Into<String>) -> Result<Vec<Job>> {
        let parent = parent.into();
        let mut jobs = Vec::new();
        let mut page_token = String::new();
        loop {
            let response = self
                .transport
                .list_jobs(ListJobsRequest {
                    parent: parent.clone(),
                    page_size: 0,
                    page_token: page_token.clone(),
                })
                .await?;
            jobs.extend(response.jobs);
            if response.next_page_token.is_empty() {
                break;
            }
            page_token = response.next_page_token;
        }
        Ok(jobs)
    }

    /// Gets a single job.
    pub async fn get_job(&self, request: GetJobRequest) -> Result<Job> {
        self.transport.get_job(request).await
    }

    /// Creates a job.
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<Job> {
        self.transport.create_job(request).await
    }

    /// Updates a job.
    pub async fn update_job(&self, request: UpdateJobRequest) -> Result<Job> {
        self.transport.update_job(request).await
    }

    /// Deletes a job.
    pub async fn delete_job(&self, request: DeleteJobRequest) -> Result<Empty> {
        self.transport.delete_job(request).await
    }

    /// Pauses a job.
    pub async fn pause_job(&self, request: PauseJobRequest) -> Result<Job> {
        self.transport.pause_job(request).await
    }

    /// Resumes a paused job.
    pub async fn resume_job(&self, request: ResumeJobRequest) -> Result<Job> {
        self.transport.resume_job(request).await
    }

    /// Forces a job to run now.
    pub async fn run_job(&self, request: RunJobRequest) -> Result<Job> {
        self.transport.run_job(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_path() {
        assert_eq!(
            location_path("my-project", "us-central1"),
            "projects/my-project/locations/us-central1"
        );
    }

    #[test]
    fn test_job_path() {
        assert_eq!(
            job_path("my-project", "us-central1", "nightly-report"),
            "projects/my-project/locations/us-central1/jobs/nightly-report"
        );
    }
}
