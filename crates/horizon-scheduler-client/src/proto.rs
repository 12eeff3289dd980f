//! Wire message types for the scheduler service.
//!
//! These mirror the service's protobuf schema and are maintained by hand;
//! field numbers follow the published proto definitions for both supported
//! API versions, which share the same message layout.

/// A scheduled job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Job {
    /// Resource name, `projects/{project}/locations/{location}/jobs/{job}`.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Human-readable description, at most 500 characters.
    #[prost(string, tag = "2")]
    pub description: String,
    /// Current state of the job.
    #[prost(enumeration = "job::State", tag = "10")]
    pub state: i32,
    /// Schedule in unix-cron format.
    #[prost(string, tag = "20")]
    pub schedule: String,
    /// IANA time zone name the schedule is interpreted in.
    #[prost(string, tag = "21")]
    pub time_zone: String,
}

/// Nested types for [`Job`].
pub mod job {
    /// State of the job.
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum State {
        /// Unspecified state.
        Unspecified = 0,
        /// The job is executing normally.
        Enabled = 1,
        /// The job is paused and will not execute until resumed.
        Paused = 2,
        /// The job is disabled by the system and cannot be triggered.
        Disabled = 3,
        /// A previous update failed; the job may not execute until
        /// a successful update is applied.
        UpdateFailed = 4,
    }
}

/// Request for listing jobs in a location.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListJobsRequest {
    /// Location to list jobs from, `projects/{project}/locations/{location}`.
    #[prost(string, tag = "1")]
    pub parent: String,
    /// Maximum page size; the service may return fewer. Zero lets the
    /// service pick.
    #[prost(int32, tag = "5")]
    pub page_size: i32,
    /// Token from a previous response's `next_page_token`, or empty for
    /// the first page.
    #[prost(string, tag = "6")]
    pub page_token: String,
}

/// One page of jobs.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListJobsResponse {
    /// The jobs in this page.
    #[prost(message, repeated, tag = "1")]
    pub jobs: Vec<Job>,
    /// Token for the next page; empty when there are no more results.
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

/// Request for a single job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetJobRequest {
    /// Resource name of the job.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Request to create a job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateJobRequest {
    /// Location to create the job in.
    #[prost(string, tag = "1")]
    pub parent: String,
    /// The job to create; its `name` must be within `parent`.
    #[prost(message, optional, tag = "2")]
    pub job: Option<Job>,
}

/// Request to update a job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateJobRequest {
    /// The job to update, addressed by its `name`.
    #[prost(message, optional, tag = "1")]
    pub job: Option<Job>,
    /// Which fields of the job to replace.
    #[prost(message, optional, tag = "2")]
    pub update_mask: Option<FieldMask>,
}

/// Request to delete a job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteJobRequest {
    /// Resource name of the job.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Request to pause a job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PauseJobRequest {
    /// Resource name of the job.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Request to resume a paused job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResumeJobRequest {
    /// Resource name of the job.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Request to force an immediate run of a job.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunJobRequest {
    /// Resource name of the job.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Set of field paths for partial updates.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldMask {
    /// Field paths, e.g. `"schedule"` or `"time_zone"`.
    #[prost(string, repeated, tag = "1")]
    pub paths: Vec<String>,
}

/// Empty response message.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}
