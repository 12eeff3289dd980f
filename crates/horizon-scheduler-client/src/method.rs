//! Static registry of the remote methods exposed by the scheduler service.
//!
//! Every method the service offers is enumerated here together with its
//! wire path and reliability policy. The set is closed: code can only ask
//! for methods that exist, so an undefined method name is a compile error
//! rather than anything observable at runtime.

use std::time::Duration;

use http::uri::PathAndQuery;

use crate::retry::{CallPolicy, RetryPolicy};
use crate::status::RpcCode;

/// Protocol version of the scheduler service.
///
/// The wire paths and the default host are parameterized by version; the
/// reliability policy table is identical across both supported versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// The stable v1 surface.
    #[default]
    V1,
    /// The v1beta1 surface.
    V1Beta1,
}

impl ApiVersion {
    /// Fully qualified service name used in wire paths.
    pub fn service_name(self) -> &'static str {
        match self {
            Self::V1 => "google.cloud.scheduler.v1.CloudScheduler",
            Self::V1Beta1 => "google.cloud.scheduler.v1beta1.CloudScheduler",
        }
    }
}

/// A remote method of the scheduler service. All methods are unary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Lists jobs in a location.
    ListJobs,
    /// Gets a single job.
    GetJob,
    /// Creates a job.
    CreateJob,
    /// Updates a job.
    UpdateJob,
    /// Deletes a job.
    DeleteJob,
    /// Pauses a job; a paused job is not executed until resumed.
    PauseJob,
    /// Resumes a previously paused job.
    ResumeJob,
    /// Forces a job to run now.
    RunJob,
}

/// Default wall-clock deadline applied to every method.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Backoff applied to methods that are safe to resubmit.
const IDEMPOTENT_RETRY: RetryPolicy = RetryPolicy {
    initial_backoff: Duration::from_millis(100),
    max_backoff: Duration::from_secs(60),
    multiplier: 1.3,
    retry_on: &[RpcCode::Unavailable, RpcCode::DeadlineExceeded],
};

impl Method {
    /// Every method of the service, in declaration order.
    pub const ALL: [Method; 8] = [
        Method::ListJobs,
        Method::GetJob,
        Method::CreateJob,
        Method::UpdateJob,
        Method::DeleteJob,
        Method::PauseJob,
        Method::ResumeJob,
        Method::RunJob,
    ];

    /// The method name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListJobs => "ListJobs",
            Self::GetJob => "GetJob",
            Self::CreateJob => "CreateJob",
            Self::UpdateJob => "UpdateJob",
            Self::DeleteJob => "DeleteJob",
            Self::PauseJob => "PauseJob",
            Self::ResumeJob => "ResumeJob",
            Self::RunJob => "RunJob",
        }
    }

    /// The full wire path, `/<service-fully-qualified-name>/<MethodName>`.
    pub fn path(self, version: ApiVersion) -> &'static str {
        match (version, self) {
            (ApiVersion::V1, Self::ListJobs) => {
                "/google.cloud.scheduler.v1.CloudScheduler/ListJobs"
            }
            (ApiVersion::V1, Self::GetJob) => "/google.cloud.scheduler.v1.CloudScheduler/GetJob",
            (ApiVersion::V1, Self::CreateJob) => {
                "/google.cloud.scheduler.v1.CloudScheduler/CreateJob"
            }
            (ApiVersion::V1, Self::UpdateJob) => {
                "/google.cloud.scheduler.v1.CloudScheduler/UpdateJob"
            }
            (ApiVersion::V1, Self::DeleteJob) => {
                "/google.cloud.scheduler.v1.CloudScheduler/DeleteJob"
            }
            (ApiVersion::V1, Self::PauseJob) => {
                "/google.cloud.scheduler.v1.CloudScheduler/PauseJob"
            }
            (ApiVersion::V1, Self::ResumeJob) => {
                "/google.cloud.scheduler.v1.CloudScheduler/ResumeJob"
            }
            (ApiVersion::V1, Self::RunJob) => "/google.cloud.scheduler.v1.CloudScheduler/RunJob",
            (ApiVersion::V1Beta1, Self::ListJobs) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/ListJobs"
            }
            (ApiVersion::V1Beta1, Self::GetJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/GetJob"
            }
            (ApiVersion::V1Beta1, Self::CreateJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/CreateJob"
            }
            (ApiVersion::V1Beta1, Self::UpdateJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/UpdateJob"
            }
            (ApiVersion::V1Beta1, Self::DeleteJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/DeleteJob"
            }
            (ApiVersion::V1Beta1, Self::PauseJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/PauseJob"
            }
            (ApiVersion::V1Beta1, Self::ResumeJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/ResumeJob"
            }
            (ApiVersion::V1Beta1, Self::RunJob) => {
                "/google.cloud.scheduler.v1beta1.CloudScheduler/RunJob"
            }
        }
    }

    pub(crate) fn path_and_query(self, version: ApiVersion) -> PathAndQuery {
        PathAndQuery::from_static(self.path(version))
    }

    /// The reliability policy applied to invocations of this method.
    ///
    /// Read-style and idempotent methods retry on transient failures;
    /// CreateJob, UpdateJob and RunJob are submitted at most once because
    /// resubmitting them can duplicate side effects on the service.
    pub fn policy(self) -> CallPolicy {
        match self {
            Self::ListJobs
            | Self::GetJob
            | Self::DeleteJob
            | Self::PauseJob
            | Self::ResumeJob => CallPolicy {
                retry: Some(IDEMPOTENT_RETRY),
                timeout: DEFAULT_TIMEOUT,
            },
            Self::CreateJob | Self::UpdateJob | Self::RunJob => CallPolicy {
                retry: None,
                timeout: DEFAULT_TIMEOUT,
            },
        }
    }
}
