//! Per-method stubs and their lazily populated cache.
//!
//! A stub pairs a method's wire path with the prost codec for its request
//! and response types and binds both to the transport's channel. Stubs are
//! built at most once per transport and never invalidated; the cache hands
//! back the identical stub on every later lookup.

use std::marker::PhantomData;
use std::sync::OnceLock;
use std::time::Duration;

use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;

use crate::auth::CallContext;
use crate::error::{Result, SchedulerError};
use crate::method::{ApiVersion, Method};
use crate::proto::{
    CreateJobRequest, DeleteJobRequest, Empty, GetJobRequest, Job, ListJobsRequest,
    ListJobsResponse, PauseJobRequest, ResumeJobRequest, RunJobRequest, UpdateJobRequest,
};

/// A bound callable for one unary method.
pub(crate) struct UnaryStub<Req, Res> {
    grpc: Grpc<Channel>,
    path: PathAndQuery,
    _marker: PhantomData<fn(Req) -> Res>,
}

impl<Req, Res> UnaryStub<Req, Res>
where
    Req: prost::Message + Clone + Default + 'static,
    Res: prost::Message + Default + 'static,
{
    fn bind(channel: Channel, path: PathAndQuery) -> Self {
        Self {
            grpc: Grpc::new(channel),
            path,
            _marker: PhantomData,
        }
    }

    /// Perform one attempt of the call.
    ///
    /// Attaches the baseline metadata and the remaining wall-clock budget
    /// as the request deadline, waits for channel readiness, then runs the
    /// unary exchange. Readiness failures are connection problems, not
    /// remote statuses, and are surfaced as such.
    pub(crate) async fn call(
        &self,
        message: Req,
        context: &CallContext,
        remaining: Duration,
    ) -> Result<Res> {
        let mut grpc = self.grpc.clone();
        grpc.ready()
            .await
            .map_err(|e| SchedulerError::Connection(format!("service was not ready: {e}")))?;

        let mut request = tonic::Request::new(message);
        context.apply(request.metadata_mut());
        request.set_timeout(remaining);

        let codec: ProstCodec<Req, Res> = ProstCodec::default();
        let response = grpc
            .unary(request, self.path.clone(), codec)
            .await
            .map_err(SchedulerError::from)?;
        Ok(response.into_inner())
    }
}

/// One slot per method, populated on first use.
///
/// `OnceLock` gives the at-most-once construction guarantee under
/// concurrent first access; losers of the race observe the winner's stub.
#[derive(Default)]
pub(crate) struct StubCache {
    list_jobs: OnceLock<UnaryStub<ListJobsRequest, ListJobsResponse>>,
    get_job: OnceLock<UnaryStub<GetJobRequest, Job>>,
    create_job: OnceLock<UnaryStub<CreateJobRequest, Job>>,
    update_job: OnceLock<UnaryStub<UpdateJobRequest, Job>>,
    delete_job: OnceLock<UnaryStub<DeleteJobRequest, Empty>>,
    pause_job: OnceLock<UnaryStub<PauseJobRequest, Job>>,
    resume_job: OnceLock<UnaryStub<ResumeJobRequest, Job>>,
    run_job: OnceLock<UnaryStub<RunJobRequest, Job>>,
}

macro_rules! stub_accessor {
    ($name:ident, $method:expr, $req:ty, $res:ty) => {
        pub(crate) fn $name(
            &self,
            channel: &Channel,
            version: ApiVersion,
        ) -> &UnaryStub<$req, $res> {
            self.$name.get_or_init(|| {
                UnaryStub::bind(channel.clone(), $method.path_and_query(version))
            })
        }
    };
}

impl StubCache {
    stub_accessor!(list_jobs, Method::ListJobs, ListJobsRequest, ListJobsResponse);
    stub_accessor!(get_job, Method::GetJob, GetJobRequest, Job);
    stub_accessor!(create_job, Method::CreateJob, CreateJobRequest, Job);
    stub_accessor!(update_job, Method::UpdateJob, UpdateJobRequest, Job);
    stub_accessor!(delete_job, Method::DeleteJob, DeleteJobRequest, Empty);
    stub_accessor!(pause_job, Method::PauseJob, PauseJobRequest, Job);
    stub_accessor!(resume_job, Method::ResumeJob, ResumeJobRequest, Job);
    stub_accessor!(run_job, Method::RunJob, RunJobRequest, Job);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn lazy_channel() -> Channel {
        tonic::transport::Endpoint::from_static("https://localhost:443").connect_lazy()
    }

    #[tokio::test]
    async fn test_lookup_returns_cached_stub() {
        let cache = StubCache::default();
        let channel = lazy_channel();

        let first = cache.list_jobs(&channel, ApiVersion::V1);
        let second = cache.list_jobs(&channel, ApiVersion::V1);
        assert!(std::ptr::eq(first, second));
    }

    #[tokio::test]
    async fn test_methods_get_distinct_stubs() {
        let cache = StubCache::default();
        let channel = lazy_channel();

        let list = cache.list_jobs(&channel, ApiVersion::V1) as *const _ as usize;
        let get = cache.get_job(&channel, ApiVersion::V1) as *const _ as usize;
        assert_ne!(list, get);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_builds_one_stub() {
        let cache = Arc::new(StubCache::default());
        let channel = lazy_channel();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            let channel = channel.clone();
            handles.push(tokio::spawn(async move {
                cache.get_job(&channel, ApiVersion::V1) as *const _ as usize
            }));
        }

        let mut addresses = Vec::new();
        for handle in handles {
            addresses.push(handle.await.expect("task"));
        }
        addresses.dedup();
        assert_eq!(addresses.len(), 1);
    }
}
