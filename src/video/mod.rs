//! Video generation: probe → submit → poll → resolve → download.

pub mod probe;
pub mod resolve;
pub mod size;
pub mod submit;

use std::path::PathBuf;

use tracing::info;

use crate::azure::{AzureClient, RouteMode};
use crate::download::download;
use crate::error::MediaError;
use crate::job::{PollEvent, PollSettings, ResponseSchema, Sleeper, StatusPoller};
use crate::ui::JobProgress;

pub use size::VideoSize;
pub use submit::VideoRequest;

/// One video generation run.
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub request: VideoRequest,
    pub mode: RouteMode,
    pub output: PathBuf,
    pub poll: PollSettings,
}

/// Run the whole job and return the absolute path of the saved video.
pub async fn generate_video<S: Sleeper>(
    client: &AzureClient,
    job: &VideoJob,
    schema: &ResponseSchema,
    sleeper: &S,
    progress: &JobProgress,
) -> Result<PathBuf, MediaError> {
    progress.stage("Probing video routes");
    let route = probe::probe_route(client, job.mode).await?;
    info!(%route, mode = %job.mode, "route selected");
    progress.note("route", route);

    progress.stage("Submitting video job");
    let job_id = submit::submit(client, route, &job.request, schema).await?;
    info!(%job_id, "job submitted");
    progress.note("job id", &job_id);

    progress.stage("Waiting for job");
    let status_url = route.status_url(client.endpoint(), &job_id);
    let poller = StatusPoller::new(client, sleeper, job.poll);
    let payload = poller
        .poll(&status_url, route, |event| match event {
            PollEvent::Pending { status, elapsed } => progress.pending(status, elapsed),
            PollEvent::Transient { reason, elapsed } => progress.warn(&format!(
                "status query failed ({reason}) after {}s, retrying",
                elapsed.as_secs()
            )),
        })
        .await?;

    progress.stage("Downloading video");
    let source = resolve::resolve_result(&payload, route, &job_id, client.endpoint(), schema)?;
    info!(url = source.url(), "downloading result");
    download(client, &source, &job.output).await
}
