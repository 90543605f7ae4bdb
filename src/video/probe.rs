use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::azure::client::PROBE_TIMEOUT;
use crate::azure::{AzureClient, Route, RouteMode};
use crate::error::MediaError;

/// Finds the first live route among the candidates of `mode`.
///
/// Each candidate's submission URL gets a POST with an empty JSON object.
/// 404 means the route is absent and the next one is tried, 401/403 aborts,
/// and any other status selects the route. The empty body never creates a job.
pub async fn probe_route(client: &AzureClient, mode: RouteMode) -> Result<Route, MediaError> {
    let mut probed = Vec::new();

    for route in mode.candidates() {
        let url = route.submit_url(client.endpoint());
        let resp = client
            .post_json(&url, &json!({}), Some(route), PROBE_TIMEOUT)
            .await?;
        let status = resp.status();
        debug!(%route, %url, status = status.as_u16(), "probed route");

        match status {
            StatusCode::NOT_FOUND => probed.push(url),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = resp.text().await.unwrap_or_default();
                return Err(MediaError::Unauthorized {
                    status: status.as_u16(),
                    body,
                });
            }
            _ => return Ok(route),
        }
    }

    let ep = client.endpoint();
    Err(MediaError::RouteNotFound {
        endpoint: ep.base().to_string(),
        deployment: ep.deployment().to_string(),
        api_version: ep.api_version().to_string(),
        mode: mode.to_string(),
        probed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::Endpoint;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEOS: &str = "/openai/v1/videos";
    const JOBS: &str = "/openai/v1/video/generations/jobs";
    const LEGACY: &str = "/openai/deployments/sora/videos/generations";

    async fn setup() -> (MockServer, AzureClient) {
        let server = MockServer::start().await;
        let client = AzureClient::new(Endpoint::new(&server.uri(), "sora", "preview"), "key".into()).unwrap();
        (server, client)
    }

    async fn respond(server: &MockServer, p: &str, status: u16, times: u64) {
        Mock::given(method("POST"))
            .and(path(p))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn selects_first_non_404_and_stops() {
        let (server, client) = setup().await;
        respond(&server, VIDEOS, 404, 1).await;
        respond(&server, JOBS, 400, 1).await;
        respond(&server, LEGACY, 400, 0).await;

        let route = probe_route(&client, RouteMode::Auto).await.unwrap();
        assert_eq!(route, Route::Jobs);
    }

    #[tokio::test]
    async fn all_404_lists_probed_urls_in_order() {
        let (server, client) = setup().await;
        respond(&server, VIDEOS, 404, 1).await;
        respond(&server, JOBS, 404, 1).await;
        respond(&server, LEGACY, 404, 1).await;

        let err = probe_route(&client, RouteMode::Auto).await.unwrap_err();
        let ep = client.endpoint();
        match err {
            MediaError::RouteNotFound { probed, mode, .. } => {
                assert_eq!(
                    probed,
                    vec![
                        Route::Videos.submit_url(ep),
                        Route::Jobs.submit_url(ep),
                        Route::Legacy.submit_url(ep),
                    ]
                );
                assert_eq!(mode, "auto");
            }
            other => panic!("expected RouteNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_aborts_without_further_probes() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path(VIDEOS))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;
        respond(&server, JOBS, 400, 0).await;
        respond(&server, LEGACY, 400, 0).await;

        let err = probe_route(&client, RouteMode::Auto).await.unwrap_err();
        assert!(matches!(
            err,
            MediaError::Unauthorized { status: 401, ref body } if body == "bad key"
        ));
    }

    #[tokio::test]
    async fn forbidden_after_missing_route_aborts() {
        let (server, client) = setup().await;
        respond(&server, VIDEOS, 404, 1).await;
        respond(&server, JOBS, 403, 1).await;
        respond(&server, LEGACY, 400, 0).await;

        let err = probe_route(&client, RouteMode::Auto).await.unwrap_err();
        assert!(matches!(err, MediaError::Unauthorized { status: 403, .. }));
    }

    #[tokio::test]
    async fn explicit_mode_probes_only_that_route() {
        let (server, client) = setup().await;
        respond(&server, LEGACY, 405, 1).await;
        respond(&server, JOBS, 400, 0).await;
        respond(&server, VIDEOS, 400, 0).await;

        let route = probe_route(&client, RouteMode::Legacy).await.unwrap();
        assert_eq!(route, Route::Legacy);
    }
}
