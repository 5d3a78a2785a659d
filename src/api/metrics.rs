use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static REDIRECT_COUNT: AtomicU64 = AtomicU64::new(0);
static REMOTE_FAILURE_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_redirect_count() {
    REDIRECT_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_remote_failure_count() {
    REMOTE_FAILURE_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub guard_redirects_total: u64,
    pub remote_failures_total: u64,
}

impl MetricsResponse {
    pub fn current() -> Self {
        Self {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            guard_redirects_total: REDIRECT_COUNT.load(Ordering::Relaxed),
            remote_failures_total: REMOTE_FAILURE_COUNT.load(Ordering::Relaxed),
        }
    }

    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP http_requests_total Total number of HTTP requests\n\
             # TYPE http_requests_total counter\n\
             http_requests_total {}\n\
             \n\
             # HELP guard_redirects_total Requests redirected by the route guard\n\
             # TYPE guard_redirects_total counter\n\
             guard_redirects_total {}\n\
             \n\
             # HELP remote_failures_total Failed calls to the feedback data API\n\
             # TYPE remote_failures_total counter\n\
             remote_failures_total {}\n",
            self.http_requests_total, self.guard_redirects_total, self.remote_failures_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus counters", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::current().to_prometheus())
}
