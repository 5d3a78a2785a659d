use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anonymous Feedback - Dashboard Front End",
        version = "1.0.0",
        description = "JSON endpoints served next to the dashboard pages.\n\n**Authentication:** the session is read from the identity provider's session cookie. Pages under `/admin/dashboard` and `/dashboard/*` redirect to `/sign-in` without one; `/sign-in`, `/sign-up` and `/verify/*` redirect to `/admin/dashboard` with one."
    ),
    paths(
        // Auth
        crate::api::auth::get_session,
        crate::api::auth::sign_out,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::Session,
            crate::models::User,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Session lookup and sign-out."),
        (name = "Health", description = "Health check and counters for monitoring."),
    ),
    modifiers(&SessionCookieAddon)
)]
pub struct ApiDoc;

struct SessionCookieAddon;

impl utoipa::Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    crate::config::DEFAULT_SESSION_COOKIE,
                ))),
            );
        }
    }
}
