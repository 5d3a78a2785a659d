mod api;
mod config;
mod middleware;
mod models;
mod services;
mod state;
mod utils;
mod views;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Anonymous Feedback dashboard...");
    log::info!("📡 Feedback API: {}", config.feedback_api_url);
    log::info!("🍪 Session cookie: {}", config.session_cookie);

    let host = config.host.clone();
    let port = config.port;
    let allowed_origin = config.allowed_origin.clone();
    let state = web::Data::new(state::AppState::from_config(config));

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();
        let guard = middleware::RouteGuard::new(
            state.resolver.clone(),
            &state.config.session_cookie,
        );

        App::new()
            .app_data(state.clone())
            .wrap(guard)
            .wrap(Logger::default())
            .wrap(cors)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Session endpoints
            .service(
                web::scope("/api/auth")
                    .route("/session", web::get().to(api::auth::get_session))
                    .route("/signout", web::post().to(api::auth::sign_out))
            )
            // Pages
            .configure(api::pages::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
