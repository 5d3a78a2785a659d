use crate::models::{ResolvedSession, Session};
use crate::state::AppState;
use actix_web::{cookie::Cookie, http::header::LOCATION, web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session, or an empty object when signed out", body = Session)
    )
)]
pub async fn get_session(session: Option<web::ReqData<ResolvedSession>>) -> HttpResponse {
    match session {
        Some(resolved) => HttpResponse::Ok().json(&resolved.session),
        None => HttpResponse::Ok().json(serde_json::json!({})),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "Auth",
    responses(
        (status = 303, description = "Session cookie cleared, redirect to the landing page")
    )
)]
pub async fn sign_out(
    state: web::Data<AppState>,
    session: Option<web::ReqData<ResolvedSession>>,
) -> HttpResponse {
    if let Some(resolved) = session {
        log::info!("👋 Signing out user: {}", resolved.session.user.id);
    }

    let mut cookie = Cookie::new(state.config.session_cookie.clone(), "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::SeeOther()
        .insert_header((LOCATION, "/"))
        .cookie(cookie)
        .finish()
}
