use crate::middleware::route_guard::{DASHBOARD_PATH, SIGN_IN_PATH};
use crate::models::{ResolvedSession, SessionState};
use crate::services::SessionContext;
use crate::state::AppState;
use crate::views::pages::{render_auth_page, render_dashboard, render_landing, AuthPage};
use crate::views::{DashboardCommand, DashboardViewModel, MountOutcome, Navbar};
use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse};
use serde::Deserialize;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, location))
        .finish()
}

/// Configured public origin, or the scheme and host the request arrived on.
fn page_origin(state: &AppState, req: &HttpRequest) -> String {
    match &state.config.public_origin {
        Some(origin) => origin.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

pub async fn landing(session: Option<web::ReqData<ResolvedSession>>) -> HttpResponse {
    let navbar = Navbar::from_session(session.as_ref().map(|s| &s.session));
    html(render_landing(&navbar))
}

pub async fn sign_in(state: web::Data<AppState>) -> HttpResponse {
    html(render_auth_page(AuthPage::SignIn, &state.config.auth_provider_url, None))
}

pub async fn sign_up(state: web::Data<AppState>) -> HttpResponse {
    html(render_auth_page(AuthPage::SignUp, &state.config.auth_provider_url, None))
}

pub async fn verify(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let subject = path.into_inner();
    html(render_auth_page(
        AuthPage::Verify,
        &state.config.auth_provider_url,
        Some(subject.as_str()).filter(|s| !s.is_empty()),
    ))
}

/// `/dashboard/*` is an alias for the admin dashboard.
pub async fn dashboard_alias() -> HttpResponse {
    redirect(DASHBOARD_PATH)
}

/// Mounts a view-model for this request's session, runs `command`, and renders the page.
async fn dashboard_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    session: Option<web::ReqData<ResolvedSession>>,
    command: Option<DashboardCommand>,
) -> HttpResponse {
    let Some(resolved) = session.map(web::ReqData::into_inner) else {
        return redirect(SIGN_IN_PATH);
    };

    let context = SessionContext::new();
    context.publish(SessionState::Authenticated(resolved.session.clone()));

    let api = state.backend.for_session(&resolved.token);
    let mut vm = DashboardViewModel::new(api, context, Some(page_origin(&state, &req)));

    let refresh = matches!(command, Some(DashboardCommand::LoadFeedbacks { refresh: true }));
    let outcome = if refresh { vm.mount_refreshed().await } else { vm.mount().await };
    if outcome == MountOutcome::RedirectToSignIn {
        return redirect(SIGN_IN_PATH);
    }

    if let Some(command) = command.filter(|_| !refresh) {
        vm.run(command).await;
    }

    let navbar = Navbar::from_session(Some(&resolved.session));
    html(render_dashboard(&vm, &navbar))
}

pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
    session: Option<web::ReqData<ResolvedSession>>,
) -> HttpResponse {
    dashboard_page(state, req, session, None).await
}

pub async fn refresh_feedbacks(
    state: web::Data<AppState>,
    req: HttpRequest,
    session: Option<web::ReqData<ResolvedSession>>,
) -> HttpResponse {
    dashboard_page(state, req, session, Some(DashboardCommand::LoadFeedbacks { refresh: true })).await
}

/// Body of the acceptance switch form: the position the page showed.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub displayed: bool,
}

pub async fn toggle_accept_feedbacks(
    state: web::Data<AppState>,
    req: HttpRequest,
    session: Option<web::ReqData<ResolvedSession>>,
    form: web::Form<ToggleForm>,
) -> HttpResponse {
    let command = DashboardCommand::ToggleAcceptance { displayed: form.displayed };
    dashboard_page(state, req, session, Some(command)).await
}

pub async fn delete_feedback(
    state: web::Data<AppState>,
    req: HttpRequest,
    session: Option<web::ReqData<ResolvedSession>>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    dashboard_page(state, req, session, Some(DashboardCommand::DeleteFeedback(id))).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(landing))
        .route("/sign-in", web::get().to(sign_in))
        .route("/sign-up", web::get().to(sign_up))
        .route("/verify/{subject:.*}", web::get().to(verify))
        .route("/dashboard/{tail:.*}", web::get().to(dashboard_alias))
        .service(
            web::scope(DASHBOARD_PATH)
                .route("", web::get().to(dashboard))
                .route("/refresh", web::post().to(refresh_feedbacks))
                .route("/accept-feedbacks", web::post().to(toggle_accept_feedbacks))
                .route("/feedbacks/{id}/delete", web::post().to(delete_feedback)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RouteGuard;
    use crate::models::FeedbackList;
    use crate::services::session_service::tests::{issue_token, SECRET};
    use crate::test_support::{test_state_with, test_state_with_backend, ScriptedApi};
    use crate::utils::AppError;
    use actix_web::{body::MessageBody, cookie::Cookie, dev::ServiceResponse, http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .wrap(RouteGuard::new($state.resolver.clone(), &$state.config.session_cookie))
                    .configure(configure),
            )
            .await
        };
    }

    fn scripted(ids: &[&str], accepting: bool) -> Arc<ScriptedApi> {
        let api = Arc::new(ScriptedApi::default());
        let feedback: Vec<_> = ids
            .iter()
            .map(|id| json!({ "_id": id, "content": format!("note {}", id) }))
            .collect();
        *api.list.lock().unwrap() = Some(Ok(FeedbackList::decode(json!({ "feedback": feedback }))));
        *api.flag.lock().unwrap() = Some(Ok(accepting));
        api
    }

    fn alice_cookie(state: &AppState) -> Cookie<'static> {
        Cookie::new(state.config.session_cookie.clone(), issue_token(SECRET, "alice", 3600))
    }

    async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
        String::from_utf8(test::read_body(res).await.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn visitor_on_dashboard_is_sent_to_sign_in_without_fetching() {
        let api = scripted(&["a"], true);
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::get().uri("/admin/dashboard").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/sign-in");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn dashboard_renders_feedbacks_and_link() {
        let (state, backend) = test_state_with_backend(scripted(&["a", "b"], true));
        let app = app!(state);

        let cookie = alice_cookie(&state);
        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .cookie(cookie.clone())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_text(res).await;
        assert!(body.contains("Bonjour alice"));
        assert!(body.contains("https://app.example.com/u/alice"));
        assert!(body.contains("Accept feedbacks: On"));
        assert!(body.contains("note a"));
        assert!(body.contains("note b"));
        assert!(body.contains("Welcome, alice"));
        assert!(body.contains(r#"<input type="hidden" name="displayed" value="true">"#));
        assert_eq!(*backend.tokens.lock().unwrap(), [cookie.value().to_string()]);
    }

    #[actix_web::test]
    async fn dashboard_with_empty_list_says_so() {
        let api = Arc::new(ScriptedApi::default());
        *api.list.lock().unwrap() = Some(Ok(FeedbackList::decode(json!({ "feedback": {} }))));
        *api.flag.lock().unwrap() = Some(Ok(false));
        let state = test_state_with(api);
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .cookie(alice_cookie(&state))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("No feedbacks to display."));
        assert!(body.contains("Accept feedbacks: Off"));
    }

    #[actix_web::test]
    async fn toggle_posts_negation_of_displayed_value() {
        let api = scripted(&[], false);
        *api.set.lock().unwrap() = Some(Ok("Feedback acceptance updated".to_string()));
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/admin/dashboard/accept-feedbacks")
            .cookie(alice_cookie(&state))
            .set_form([("displayed", "false")])
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert_eq!(*api.sent_flags.lock().unwrap(), [true]);
        assert!(body.contains("Accept feedbacks: On"));
        assert!(body.contains("Feedback acceptance updated"));
    }

    #[actix_web::test]
    async fn toggle_after_failed_flag_load_follows_the_page() {
        let api = scripted(&[], false);
        *api.flag.lock().unwrap() = Some(Err(AppError::Transport("timeout".into())));
        *api.set.lock().unwrap() = Some(Ok("Feedback acceptance updated".to_string()));
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/admin/dashboard/accept-feedbacks")
            .cookie(alice_cookie(&state))
            .set_form([("displayed", "true")])
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert_eq!(*api.sent_flags.lock().unwrap(), [false]);
        assert!(body.contains("Failed to fetch feedback settings"));
        assert!(body.contains("Accept feedbacks: Off"));
    }

    #[actix_web::test]
    async fn resubmitted_toggle_does_not_flip_back() {
        let api = scripted(&[], false);
        *api.set.lock().unwrap() = Some(Ok("Feedback acceptance updated".to_string()));
        let state = test_state_with(api.clone());
        let app = app!(state);

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/admin/dashboard/accept-feedbacks")
                .cookie(alice_cookie(&state))
                .set_form([("displayed", "false")])
                .to_request();
            let body = body_text(test::call_service(&app, req).await).await;
            assert!(body.contains("Accept feedbacks: On"));
        }
        assert_eq!(*api.sent_flags.lock().unwrap(), [true, true]);
    }

    #[actix_web::test]
    async fn toggle_without_form_is_rejected_before_any_call() {
        let api = scripted(&[], false);
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/admin/dashboard/accept-feedbacks")
            .cookie(alice_cookie(&state))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn delete_removes_card_even_when_server_fails() {
        let api = scripted(&["keep", "drop"], true);
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/admin/dashboard/feedbacks/drop/delete")
            .cookie(alice_cookie(&state))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert_eq!(*api.deleted.lock().unwrap(), ["drop"]);
        assert!(body.contains("note keep"));
        assert!(!body.contains("note drop"));
        assert!(body.contains("Failed to delete feedback"));
    }

    #[actix_web::test]
    async fn refresh_fetches_once_and_announces() {
        let api = scripted(&["a"], true);
        let state = test_state_with(api.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/admin/dashboard/refresh")
            .cookie(alice_cookie(&state))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Refreshed feedbacks"));
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn signed_in_user_is_bounced_from_auth_pages() {
        let state = test_state_with(Arc::new(ScriptedApi::default()));
        let app = app!(state);

        for uri in ["/sign-in", "/sign-up", "/verify/alice"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .cookie(alice_cookie(&state))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
            assert_eq!(res.headers().get(LOCATION).unwrap(), "/admin/dashboard");
        }
    }

    #[actix_web::test]
    async fn visitor_sees_auth_pages_and_landing() {
        let state = test_state_with(Arc::new(ScriptedApi::default()));
        let app = app!(state);

        let req = test::TestRequest::get().uri("/sign-in").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_text(res).await.contains("Authenticate"));

        let req = test::TestRequest::get().uri("/").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Login"));
    }

    #[actix_web::test]
    async fn dashboard_alias_redirects() {
        let state = test_state_with(Arc::new(ScriptedApi::default()));
        let app = app!(state);

        let req = test::TestRequest::get().uri("/dashboard/anything").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/sign-in");

        let req = test::TestRequest::get()
            .uri("/dashboard/anything")
            .cookie(alice_cookie(&state))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/admin/dashboard");
    }

    #[actix_web::test]
    async fn expired_token_counts_as_no_session() {
        let state = test_state_with(scripted(&["a"], true));
        let app = app!(state);

        let expired = Cookie::new(state.config.session_cookie.clone(), issue_token(SECRET, "alice", -30));
        let req = test::TestRequest::get().uri("/admin/dashboard").cookie(expired).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/sign-in");
    }
}
