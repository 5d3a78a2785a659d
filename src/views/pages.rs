use super::dashboard::{DashboardViewModel, COPY_FAILED, COPY_SUCCEEDED};
use super::navbar::{Navbar, BRAND};
use super::notification::{Notification, Variant};
use crate::middleware::route_guard::DASHBOARD_PATH;
use crate::models::Feedback;
use crate::utils::html::escape;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f4f4f8; }
.navbar { padding: 1rem 1.5rem; background: #1e1b4b; color: #fff; }
.navbar .container { display: flex; justify-content: space-between; align-items: center; gap: 1rem; }
.navbar form { display: inline; }
.brand { color: #fff; font-weight: 700; font-size: 1.25rem; text-decoration: none; }
.button { padding: .5rem 1rem; border-radius: .375rem; border: 1px solid #c7d2fe; background: #e0e7ff; cursor: pointer; }
.button.destructive { background: #dc2626; color: #fff; border-color: #dc2626; }
main { margin: 2rem auto; padding: 1.5rem; max-width: 72rem; background: #fff; border-radius: .5rem; }
.toasts { list-style: none; padding: 0; }
.toast { padding: .75rem 1rem; margin-bottom: .5rem; border-radius: .375rem; border: 1px solid #e5e7eb; }
.toast.destructive { background: #fee2e2; border-color: #fca5a5; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(20rem, 1fr)); gap: 1.5rem; margin-top: 1rem; }
.card { border: 1px solid #e5e7eb; border-radius: .5rem; padding: 1rem; }
.profile-link { display: flex; gap: .5rem; }
.profile-link input { flex: 1; padding: .5rem; }
"#;

fn layout(title: &str, navbar: Option<&Navbar>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{}</title>
  <style>{}</style>
</head>
<body>
  {}
  <main>
{}
  </main>
</body>
</html>
"#,
        escape(title),
        STYLE,
        navbar.map(Navbar::render).unwrap_or_default(),
        body
    )
}

fn render_toast(notification: &Notification) -> String {
    let class = match notification.variant {
        Variant::Default => "toast",
        Variant::Destructive => "toast destructive",
    };
    let description = notification
        .description
        .as_deref()
        .map(|d| format!("<div>{}</div>", escape(d)))
        .unwrap_or_default();
    format!(
        r#"<li class="{}" role="status"><strong>{}</strong>{}</li>"#,
        class,
        escape(&notification.title),
        description
    )
}

/// Always present so the page script can append toasts to it.
fn render_notifications(notifications: &[Notification]) -> String {
    let items: String = notifications.iter().map(render_toast).collect();
    format!(r#"<ul class="toasts" id="toasts">{}</ul>"#, items)
}

/// Copy button plus the script that writes the link to the browser clipboard and
/// reports the outcome as a toast.
fn render_copy_link(url: &str) -> String {
    format!(
        r#"<div class="profile-link">
        <input id="profile-url" type="text" value="{url}" disabled>
        <button type="button" class="button" onclick="copyProfileUrl()">Copy</button>
      </div>
      <template id="copy-succeeded">{succeeded}</template>
      <template id="copy-failed">{failed}</template>
      <script>
        function copyProfileUrl() {{
          var url = document.getElementById('profile-url').value;
          var report = function (id) {{
            var toast = document.getElementById(id).content.cloneNode(true);
            document.getElementById('toasts').appendChild(toast);
          }};
          Promise.resolve()
            .then(function () {{ return navigator.clipboard.writeText(url); }})
            .then(function () {{ report('copy-succeeded'); }}, function () {{ report('copy-failed'); }});
        }}
      </script>"#,
        url = escape(url),
        succeeded = render_toast(&Notification::info(COPY_SUCCEEDED)),
        failed = render_toast(&Notification::destructive(COPY_FAILED)),
    )
}

fn render_feedback_card(feedback: &Feedback) -> String {
    let created = feedback
        .created_at_display()
        .map(|d| format!(r#"<div class="date">{}</div>"#, escape(&d)))
        .unwrap_or_default();

    format!(
        r#"<div class="card">
      <p>{}</p>
      {}
      <form method="post" action="{}/feedbacks/{}/delete">
        <button type="submit" class="button destructive">Delete</button>
      </form>
    </div>"#,
        escape(&feedback.content),
        created,
        DASHBOARD_PATH,
        escape(&urlencoding::encode(&feedback.id))
    )
}

pub fn render_landing(navbar: &Navbar) -> String {
    let cta = match navbar {
        Navbar::Member { .. } => format!(r#"<a href="{}">Go to your dashboard</a>"#, DASHBOARD_PATH),
        Navbar::Guest => r#"<a href="/sign-in">Sign in to collect feedback</a>"#.to_string(),
    };
    let body = format!(
        "    <h1>{}</h1>\n    <p>Share a link, receive honest feedback without names attached.</p>\n    <p>{}</p>",
        BRAND, cta
    );
    layout(BRAND, Some(navbar), &body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    SignIn,
    SignUp,
    Verify,
}

/// Pages of the "Authenticate" layout; they hand off to the identity provider.
pub fn render_auth_page(page: AuthPage, auth_provider_url: &str, subject: Option<&str>) -> String {
    let base = auth_provider_url.trim_end_matches('/');
    let (heading, action, label) = match page {
        AuthPage::SignIn => ("Sign in", format!("{}/signin", base), "Continue to sign in"),
        AuthPage::SignUp => ("Create an account", format!("{}/signup", base), "Continue to sign up"),
        AuthPage::Verify => (
            "Verify your account",
            format!("{}/verify/{}", base, urlencoding::encode(subject.unwrap_or(""))),
            "Continue to verification",
        ),
    };

    let body = format!(
        r#"    <h1>{}</h1>
    <p>Authentication for {} is handled by the identity provider.</p>
    <a class="button" href="{}">{}</a>"#,
        heading,
        BRAND,
        escape(&action),
        label
    );
    layout("Authenticate", None, &body)
}

pub fn render_dashboard(vm: &DashboardViewModel, navbar: &Navbar) -> String {
    let username = vm.username().unwrap_or_default();
    let accepting = vm.accepting_feedback();

    let cards = if vm.feedbacks().is_empty() {
        "<p>No feedbacks to display.</p>".to_string()
    } else {
        vm.feedbacks().iter().map(render_feedback_card).collect::<Vec<_>>().join("\n    ")
    };

    let body = format!(
        r#"    {notifications}
    <h1>Bonjour {username}</h1>
    <section>
      <h2>Copy Your Unique Link</h2>
      {copy_link}
    </section>
    <section>
      <form method="post" action="{dashboard}/accept-feedbacks">
        <input type="hidden" name="displayed" value="{accepting}">
        <button type="submit" role="switch" aria-checked="{accepting}" class="button"{disabled}>{toggle}</button>
        <span>Accept feedbacks: {state}</span>
      </form>
    </section>
    <hr>
    <form method="post" action="{dashboard}/refresh">
      <button type="submit" class="button" aria-label="Refresh">{refresh}</button>
    </form>
    <div class="cards">
    {cards}
    </div>"#,
        notifications = render_notifications(vm.notifications()),
        username = escape(&username),
        copy_link = render_copy_link(&vm.profile_url()),
        dashboard = DASHBOARD_PATH,
        accepting = accepting,
        disabled = if vm.is_switch_loading() { " disabled" } else { "" },
        toggle = if accepting { "Turn off" } else { "Turn on" },
        state = if accepting { "On" } else { "Off" },
        refresh = if vm.is_loading() { "Loading…" } else { "Refresh" },
        cards = cards,
    );

    layout("Dashboard", Some(navbar), &body)
}
