//! State behind the dashboard page: the feedback list, the acceptance switch
//! and the notifications produced by each user action.

use super::notification::Notification;
use crate::api::metrics;
use crate::models::{Feedback, FeedbackList};
use crate::services::{FeedbackApi, SessionContext};
use crate::utils::AppError;
use std::sync::Arc;

pub const PROFILE_PATH: &str = "/u/";

pub const FETCH_FEEDBACKS_FAILED: &str = "Failed to fetch feedbacks";
pub const FETCH_SETTINGS_FAILED: &str = "Failed to fetch feedback settings";
pub const UPDATE_SETTINGS_FAILED: &str = "Failed to update feedback settings";
pub const DELETE_FAILED: &str = "Failed to delete feedback";
// The copy itself runs in the browser; the page reports through these toasts.
pub const COPY_SUCCEEDED: &str = "Profile URL copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy URL";

/// `{origin}/u/{username}`; either part may be empty.
pub fn profile_url(origin: Option<&str>, username: Option<&str>) -> String {
    format!(
        "{}{}{}",
        origin.unwrap_or(""),
        PROFILE_PATH,
        urlencoding::encode(username.unwrap_or(""))
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    LoadFeedbacks { refresh: bool },
    LoadAcceptance,
    /// `displayed` is the switch position the user saw when flipping it.
    ToggleAcceptance { displayed: bool },
    DeleteFeedback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Ready,
    RedirectToSignIn,
}

pub struct DashboardViewModel {
    api: Arc<dyn FeedbackApi>,
    session: SessionContext,
    origin: Option<String>,
    feedbacks: Vec<Feedback>,
    accepting_feedback: bool,
    is_loading: bool,
    is_switch_loading: bool,
    notifications: Vec<Notification>,
}

impl DashboardViewModel {
    pub fn new(api: Arc<dyn FeedbackApi>, session: SessionContext, origin: Option<String>) -> Self {
        Self {
            api,
            session,
            origin,
            feedbacks: Vec::new(),
            accepting_feedback: false,
            is_loading: false,
            is_switch_loading: false,
            notifications: Vec::new(),
        }
    }

    pub fn feedbacks(&self) -> &[Feedback] {
        &self.feedbacks
    }

    pub fn accepting_feedback(&self) -> bool {
        self.accepting_feedback
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_switch_loading(&self) -> bool {
        self.is_switch_loading
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn username(&self) -> Option<String> {
        self.session
            .snapshot()
            .session()
            .and_then(|s| s.user.username.clone())
    }

    /// Recomputed on every call.
    pub fn profile_url(&self) -> String {
        profile_url(self.origin.as_deref(), self.username().as_deref())
    }

    /// Waits for the session to settle, then loads the list and the flag together.
    /// Nothing is fetched without a session.
    pub async fn mount(&mut self) -> MountOutcome {
        self.open(false).await
    }

    /// Like `mount`, but announces the list load as a user-requested refresh.
    pub async fn mount_refreshed(&mut self) -> MountOutcome {
        self.open(true).await
    }

    async fn open(&mut self, refresh: bool) -> MountOutcome {
        if self.session.settled().await.session().is_none() {
            return MountOutcome::RedirectToSignIn;
        }

        self.is_loading = true;
        self.is_switch_loading = true;
        let api = Arc::clone(&self.api);
        let (list, flag) = futures::join!(api.list_feedbacks(), api.accepting_feedback());
        self.apply_feedbacks(list, refresh);
        self.apply_acceptance(flag);
        MountOutcome::Ready
    }

    pub async fn run(&mut self, command: DashboardCommand) -> CommandResult {
        match command {
            DashboardCommand::LoadFeedbacks { refresh } => self.load_feedbacks(refresh).await,
            DashboardCommand::LoadAcceptance => self.load_acceptance().await,
            DashboardCommand::ToggleAcceptance { displayed } => {
                self.toggle_acceptance_from(displayed).await
            }
            DashboardCommand::DeleteFeedback(id) => self.delete_feedback(&id).await,
        }
    }

    pub async fn load_feedbacks(&mut self, refresh: bool) -> CommandResult {
        self.is_loading = true;
        let result = self.api.list_feedbacks().await;
        self.apply_feedbacks(result, refresh)
    }

    pub async fn load_acceptance(&mut self) -> CommandResult {
        self.is_switch_loading = true;
        let result = self.api.accepting_feedback().await;
        self.apply_acceptance(result)
    }

    /// Sends the negated flag; local state changes only once the server accepts it.
    pub async fn toggle_acceptance(&mut self) -> CommandResult {
        self.toggle_acceptance_from(self.accepting_feedback).await
    }

    /// Sends `!displayed`. Repeating the same request asks for the same value again,
    /// and a failed flag load does not change what gets sent.
    pub async fn toggle_acceptance_from(&mut self, displayed: bool) -> CommandResult {
        let target = !displayed;
        match self.api.set_accepting_feedback(target).await {
            Ok(message) => {
                self.accepting_feedback = target;
                self.notifications.push(Notification::info(message));
                CommandResult::Succeeded
            }
            Err(e) => self.fail("update feedback settings", &e, UPDATE_SETTINGS_FAILED),
        }
    }

    /// Removes the item locally first; the server call's outcome never restores it.
    pub async fn delete_feedback(&mut self, id: &str) -> CommandResult {
        self.remove_feedback(id);
        match self.api.delete_feedback(id).await {
            Ok(message) => {
                self.notifications.push(Notification::info(message));
                CommandResult::Succeeded
            }
            Err(e) => self.fail("delete feedback", &e, DELETE_FAILED),
        }
    }

    /// Drops every local entry with this id, keeping the others in order.
    pub fn remove_feedback(&mut self, id: &str) {
        self.feedbacks.retain(|f| f.id != id);
    }

    fn apply_feedbacks(&mut self, result: Result<FeedbackList, AppError>, refresh: bool) -> CommandResult {
        self.is_loading = false;
        match result {
            Ok(list) => {
                self.feedbacks = list.into_vec();
                if refresh {
                    self.notifications.push(
                        Notification::info("Refreshed feedbacks")
                            .with_description("Showing latest feedbacks"),
                    );
                }
                CommandResult::Succeeded
            }
            // keep whatever is already displayed
            Err(e) => self.fail("fetch feedbacks", &e, FETCH_FEEDBACKS_FAILED),
        }
    }

    fn apply_acceptance(&mut self, result: Result<bool, AppError>) -> CommandResult {
        self.is_switch_loading = false;
        match result {
            Ok(accepting) => {
                self.accepting_feedback = accepting;
                CommandResult::Succeeded
            }
            Err(e) => self.fail("fetch feedback settings", &e, FETCH_SETTINGS_FAILED),
        }
    }

    fn fail(&mut self, action: &str, error: &AppError, fallback: &str) -> CommandResult {
        log::warn!("❌ Failed to {}: {}", action, error);
        metrics::increment_remote_failure_count();
        self.notifications
            .push(Notification::error(error.server_message(), fallback));
        CommandResult::Failed
    }
}
