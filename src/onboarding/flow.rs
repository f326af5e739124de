//! OnboardingFlow drives the onboarding forms.
//!
//! Every trigger runs to completion synchronously and returns a
//! [`Transition`]. Simulated latency goes through the injected [`Delay`]; the
//! fired [`Timer`] comes back through [`OnboardingFlow::handle_timer`] and is
//! dropped if it belongs to another session, was superseded, or arrives after
//! teardown.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::error::FlowError;

use super::state::{
    BioForm, DraftSnapshot, LoginForm, SessionDraft, SignUpForm, Stage, StageForm,
    StatusMessage, SuggestionState, Transition, empty_secret,
};
use super::suggestion::SuggestionRequest;
use super::timer::{Delay, Timer, TimerHandle, TimerKind};
use super::validate;

pub const SIGN_UP_SUCCESS: &str = "Sign up successful! Please enter your bio.";
pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const BIO_SAVED: &str = "Bio saved! Redirecting to Login...";

/// Navigation collaborator, called once after a successful login.
pub trait Navigator: Send + Sync {
    fn go_home(&self);
}

struct PendingTimer {
    id: Uuid,
    handle: TimerHandle,
}

/// Client-local onboarding state machine.
pub struct OnboardingFlow {
    session: Uuid,
    config: FlowConfig,
    draft: SessionDraft,
    status: Option<StatusMessage>,
    delay: Arc<dyn Delay>,
    navigator: Arc<dyn Navigator>,
    timers: HashMap<TimerKind, PendingTimer>,
    torn_down: bool,
}

impl OnboardingFlow {
    pub fn new(config: FlowConfig, delay: Arc<dyn Delay>, navigator: Arc<dyn Navigator>) -> Self {
        let session = Uuid::new_v4();
        debug!(session = %session, "Onboarding session started");
        Self {
            session,
            config,
            draft: SessionDraft::default(),
            status: None,
            delay,
            navigator,
            timers: HashMap::new(),
            torn_down: false,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn stage(&self) -> Stage {
        self.draft.stage()
    }

    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        self.draft.snapshot(self.status.as_ref())
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether a timer of this kind is scheduled and has not fired yet.
    pub fn is_waiting_on(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }

    // ── Field edits ─────────────────────────────────────────────────────

    pub fn set_full_name(&mut self, value: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_live()?;
        match self.draft.form {
            StageForm::SignUp(_) => {
                self.draft.full_name = value.into();
                Ok(())
            }
            _ => Err(self.unavailable_field("full_name")),
        }
    }

    pub fn set_email(&mut self, value: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_live()?;
        match self.draft.form {
            StageForm::SignUp(_) | StageForm::Login(_) => {
                self.draft.email = value.into();
                Ok(())
            }
            StageForm::Bio(_) => Err(self.unavailable_field("email")),
        }
    }

    pub fn set_password(&mut self, value: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_live()?;
        let secret = SecretString::from(value.into());
        match &mut self.draft.form {
            StageForm::SignUp(form) => form.password = secret,
            StageForm::Login(form) => form.password = secret,
            StageForm::Bio(_) => return Err(self.unavailable_field("password")),
        }
        Ok(())
    }

    pub fn set_agree_to_terms(&mut self, agreed: bool) -> Result<(), FlowError> {
        self.ensure_live()?;
        match &mut self.draft.form {
            StageForm::SignUp(form) => {
                form.agree_to_terms = agreed;
                Ok(())
            }
            _ => Err(self.unavailable_field("agree_to_terms")),
        }
    }

    pub fn set_bio_text(&mut self, value: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_live()?;
        match &mut self.draft.form {
            StageForm::Bio(form) => {
                form.bio_text = value.into();
                Ok(())
            }
            _ => Err(self.unavailable_field("bio_text")),
        }
    }

    /// Edit the generated suggestion in place. Ignored until one is ready.
    pub fn edit_suggestion(&mut self, value: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_live()?;
        match &mut self.draft.form {
            StageForm::Bio(BioForm {
                suggestion: SuggestionState::Ready(text),
                ..
            }) => {
                *text = value.into();
                Ok(())
            }
            StageForm::Bio(_) => {
                debug!("No suggestion to edit yet");
                Ok(())
            }
            _ => Err(self.unavailable_field("bio_suggestion")),
        }
    }

    // ── Triggers ────────────────────────────────────────────────────────

    /// Submit the active form. On the bio form this is the same as finishing.
    pub fn submit(&mut self) -> Result<Transition, FlowError> {
        self.ensure_live()?;
        match self.stage() {
            Stage::SignUp => Ok(self.submit_sign_up()),
            Stage::Login => Ok(self.submit_login()),
            Stage::Bio => self.finish_bio(),
        }
    }

    fn submit_sign_up(&mut self) -> Transition {
        let StageForm::SignUp(form) = &self.draft.form else {
            return self.current();
        };
        let checked = validate::check_sign_up(
            &self.draft.full_name,
            &self.draft.email,
            self.draft.password(),
            form.agree_to_terms,
        );
        if let Err(e) = checked {
            return self.reject(e.into());
        }

        info!(session = %self.session, "Sign up accepted");
        // Password and terms do not carry into the bio form.
        self.enter(
            StageForm::Bio(BioForm::default()),
            Some(StatusMessage::success(SIGN_UP_SUCCESS)),
        )
    }

    fn submit_login(&mut self) -> Transition {
        if self.is_waiting_on(TimerKind::LoginRedirect) {
            debug!("Login already accepted, redirect pending");
            return self.current();
        }
        if let Err(e) = validate::check_login(&self.draft.email, self.draft.password()) {
            return self.reject(e.into());
        }

        info!(session = %self.session, "Login accepted");
        self.status = Some(StatusMessage::success(LOGIN_SUCCESS));
        self.schedule(TimerKind::LoginRedirect);
        self.current()
    }

    /// Switch between the sign up and login forms.
    pub fn toggle(&mut self) -> Result<Transition, FlowError> {
        self.ensure_live()?;
        let stage = self.stage();
        let Some(target) = stage.toggled() else {
            return Err(FlowError::TriggerUnavailable {
                trigger: "toggle",
                stage,
            });
        };

        // The password field stays filled; terms exist only on the sign up form.
        let password = match &mut self.draft.form {
            StageForm::SignUp(form) => std::mem::replace(&mut form.password, empty_secret()),
            StageForm::Login(form) => std::mem::replace(&mut form.password, empty_secret()),
            StageForm::Bio(_) => empty_secret(),
        };

        self.cancel(TimerKind::LoginRedirect);
        let form = match target {
            Stage::SignUp => StageForm::SignUp(SignUpForm {
                password,
                agree_to_terms: false,
            }),
            _ => StageForm::Login(LoginForm { password }),
        };
        Ok(self.enter(form, None))
    }

    /// Start generating a bio suggestion from the name and bio text.
    pub fn generate_suggestion(&mut self) -> Result<Transition, FlowError> {
        self.ensure_live()?;
        if self.is_waiting_on(TimerKind::BioFinish) {
            debug!("Bio already saved, ignoring suggestion request");
            return Ok(self.current());
        }
        let full_name = self.draft.full_name.clone();
        let StageForm::Bio(form) = &mut self.draft.form else {
            return Err(self.unavailable_trigger("generate_suggestion"));
        };
        if matches!(form.suggestion, SuggestionState::Pending(_)) {
            debug!("Suggestion already pending, ignoring request");
            return Ok(self.current());
        }
        if let Err(e) = validate::check_bio_prompt(&form.bio_text) {
            return Ok(self.reject(e.into()));
        }

        form.suggestion = SuggestionState::Pending(SuggestionRequest::new(&full_name, &form.bio_text));
        self.status = None;
        self.schedule(TimerKind::Suggestion);
        debug!(session = %self.session, "Suggestion requested");
        Ok(self.current())
    }

    /// Copy the generated suggestion into the bio text.
    pub fn accept_suggestion(&mut self) -> Result<Transition, FlowError> {
        self.ensure_live()?;
        let StageForm::Bio(form) = &mut self.draft.form else {
            return Err(self.unavailable_trigger("accept_suggestion"));
        };
        match &form.suggestion {
            SuggestionState::Ready(text) => form.bio_text = text.clone(),
            _ => debug!("No suggestion to accept"),
        }
        Ok(self.current())
    }

    /// Save the bio and, after the configured delay, show the login form.
    pub fn finish_bio(&mut self) -> Result<Transition, FlowError> {
        self.ensure_live()?;
        let StageForm::Bio(form) = &self.draft.form else {
            return Err(self.unavailable_trigger("finish_bio"));
        };
        if self.is_waiting_on(TimerKind::BioFinish) {
            debug!("Bio already saved, waiting for redirect");
            return Ok(self.current());
        }
        let suggestion = match &form.suggestion {
            SuggestionState::Ready(text) => Some(text.as_str()),
            _ => None,
        };
        if let Err(e) = validate::check_bio_finish(&form.bio_text, suggestion) {
            return Ok(self.reject(e.into()));
        }

        info!(session = %self.session, "Bio saved");
        self.status = Some(StatusMessage::success(BIO_SAVED));
        self.schedule(TimerKind::BioFinish);
        Ok(self.current())
    }

    // ── Timers ──────────────────────────────────────────────────────────

    /// Apply a fired timer. Returns `None` when the timer is stale.
    pub fn handle_timer(&mut self, timer: Timer) -> Option<Transition> {
        if self.torn_down {
            debug!(timer_id = %timer.id, kind = ?timer.kind, "Timer fired after teardown, dropped");
            return None;
        }
        if timer.session != self.session {
            warn!(
                timer_session = %timer.session,
                session = %self.session,
                kind = ?timer.kind,
                "Timer from another session, dropped"
            );
            return None;
        }
        if self.timers.get(&timer.kind).map(|p| p.id) != Some(timer.id) {
            debug!(timer_id = %timer.id, kind = ?timer.kind, "Superseded timer, dropped");
            return None;
        }
        self.timers.remove(&timer.kind);

        match timer.kind {
            TimerKind::LoginRedirect => self.complete_login(),
            TimerKind::Suggestion => self.complete_suggestion(),
            TimerKind::BioFinish => self.complete_bio(),
        }
    }

    fn complete_login(&mut self) -> Option<Transition> {
        if self.stage() != Stage::Login {
            return None;
        }
        info!(session = %self.session, "Redirecting home");
        self.navigator.go_home();
        // Navigation leaves the page; nothing may redirect twice.
        let transition = self.current();
        self.teardown();
        Some(transition)
    }

    fn complete_suggestion(&mut self) -> Option<Transition> {
        let StageForm::Bio(form) = &mut self.draft.form else {
            return None;
        };
        let SuggestionState::Pending(request) = &form.suggestion else {
            return None;
        };
        form.suggestion = SuggestionState::Ready(request.render());
        self.status = None;
        debug!(session = %self.session, "Suggestion ready");
        Some(self.current())
    }

    fn complete_bio(&mut self) -> Option<Transition> {
        if self.stage() != Stage::Bio {
            return None;
        }
        self.cancel(TimerKind::Suggestion);
        // Everything except the email is reset before login.
        self.draft.full_name.clear();
        Some(self.enter(StageForm::Login(LoginForm::default()), None))
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Cancel every outstanding timer and refuse further input.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let outstanding = self.timers.len();
        self.cancel_all();
        self.torn_down = true;
        info!(session = %self.session, outstanding, "Onboarding torn down");
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn enter(&mut self, form: StageForm, status: Option<StatusMessage>) -> Transition {
        let from = self.stage();
        let to = form.stage();
        if !from.can_transition_to(to) {
            warn!(from = %from, to = %to, "Unexpected stage transition");
        }
        self.draft.form = form;
        self.status = status;
        info!(session = %self.session, from = %from, to = %to, "Stage changed");
        self.current()
    }

    fn reject(&mut self, status: StatusMessage) -> Transition {
        debug!(stage = %self.stage(), reason = %status.text, "Guard failed");
        self.status = Some(status);
        self.current()
    }

    fn current(&self) -> Transition {
        Transition {
            stage: self.stage(),
            status: self.status.clone(),
        }
    }

    fn delay_for(&self, kind: TimerKind) -> std::time::Duration {
        match kind {
            TimerKind::LoginRedirect => self.config.login_redirect_delay,
            TimerKind::Suggestion => self.config.suggestion_delay,
            TimerKind::BioFinish => self.config.bio_finish_delay,
        }
    }

    fn schedule(&mut self, kind: TimerKind) {
        self.cancel(kind);
        let timer = Timer {
            id: Uuid::new_v4(),
            session: self.session,
            kind,
        };
        let handle = self.delay.after(self.delay_for(kind), timer);
        self.timers.insert(kind, PendingTimer { id: timer.id, handle });
    }

    fn cancel(&mut self, kind: TimerKind) {
        if let Some(pending) = self.timers.remove(&kind) {
            pending.handle.cancel();
            debug!(timer_id = %pending.id, kind = ?kind, "Timer cancelled");
        }
    }

    fn cancel_all(&mut self) {
        for (_, pending) in self.timers.drain() {
            pending.handle.cancel();
        }
    }

    fn ensure_live(&self) -> Result<(), FlowError> {
        if self.torn_down {
            return Err(FlowError::TornDown);
        }
        Ok(())
    }

    fn unavailable_field(&self, field: &'static str) -> FlowError {
        FlowError::FieldUnavailable {
            field,
            stage: self.stage(),
        }
    }

    fn unavailable_trigger(&self, trigger: &'static str) -> FlowError {
        FlowError::TriggerUnavailable {
            trigger,
            stage: self.stage(),
        }
    }
}

impl Drop for OnboardingFlow {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
