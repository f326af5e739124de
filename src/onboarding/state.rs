//! Onboarding state machine: which form is showing and what it holds.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::suggestion::SuggestionRequest;

/// The forms of the onboarding flow.
///
/// Sign up leads to Bio, Bio leads to Login, and Login and Sign up toggle
/// between each other. There is no terminal stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    SignUp,
    Login,
    Bio,
}

impl Stage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (SignUp, Bio) | (SignUp, Login) | (Login, SignUp) | (Bio, Login)
        )
    }

    /// The stage reached through the "switch form" link, if this stage has one.
    pub fn toggled(&self) -> Option<Stage> {
        match self {
            Self::SignUp => Some(Self::Login),
            Self::Login => Some(Self::SignUp),
            Self::Bio => None,
        }
    }

    /// Heading shown above the form.
    pub fn title(&self) -> &'static str {
        match self {
            Self::SignUp => "Sign up",
            Self::Login => "Login",
            Self::Bio => "Tell us about yourself",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SignUp => "sign_up",
            Self::Login => "login",
            Self::Bio => "bio",
        };
        write!(f, "{s}")
    }
}

/// Whether a status line reports success or a failed guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient feedback shown under the active form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl From<ValidationError> for StatusMessage {
    fn from(err: ValidationError) -> Self {
        Self {
            text: err.to_string(),
            kind: StatusKind::Error,
        }
    }
}

/// Result of a single trigger: the stage now showing and its status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub stage: Stage,
    pub status: Option<StatusMessage>,
}

/// Progress of the simulated bio suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Absent,
    /// Inputs were captured when generation was requested.
    Pending(SuggestionRequest),
    Ready(String),
}

/// Fields of the sign-up form that no other stage carries.
#[derive(Debug)]
pub struct SignUpForm {
    pub password: SecretString,
    pub agree_to_terms: bool,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            password: empty_secret(),
            agree_to_terms: false,
        }
    }
}

#[derive(Debug)]
pub struct LoginForm {
    pub password: SecretString,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            password: empty_secret(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BioForm {
    pub bio_text: String,
    pub suggestion: SuggestionState,
}

/// The active form together with its stage-local fields.
#[derive(Debug)]
pub enum StageForm {
    SignUp(SignUpForm),
    Login(LoginForm),
    Bio(BioForm),
}

impl StageForm {
    pub fn stage(&self) -> Stage {
        match self {
            Self::SignUp(_) => Stage::SignUp,
            Self::Login(_) => Stage::Login,
            Self::Bio(_) => Stage::Bio,
        }
    }
}

/// Everything typed into the onboarding forms during one page session.
#[derive(Debug)]
pub struct SessionDraft {
    pub full_name: String,
    /// Carried across every stage so login can reuse it.
    pub email: String,
    pub form: StageForm,
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            form: StageForm::SignUp(SignUpForm::default()),
        }
    }
}

impl SessionDraft {
    pub fn stage(&self) -> Stage {
        self.form.stage()
    }

    /// Password typed into the current form; empty on the Bio form.
    pub fn password(&self) -> &str {
        match &self.form {
            StageForm::SignUp(form) => form.password.expose_secret(),
            StageForm::Login(form) => form.password.expose_secret(),
            StageForm::Bio(_) => "",
        }
    }

    pub fn agree_to_terms(&self) -> bool {
        matches!(&self.form, StageForm::SignUp(form) if form.agree_to_terms)
    }

    pub fn bio_text(&self) -> &str {
        match &self.form {
            StageForm::Bio(form) => &form.bio_text,
            _ => "",
        }
    }

    /// The finished suggestion, if one has been generated.
    pub fn bio_suggestion(&self) -> Option<&str> {
        match &self.form {
            StageForm::Bio(BioForm {
                suggestion: SuggestionState::Ready(text),
                ..
            }) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn suggestion_pending(&self) -> bool {
        matches!(
            &self.form,
            StageForm::Bio(BioForm {
                suggestion: SuggestionState::Pending(_),
                ..
            })
        )
    }

    /// A serializable view of the draft. The password itself is never included.
    pub fn snapshot(&self, status: Option<&StatusMessage>) -> DraftSnapshot {
        let stage = self.stage();
        DraftSnapshot {
            stage,
            title: stage.title(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            password_set: !self.password().is_empty(),
            agree_to_terms: match &self.form {
                StageForm::SignUp(form) => Some(form.agree_to_terms),
                _ => None,
            },
            bio_text: match &self.form {
                StageForm::Bio(form) => Some(form.bio_text.clone()),
                _ => None,
            },
            bio_suggestion: self.bio_suggestion().map(str::to_string),
            suggestion_pending: self.suggestion_pending(),
            status: status.cloned(),
        }
    }
}

/// Serializable view of a [`SessionDraft`] for display and logging.
#[derive(Debug, Clone, Serialize)]
pub struct DraftSnapshot {
    pub stage: Stage,
    pub title: &'static str,
    pub full_name: String,
    pub email: String,
    pub password_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agree_to_terms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio_suggestion: Option<String>,
    pub suggestion_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusMessage>,
}

pub(crate) fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use Stage::*;
        let transitions = [(SignUp, Bio), (SignUp, Login), (Login, SignUp), (Bio, Login)];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use Stage::*;
        // Bio is only reachable from sign up
        assert!(!Login.can_transition_to(Bio));
        // Bio has no way back to sign up
        assert!(!Bio.can_transition_to(SignUp));
        // Self-transition
        assert!(!SignUp.can_transition_to(SignUp));
        assert!(!Bio.can_transition_to(Bio));
    }

    #[test]
    fn toggled_pairs_sign_up_and_login() {
        assert_eq!(Stage::SignUp.toggled(), Some(Stage::Login));
        assert_eq!(Stage::Login.toggled(), Some(Stage::SignUp));
        assert_eq!(Stage::Bio.toggled(), None);
    }

    #[test]
    fn display_matches_serde() {
        for stage in [Stage::SignUp, Stage::Login, Stage::Bio] {
            let display = format!("{stage}");
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{display}\""), json, "Display and serde should match for {stage:?}");
        }
    }

    #[test]
    fn default_draft_starts_on_sign_up() {
        let draft = SessionDraft::default();
        assert_eq!(draft.stage(), Stage::SignUp);
        assert!(draft.password().is_empty());
        assert!(!draft.agree_to_terms());
        assert!(draft.bio_suggestion().is_none());
        assert!(!draft.suggestion_pending());
    }

    #[test]
    fn terms_only_exist_on_sign_up() {
        let draft = SessionDraft {
            form: StageForm::Login(LoginForm::default()),
            ..Default::default()
        };
        assert!(!draft.agree_to_terms());
        assert_eq!(draft.snapshot(None).agree_to_terms, None);
    }

    #[test]
    fn snapshot_hides_password() {
        let draft = SessionDraft {
            full_name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            form: StageForm::SignUp(SignUpForm {
                password: SecretString::from("pass1".to_string()),
                agree_to_terms: true,
            }),
        };

        let json = serde_json::to_value(draft.snapshot(None)).unwrap();
        assert_eq!(json["stage"], "sign_up");
        assert_eq!(json["title"], "Sign up");
        assert_eq!(json["password_set"], true);
        assert_eq!(json["agree_to_terms"], true);
        assert!(!json.to_string().contains("pass1"));
        assert!(!format!("{draft:?}").contains("pass1"));
    }

    #[test]
    fn pending_suggestion_is_not_final() {
        let draft = SessionDraft {
            form: StageForm::Bio(BioForm {
                bio_text: "hiking".into(),
                suggestion: SuggestionState::Pending(SuggestionRequest::new("Jane", "hiking")),
            }),
            ..Default::default()
        };
        assert!(draft.suggestion_pending());
        assert!(draft.bio_suggestion().is_none());
    }

    #[test]
    fn validation_error_becomes_error_status() {
        let status = StatusMessage::from(ValidationError::InvalidEmail);
        assert!(status.is_error());
        assert_eq!(status.text, "Please enter a valid email address.");
        assert!(!StatusMessage::success("ok").is_error());
    }
}
