//! Onboarding forms for new and returning users.
//!
//! A new user signs up, writes (or generates) a short bio, and is then sent
//! to the login form. Logging in redirects home. All data stays in memory
//! for the lifetime of the flow.

pub mod flow;
pub mod state;
pub mod suggestion;
pub mod timer;
pub mod validate;

pub use flow::{Navigator, OnboardingFlow};
pub use state::{DraftSnapshot, SessionDraft, Stage, StatusKind, StatusMessage, Transition};
pub use suggestion::SuggestionRequest;
pub use timer::{Delay, ManualDelay, Timer, TimerHandle, TimerKind, TokioDelay};
