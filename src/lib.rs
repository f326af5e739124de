//! Chat Onboarding: client-side onboarding flow and message thread view.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod thread;
