//! Message thread data model.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Avatar shown when a user has none of their own.
pub const DEFAULT_AVATAR: &str = "assets/avatar_icon.png";

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub sender_id: String,
    pub created_at: DateTime<Utc>,
    /// When set, the message renders as an image instead of a text bubble.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    pub fn text(sender_id: &str, text: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.to_string(),
            sender_id: sender_id.to_string(),
            created_at,
            image: None,
        }
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image = Some(url.to_string());
        self
    }
}

/// The user whose conversation is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedUser {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub online: bool,
}

impl SelectedUser {
    /// Avatar url, falling back to the default avatar.
    pub fn avatar(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR)
    }
}

/// Mock conversation partner for the demo thread.
pub fn demo_user() -> SelectedUser {
    SelectedUser {
        id: "other-user-id".to_string(),
        display_name: "Martin Johnson".to_string(),
        avatar_url: Some("assets/profile_martin.png".to_string()),
        bio: Some("Hi everyone, happy to chat!".to_string()),
        online: true,
    }
}

/// Mock messages for the demo thread.
pub fn demo_messages(local_user_id: &str) -> Vec<Message> {
    let at = |minute| {
        Utc.with_ymd_and_hms(2025, 4, 28, 10, minute, 0)
            .single()
            .unwrap_or_else(Utc::now)
    };
    vec![
        Message::text("other-user-id", "Hello there!", at(0)),
        Message::text(local_user_id, "Hi! How are you?", at(1)),
        Message::text("other-user-id", "", at(2)).with_image("assets/pic1.png"),
    ]
}

/// Mock shared media for the profile panel.
pub fn demo_media() -> Vec<String> {
    ["assets/pic1.png", "assets/pic2.png", "assets/pic3.png", "assets/pic4.png"]
        .into_iter()
        .map(String::from)
        .collect()
}
