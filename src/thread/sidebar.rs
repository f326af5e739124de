//! Profile panel shown beside an open conversation.

use serde::Serialize;

use super::model::SelectedUser;

/// Label of the action below the media grid; the CLI maps it to `logout`.
pub const LOGOUT_LABEL: &str = "Logout";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePanel {
    pub avatar: String,
    pub display_name: String,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Images shared in the conversation.
    pub media: Vec<String>,
    pub logout: &'static str,
}

impl ProfilePanel {
    /// Nothing is shown until a conversation is open.
    pub fn for_user(user: Option<&SelectedUser>, media: &[String]) -> Option<Self> {
        let user = user?;
        Some(Self {
            avatar: user.avatar().to_string(),
            display_name: user.display_name.clone(),
            online: user.online,
            bio: user.bio.clone(),
            media: media.to_vec(),
            logout: LOGOUT_LABEL,
        })
    }
}
