//! Thread view: laid-out message rows plus the compose panel.
//!
//! Holds no business rules: it lays out messages for the local user and
//! turns send actions into [`ComposeEvent`]s for whoever delivers them.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::ThreadConfig;

use super::model::{DEFAULT_AVATAR, Message, SelectedUser};
use super::time::format_message_time;

/// Shown when no conversation is open.
pub const PLACEHOLDER_TAGLINE: &str = "Chat anytime, anywhere";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum MessageBody {
    Text(String),
    Image(String),
}

/// One laid-out message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    pub alignment: Alignment,
    pub body: MessageBody,
    pub time: String,
    /// Sender avatar on the left for others, local avatar on the right for self.
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadHeader {
    pub display_name: String,
    pub avatar: String,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "screen")]
pub enum ThreadScreen {
    Placeholder { tagline: &'static str },
    Conversation { header: ThreadHeader, rows: Vec<MessageRow> },
}

/// Text and optional image waiting to be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub text: String,
    pub image: Option<String>,
}

/// Emitted when the user sends the compose draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeEvent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// View state for one conversation.
pub struct ThreadView {
    local_user_id: String,
    selected: Option<SelectedUser>,
    messages: Arc<[Message]>,
    draft: ComposeDraft,
}

impl ThreadView {
    pub fn new(config: &ThreadConfig) -> Self {
        Self {
            local_user_id: config.local_user_id.clone(),
            selected: None,
            messages: Arc::from(Vec::new()),
            draft: ComposeDraft::default(),
        }
    }

    pub fn local_user_id(&self) -> &str {
        &self.local_user_id
    }

    pub fn select(&mut self, user: SelectedUser) {
        debug!(user_id = %user.id, "Conversation opened");
        self.selected = Some(user);
    }

    /// Close the conversation (the header's back arrow).
    pub fn back(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&SelectedUser> {
        self.selected.as_ref()
    }

    /// Replace the message list. Returns true when the view should scroll to
    /// the newest message, i.e. whenever a different list is handed in.
    pub fn set_messages(&mut self, messages: Arc<[Message]>) -> bool {
        if Arc::ptr_eq(&self.messages, &messages) {
            return false;
        }
        self.messages = messages;
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn render(&self) -> ThreadScreen {
        let Some(user) = &self.selected else {
            return ThreadScreen::Placeholder {
                tagline: PLACEHOLDER_TAGLINE,
            };
        };

        let rows = self
            .messages
            .iter()
            .map(|msg| self.row(msg, user))
            .collect();

        ThreadScreen::Conversation {
            header: ThreadHeader {
                display_name: user.display_name.clone(),
                avatar: user.avatar().to_string(),
                online: user.online,
            },
            rows,
        }
    }

    fn row(&self, msg: &Message, user: &SelectedUser) -> MessageRow {
        let is_self = msg.sender_id == self.local_user_id;
        let body = match &msg.image {
            Some(url) => MessageBody::Image(url.clone()),
            None => MessageBody::Text(msg.text.clone()),
        };
        MessageRow {
            alignment: if is_self { Alignment::Right } else { Alignment::Left },
            body,
            time: format_message_time(msg.created_at),
            avatar: if is_self {
                DEFAULT_AVATAR.to_string()
            } else {
                user.avatar().to_string()
            },
        }
    }

    // ── Compose ─────────────────────────────────────────────────────────

    pub fn draft(&self) -> &ComposeDraft {
        &self.draft
    }

    pub fn set_compose_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn attach_image(&mut self, url: impl Into<String>) {
        self.draft.image = Some(url.into());
    }

    pub fn remove_image(&mut self) {
        self.draft.image = None;
    }

    /// Enter sends; Shift+Enter adds a line break.
    pub fn press_enter(&mut self, shift: bool) -> Option<ComposeEvent> {
        if shift {
            self.draft.text.push('\n');
            return None;
        }
        self.send()
    }

    /// Take the draft as a compose event. Blank drafts without an image send nothing.
    pub fn send(&mut self) -> Option<ComposeEvent> {
        let text = self.draft.text.trim();
        if text.is_empty() && self.draft.image.is_none() {
            return None;
        }
        let event = ComposeEvent {
            text: text.to_string(),
            image: self.draft.image.take(),
        };
        self.draft.text.clear();
        debug!(has_image = event.image.is_some(), "Compose submitted");
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::model::{demo_messages, demo_user};

    fn view() -> ThreadView {
        ThreadView::new(&ThreadConfig {
            local_user_id: "me".to_string(),
        })
    }

    #[test]
    fn placeholder_without_selection() {
        let mut view = view();
        view.set_messages(Arc::from(demo_messages("me")));
        assert_eq!(
            view.render(),
            ThreadScreen::Placeholder {
                tagline: PLACEHOLDER_TAGLINE
            }
        );
    }

    #[test]
    fn rows_align_by_sender() {
        let mut view = view();
        view.select(demo_user());
        view.set_messages(Arc::from(demo_messages("me")));

        let ThreadScreen::Conversation { header, rows } = view.render() else {
            panic!("Expected conversation");
        };
        assert_eq!(header.display_name, "Martin Johnson");
        assert!(header.online);

        assert_eq!(rows[0].alignment, Alignment::Left);
        assert_eq!(rows[0].body, MessageBody::Text("Hello there!".into()));
        assert_eq!(rows[0].time, "10:00 AM");
        assert_eq!(rows[0].avatar, "assets/profile_martin.png");

        assert_eq!(rows[1].alignment, Alignment::Right);
        assert_eq!(rows[1].avatar, DEFAULT_AVATAR);

        assert_eq!(rows[2].body, MessageBody::Image("assets/pic1.png".into()));
    }

    #[test]
    fn back_closes_conversation() {
        let mut view = view();
        view.select(demo_user());
        view.back();
        assert!(view.selected().is_none());
        assert!(matches!(view.render(), ThreadScreen::Placeholder { .. }));
    }

    #[test]
    fn scroll_only_when_list_changes() {
        let mut view = view();
        let list: Arc<[Message]> = Arc::from(demo_messages("me"));
        assert!(view.set_messages(Arc::clone(&list)));
        assert!(!view.set_messages(Arc::clone(&list)));

        // same contents, new list
        assert!(view.set_messages(Arc::from(demo_messages("me"))));
    }

    #[test]
    fn enter_sends_and_clears() {
        let mut view = view();
        view.set_compose_text("  hello ");
        let event = view.press_enter(false).unwrap();
        assert_eq!(
            event,
            ComposeEvent {
                text: "hello".into(),
                image: None
            }
        );
        assert_eq!(view.draft(), &ComposeDraft::default());
    }

    #[test]
    fn shift_enter_adds_newline() {
        let mut view = view();
        view.set_compose_text("line one");
        assert!(view.press_enter(true).is_none());
        assert_eq!(view.draft().text, "line one\n");
    }

    #[test]
    fn blank_draft_sends_nothing() {
        let mut view = view();
        view.set_compose_text("   ");
        assert!(view.send().is_none());
        assert_eq!(view.draft().text, "   ");
    }

    #[test]
    fn image_only_draft_sends() {
        let mut view = view();
        view.attach_image("assets/pic2.png");
        let event = view.send().unwrap();
        assert_eq!(event.text, "");
        assert_eq!(event.image.as_deref(), Some("assets/pic2.png"));
        assert!(view.draft().image.is_none());

        view.attach_image("x.png");
        view.remove_image();
        assert!(view.send().is_none());
    }

    #[test]
    fn screen_serializes_with_tags() {
        let mut view = view();
        view.select(demo_user());
        view.set_messages(Arc::from(demo_messages("me")));
        let json = serde_json::to_value(view.render()).unwrap();
        assert_eq!(json["screen"], "conversation");
        assert_eq!(json["rows"][1]["alignment"], "right");
        assert_eq!(json["rows"][2]["body"]["kind"], "image");
    }
}
