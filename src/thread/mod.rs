//! Message thread view and the profile panel beside it.

pub mod model;
pub mod sidebar;
pub mod time;
pub mod view;

pub use model::{Message, SelectedUser};
pub use sidebar::ProfilePanel;
pub use time::format_message_time;
pub use view::{ComposeEvent, ThreadScreen, ThreadView};
