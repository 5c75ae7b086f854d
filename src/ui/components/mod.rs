//! Reusable UI components.

mod comments;
mod help_bar;
mod input;
mod loading;
mod modal;
mod notification;
mod picker;
mod text_editor;

pub use comments::{format_timestamp, relative_time, CommentAction, CommentThread};
pub use help_bar::render_context_help;
pub use input::TextInput;
pub use loading::LoadingIndicator;
pub use modal::{centered_rect, ConfirmAction, ConfirmDialog, ErrorDialog};
pub use notification::{Notification, NotificationKind, NotificationManager};
pub use picker::{Picker, PickerAction, PickerItem};
pub use text_editor::TextEditor;
