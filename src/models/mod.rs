pub mod dialog;
pub mod enums;

pub use dialog::{Dialog, Message, NewMessage};
pub use enums::{ChatModel, Role};
