mod dialog;
mod message;

pub use dialog::{delete_dialog, get_dialog, insert_dialog};
pub use message::{
    delete_message, dialog_messages, find_reply, find_request, get_message, insert_message,
    last_dialog_messages,
};
