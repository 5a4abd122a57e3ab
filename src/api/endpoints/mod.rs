pub mod chat;
pub mod dialogs;
pub mod health;
pub mod messages;
