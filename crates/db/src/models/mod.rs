mod booking;
mod chat_message;
mod provider;
mod user;

pub use booking::Booking;
pub use chat_message::{ChatMessage, ChatRole};
pub use provider::{Provider, ProviderStatus, ProviderType};
pub use user::User;
