// handlers/mod.rs
//
// public: service info and health, never authenticated
// chat:   the relay endpoint; the principal middleware runs in front of it

pub mod chat;
pub mod public;

pub use chat::{chat_get, chat_post, ChatRequest, ChatResponse};
pub use public::{health, root};
