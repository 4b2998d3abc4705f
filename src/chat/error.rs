use thiserror::Error;

use crate::llm::LlmError;

pub const EMPTY_MESSAGE_REPLY: &str = "Xin lỗi, vui lòng nhập tin nhắn.";
pub const EMPTY_REPLY_FALLBACK: &str = "Xin lỗi, tôi không thể tạo phản hồi. Vui lòng thử lại.";
pub const ERROR_FALLBACK: &str = "Xin lỗi, đã xảy ra lỗi khi xử lý câu hỏi. Vui lòng thử lại sau.";

/// Failures of one chat round trip. Store errors never show up here: they
/// only drop the affected table from the dataset.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Model(#[from] LlmError),

    #[error("Model backend returned an empty reply")]
    EmptyReply,

    #[error("Failed to serialize fetched data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ChatError {
    /// User-facing text for this failure. `expose_detail` appends the error
    /// message (never a backtrace) for diagnostics.
    pub fn fallback_reply(&self, expose_detail: bool) -> String {
        match self {
            ChatError::EmptyReply => EMPTY_REPLY_FALLBACK.to_string(),
            other if expose_detail => format!("Xin lỗi, đã xảy ra lỗi khi xử lý: {}", other),
            _ => ERROR_FALLBACK.to_string(),
        }
    }
}
