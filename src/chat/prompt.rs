use super::types::{FetchedDataset, Role};

const PREAMBLE: &str = "Bạn là chatbot hỗ trợ sinh viên khoa.";
const HISTORY_HEADER: &str = "=== LỊCH SỬ HỘI THOẠI ===";
const DATA_HEADER: &str = "=== DỮ LIỆU TỪ DATABASE ===";
const QUESTION_HEADER: &str = "=== CÂU HỎI HIỆN TẠI ===";

/// A previous exchange. Nothing stores these yet, so the history section
/// is always rendered empty.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub response: String,
}

/// Render the model prompt. The dataset is trusted: the fetcher already
/// applied the whitelist.
pub fn assemble(role: Role, dataset: &FetchedDataset, message: &str) -> Result<String, serde_json::Error> {
    assemble_with_history(role, &[], dataset, message)
}

pub fn assemble_with_history(
    role: Role,
    history: &[ChatTurn],
    dataset: &FetchedDataset,
    message: &str,
) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(dataset)?;
    let turns: String = history
        .iter()
        .map(|turn| format!("User: {}\nBot: {}\n", turn.message, turn.response))
        .collect();

    Ok(format!(
        "{PREAMBLE}\nVai trò người hỏi: {role}\n\n\
         {HISTORY_HEADER}\n{turns}\n\
         {DATA_HEADER}\n{data}\n\n\
         {QUESTION_HEADER}\n{message}"
    ))
}
