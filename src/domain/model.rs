use crate::domain::error::FailureReason;

// 占位提示文本
pub const PLACEHOLDER_TITLE: &str = "Enter text to translate";

/// Result of one backend call.
///
/// Cancellation is its own variant so it can never be mistaken for a
/// translated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success(String),
    Cancelled,
    Failure(FailureReason),
}

/// A query in effect as of one input-change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub generation: u64,
}

// 结果条目的种类, 决定终端渲染样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Translation,
    Diagnostic,
    Placeholder,
}

/// Follow-up command attached to a result item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub kind: ItemKind,
    pub action: Option<Action>,
}

impl ResultItem {
    pub fn placeholder() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            kind: ItemKind::Placeholder,
            action: None,
        }
    }

    pub fn translation(text: String, action: Option<Action>) -> Self {
        Self {
            title: text,
            kind: ItemKind::Translation,
            action,
        }
    }

    pub fn diagnostic(reason: &FailureReason) -> Self {
        Self {
            title: reason.to_string(),
            kind: ItemKind::Diagnostic,
            action: None,
        }
    }
}
