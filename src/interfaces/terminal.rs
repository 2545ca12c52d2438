// Line-oriented terminal rendering of the controller's results
use crate::domain::model::{Action, ItemKind, ResultItem};
use crate::domain::traits::ResultSink;
use crate::presentation::theme::Theme;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

pub struct TerminalSink {
    theme: Theme,
    enable_emoji: bool,
    items: Mutex<Vec<ResultItem>>,
    loading: AtomicBool,
}

impl TerminalSink {
    pub fn new(theme: Theme, enable_emoji: bool) -> Self {
        Self {
            theme,
            enable_emoji,
            items: Mutex::new(Vec::new()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn current_items(&self) -> Vec<ResultItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Action of the item at `index` (0-based), if it has one
    pub fn action_at(&self, index: usize) -> Option<Action> {
        self.current_items()
            .into_iter()
            .nth(index)
            .and_then(|item| item.action)
    }

    pub fn render(&self, items: &[ResultItem]) -> String {
        let mut output = String::new();

        for (i, item) in items.iter().enumerate() {
            match item.kind {
                ItemKind::Translation => {
                    writeln!(
                        output,
                        "  {}. {}",
                        (self.theme.idx)(&(i + 1).to_string()),
                        (self.theme.translation)(&item.title)
                    )
                    .ok();
                    if let Some(Action::OpenUrl(url)) = &item.action {
                        let prefix = if self.enable_emoji { "🔗" } else { "->" };
                        writeln!(output, "     {} {}", prefix, (self.theme.link)(url)).ok();
                    }
                }
                ItemKind::Diagnostic => {
                    let prefix = if self.enable_emoji { "⚠️ " } else { "!" };
                    writeln!(output, "  {} {}", prefix, (self.theme.diagnostic)(&item.title)).ok();
                }
                ItemKind::Placeholder => {
                    writeln!(output, "  {}", (self.theme.placeholder)(&item.title)).ok();
                }
            }
        }

        output
    }
}

impl ResultSink for TerminalSink {
    fn set_results(&self, items: Vec<ResultItem>) {
        *self.items.lock().unwrap_or_else(PoisonError::into_inner) = items;
    }

    fn set_loading(&self, loading: bool) {
        let was_loading = self.loading.swap(loading, Ordering::SeqCst);
        if loading && !was_loading {
            let text = if self.enable_emoji {
                "⏳ translating..."
            } else {
                "translating..."
            };
            println!("  {}", (self.theme.loading)(text));
        }
    }

    fn notify_results_changed(&self) {
        let items = self.current_items();
        print!("{}", self.render(&items));
    }
}
