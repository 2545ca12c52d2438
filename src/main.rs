// Main entry point
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tt_rust::application::{ControllerSettings, QueryController};
use tt_rust::domain::error::TtError;
use tt_rust::domain::traits::TranslationBackend;
use tt_rust::infrastructure::config::{self, Config};
use tt_rust::infrastructure::logging::init_logging;
use tt_rust::interfaces::cli::Cli;
use tt_rust::interfaces::launcher;
use tt_rust::interfaces::terminal::TerminalSink;
use tt_rust::presentation::theme::Theme;
use tt_rust::state::AppState;

// 查询结束后等待后台翻译收尾的最长时间
const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config()?;
    apply_overrides(&mut config, &cli);

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor).arg(&config_path).status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    let state = AppState::new(config)?;
    let backend = state.build_backend();

    if cli.status {
        print_status(&state, &backend);
        return Ok(());
    }

    let theme_name = cli.theme.as_deref().unwrap_or(state.config.theme.as_str());
    let sink = Arc::new(TerminalSink::new(
        Theme::from_name(theme_name),
        state.config.enable_emoji,
    ));
    let controller = QueryController::from_backend(
        backend,
        sink.clone(),
        ControllerSettings::from_config(&state.config),
    )?;

    match cli.type_text.as_deref() {
        Some(text) => {
            simulate_typing(&controller, text, Duration::from_millis(cli.interval_ms)).await
        }
        None => run_interactive(&controller, &sink, &state).await,
    }

    controller.shutdown();
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(backend) = cli.backend {
        config.backend.kind = backend.into();
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(min_chars) = cli.min_chars {
        config.min_query_chars = Some(min_chars);
    }
}

/// Feed `text` to the controller one character at a time, like a fast typist.
async fn simulate_typing(controller: &QueryController, text: &str, interval: Duration) {
    let chars: Vec<char> = text.chars().collect();
    let mut previous = String::new();

    for n in 1..=chars.len() {
        let next: String = chars[..n].iter().collect();
        println!("{} {}", "›".cyan(), next.bold());
        controller.on_input_changed(&previous, &next);
        previous = next;
        tokio::time::sleep(interval).await;
    }

    wait_idle(controller).await;
}

/// Each stdin line replaces the search text. Lines starting with `:` are
/// commands: `:open [N]`, `:clear`, `:quit`.
async fn run_interactive(controller: &QueryController, sink: &TerminalSink, state: &AppState) {
    // Setup graceful shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    // Blocking stdin reads stay on their own thread so shutdown never waits on them
    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!(
        "{}",
        "Type text to translate (:open [N], :clear, :quit)".bright_black()
    );

    let mut current = String::new();
    loop {
        tokio::select! {
            line = line_rx.recv() => {
                let Some(line) = line else {
                    wait_idle(controller).await;
                    break;
                };
                let command = line.trim().to_string();
                match command.as_str() {
                    ":quit" | ":q" => break,
                    ":clear" => {
                        controller.on_input_changed(&current, "");
                        current.clear();
                    }
                    command if command.starts_with(":open") => {
                        open_item(sink, state, command.trim_start_matches(":open").trim());
                    }
                    _ => {
                        controller.on_input_changed(&current, &line);
                        current = line;
                    }
                }
            }
            Ok(()) = &mut shutdown_rx => {
                eprintln!("\nInterrupted, shutting down...");
                break;
            }
        }
    }
}

fn open_item(sink: &TerminalSink, state: &AppState, arg: &str) {
    let index = match arg {
        "" => 0,
        n => match n.parse::<usize>() {
            Ok(n) if n > 0 => n - 1,
            _ => {
                eprintln!("{}", format!("✘ Not an item number: {}", n).red());
                return;
            }
        },
    };

    match sink.action_at(index) {
        Some(action) => {
            if let Err(e) = launcher::invoke(&action, state.config.browser.as_deref()) {
                eprintln!("{}", format!("✘ Failed to open: {}", e).red());
            }
        }
        None => eprintln!("{}", "Nothing to open".yellow()),
    }
}

/// Wait for the last scheduled lookup to publish, bounded by the debounce
/// window plus `SETTLE_TIMEOUT`.
async fn wait_idle(controller: &QueryController) {
    let deadline = tokio::time::Instant::now() + controller.debounce() + SETTLE_TIMEOUT;
    while controller.is_loading() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn print_status(state: &AppState, backend: &Result<Arc<dyn TranslationBackend>, TtError>) {
    let config = &state.config;
    println!("{}", "tt Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match backend {
        Ok(backend) => println!("Backend: {}", backend.name()),
        Err(e) => println!("Backend: {} ({})", "unavailable".red(), e),
    }
    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("Debounce: {} ms", config.debounce_ms);
    println!("Min query length: {}", config.effective_min_query_chars());
    println!(
        "Cache: {}",
        if config.cache.enable {
            format!("enabled ({} entries max)", config.cache.capacity)
        } else {
            "disabled".to_string()
        }
    );
}
