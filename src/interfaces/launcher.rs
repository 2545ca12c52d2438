// Fire-and-forget execution of result item actions
use crate::domain::error::TtError;
use crate::domain::model::Action;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Run `action`. The spawned process is reaped on a background thread and
/// its exit status is only logged.
pub fn invoke(action: &Action, browser: Option<&str>) -> Result<(), TtError> {
    match action {
        Action::OpenUrl(url) => open_url(url, browser),
    }
}

fn open_url(url: &str, browser: Option<&str>) -> Result<(), TtError> {
    let argv = opener_argv(url, browser);
    debug!(?argv, "opening url");

    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => warn!(%status, "url opener exited with failure"),
        Ok(_) => {}
        Err(e) => warn!("failed to wait for url opener: {}", e),
    });

    Ok(())
}

/// Command line used to open `url`: the configured browser (e.g.
/// `"firefox --new-tab"`) or the platform default opener.
pub fn opener_argv(url: &str, browser: Option<&str>) -> Vec<String> {
    let mut argv: Vec<String> = match browser.map(str::trim).filter(|b| !b.is_empty()) {
        Some(browser) => browser.split_whitespace().map(str::to_string).collect(),
        None if cfg!(target_os = "windows") => {
            vec!["cmd".into(), "/C".into(), "start".into(), "".into()]
        }
        None if cfg!(target_os = "macos") => vec!["open".into()],
        None => vec!["xdg-open".into()],
    };
    argv.push(url.to_string());
    argv
}
