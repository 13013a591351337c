use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use console::style;

use super::{first_positional, flag_value};
use crate::core::config::{self, Config};
use crate::core::status::Intent;
use crate::core::store::{SqliteStore, StoreClient};
use crate::core::sync::{RequestWatcher, ViewState};
use crate::core::terminal::{PHONE, print_error, print_info, print_success, print_warn};

/// Live view of one request: spawns a polling watcher and renders status and
/// timeline changes until the request reaches a terminal state or the viewer
/// hits Ctrl-C.
pub async fn run_watch(args: &[String]) -> Result<()> {
    let Some(request_id) = first_positional(args, 2) else {
        bail!("usage: callboard watch <request-id> --user <id>");
    };
    let Some(user) = flag_value(args, 2, &["--user", "-u"]) else {
        bail!("watch needs --user <id> to scope the lookup");
    };

    let data_dir = flag_value(args, 2, &["--data-dir"])
        .map(PathBuf::from)
        .unwrap_or_else(config::data_dir);
    let config = Config::load(&data_dir)?;
    crate::logging::init();

    let store: Arc<dyn StoreClient> = Arc::new(SqliteStore::open(&data_dir).await?);
    let watcher = RequestWatcher::spawn(store, request_id.clone(), user, config.poll_interval());

    println!(
        "{} Watching request {} (Ctrl-C to stop)\n",
        PHONE,
        style(&request_id).bold()
    );

    let mut last_status: Option<String> = None;
    let mut seen_events = 0usize;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                print_info("Stopped watching.");
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(500)) => {}
        }

        match watcher.state().await {
            ViewState::Loading => {}
            ViewState::NotFound => {
                print_error("Request not found");
                break;
            }
            ViewState::Error(msg) => {
                print_error(&msg);
                break;
            }
            ViewState::Synced(snapshot) => {
                // Events arrive newest first; print the ones not shown yet in
                // chronological order.
                let total = snapshot.events.len();
                if total > seen_events {
                    for event in snapshot.events[..total - seen_events].iter().rev() {
                        println!(
                            "  {} {} {}",
                            style(&event.created_at).dim(),
                            style(&event.event_type).bold(),
                            event.message
                        );
                    }
                    seen_events = total;
                }

                let status_str = snapshot.request.status.as_str().to_string();
                if last_status.as_ref() != Some(&status_str) {
                    match snapshot.request.status.known() {
                        Some(status) => {
                            let p = status.presentation();
                            println!("{} {}", PHONE, styled_label(p.label, p.intent));
                            println!("   {}", style(p.narrative).dim());
                        }
                        None => print_warn(&format!(
                            "Request reports unknown status '{}'",
                            status_str
                        )),
                    }
                    last_status = Some(status_str);
                }

                if let Some(status) = snapshot.request.status.known()
                    && status.is_terminal()
                {
                    if let Some(summary) = &snapshot.request.summary {
                        print_success(&format!("Summary: {}", summary));
                    }
                    break;
                }
            }
        }
    }

    watcher.stop();
    Ok(())
}

fn styled_label(label: &str, intent: Intent) -> console::StyledObject<String> {
    let styled = style(label.to_string()).bold();
    match intent {
        Intent::Neutral => styled,
        Intent::Info => styled.blue(),
        Intent::Active => styled.magenta(),
        Intent::Warning => styled.yellow(),
        Intent::Success => styled.green(),
        Intent::Danger => styled.red(),
    }
}
