mod serve;
mod watch;

use anyhow::Result;
use console::style;

use crate::core::terminal::{self, GuideSection, print_error};

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Core")
        .command("serve", "Start the callboard API server")
        .command("watch <request-id>", "Follow one request's progress live")
        .print();

    GuideSection::new("Flags")
        .command("--api-host <host>", "Bind address for serve (default 127.0.0.1)")
        .command("--api-port <port>", "Bind port for serve (default 7180)")
        .command("--agent-url <url>", "Base URL of the agent backend")
        .command("--data-dir <path>", "Override the data directory")
        .command("--user <id>", "Caller id for watch")
        .info("Flags override values from <data dir>/config.toml")
        .print();

    println!(
        "\n {} {} <command> [flags]\n",
        style("Usage:").bold(),
        style("callboard").green()
    );
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => serve::run_serve(&args).await,
            "watch" => watch::run_watch(&args).await,
            "help" | "--help" | "-h" => {
                print_help();
                Ok(())
            }
            other => {
                print_error(&format!("Unknown command: {}", other));
                print_help();
                Ok(())
            }
        }
    } else {
        print_help();
        Ok(())
    }
}

pub(crate) fn flag_value(args: &[String], start: usize, names: &[&str]) -> Option<String> {
    let mut i = start;
    while i < args.len() {
        if names.contains(&args[i].as_str()) {
            return args.get(i + 1).cloned();
        }
        i += 1;
    }
    None
}

pub(crate) fn first_positional(args: &[String], start: usize) -> Option<String> {
    let mut i = start;
    while i < args.len() {
        if args[i].starts_with('-') {
            // Flags take one value each.
            i += 2;
        } else {
            return Some(args[i].clone());
        }
    }
    None
}
