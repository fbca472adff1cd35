use clap::Subcommand;
use serde_json::json;
use whocares_core::window::{availability, evaluate, next_open_in_days};
use whocares_core::Config;

use super::{local_time, resolve_window, CmdResult};

#[derive(Subcommand)]
pub enum WindowAction {
    /// Print whether check-in is open right now
    Status {
        /// Local time to evaluate instead of now (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,
        /// Deployment environment (development, staging, production)
        #[arg(long)]
        env: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print days until the window opens again
    Next {
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        env: Option<String>,
    },
}

pub fn run(action: WindowAction) -> CmdResult {
    let config = Config::load_or_default();

    match action {
        WindowAction::Status { at, env, json } => {
            let (environment, window) = resolve_window(&config, env.as_deref())?;
            let now = local_time(at.as_deref())?;
            let status = evaluate(&now, &window);
            let avail = availability(&now, &window)?;

            if json {
                let out = json!({
                    "environment": environment,
                    "at": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "is_open": status.is_open,
                    "hours_remaining": status.hours_remaining,
                    "availability": avail,
                    "headline": avail.headline(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", avail.headline());
            }
        }
        WindowAction::Next { at, env } => {
            let (_, window) = resolve_window(&config, env.as_deref())?;
            let now = local_time(at.as_deref())?;
            println!("{}", next_open_in_days(&now, &window)?);
        }
    }

    Ok(())
}
