pub mod checkin;
pub mod config;
pub mod window;

use chrono::{Local, NaiveDateTime};
use whocares_core::{Config, Environment, WindowConfig};

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Local wall-clock time from `--at`, or now.
pub(crate) fn local_time(at: Option<&str>) -> CmdResult<NaiveDateTime> {
    match at {
        None => Ok(Local::now().naive_local()),
        Some(s) => parse_local_time(s),
    }
}

pub(crate) fn parse_local_time(s: &str) -> CmdResult<NaiveDateTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| format!("cannot parse '{s}' as a local time (expected YYYY-MM-DDTHH:MM)").into())
}

/// Environment and window for this invocation, `--env` taking precedence.
pub(crate) fn resolve_window(config: &Config, env: Option<&str>) -> CmdResult<(Environment, WindowConfig)> {
    let environment = match env {
        Some(tag) => tag.parse::<Environment>()?,
        None => config.resolve_environment()?,
    };
    let window = config.window_config(environment)?;
    tracing::debug!(%environment, ?window, "resolved check-in window");
    Ok((environment, window))
}

/// `12345` -> `12,345`.
pub(crate) fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}
