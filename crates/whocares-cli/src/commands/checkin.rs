use std::io::{self, BufRead, Write};

use chrono::{Local, Utc};
use clap::Subcommand;
use whocares_core::health::{FileHealthSource, HealthConfig, UnavailableSource};
use whocares_core::error::Result;
use whocares_core::{
    Availability, CheckInResult, CheckInSession, Config, Environment, HealthBonus, HealthService, Phase,
    QuestionCatalog, ScoringEngine, ValidationError,
};

use super::{group_thousands, local_time, CmdResult};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// List the questions in order
    Questions,
    /// Answer every question in one go
    Run {
        /// Comma-separated answers, one per question (e.g. 9,9,9,1)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        answers: Vec<i64>,
        /// Seed for message selection
        #[arg(long)]
        seed: Option<u64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Local time to check the window against (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,
        /// Deployment environment (development, staging, production)
        #[arg(long)]
        env: Option<String>,
    },
    /// Interactive session over stdin
    Play {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        env: Option<String>,
    },
}

pub fn run(action: CheckinAction) -> CmdResult {
    match action {
        CheckinAction::Questions => {
            for (i, q) in QuestionCatalog::standard().iter().enumerate() {
                println!("{}. {} {} ({}) {}", i + 1, q.glyph, q.label, q.sign(), q.description);
            }
        }
        CheckinAction::Run {
            answers,
            seed,
            json,
            at,
            env,
        } => {
            let config = Config::load_or_default();
            ensure_open(&config, at.as_deref(), env.as_deref())?;
            let result = run_scripted(&answers, engine(&config, seed), health_bonus(&config.health))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_receipt(&result));
            }
        }
        CheckinAction::Play { seed, at, env } => {
            let config = Config::load_or_default();
            ensure_open(&config, at.as_deref(), env.as_deref())?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            play(
                stdin.lock(),
                &mut stdout,
                engine(&config, seed),
                health_bonus(&config.health),
            )?;
        }
    }
    Ok(())
}

/// Refuse to start while the window is closed. Checked once; an open
/// session is never revoked.
fn ensure_open(config: &Config, at: Option<&str>, env: Option<&str>) -> CmdResult {
    let env = env.map(str::parse::<Environment>).transpose()?;
    let now = local_time(at)?;
    let (_, avail) = config.availability_at(env, &now)?;
    if !avail.can_start() {
        return Err(avail.headline().into());
    }
    if !matches!(avail, Availability::Open { .. }) {
        eprintln!("{}", avail.headline());
    }
    Ok(())
}

fn engine(config: &Config, seed: Option<u64>) -> ScoringEngine {
    match seed {
        Some(seed) => ScoringEngine::seeded(config.rewards.clone(), seed),
        None => ScoringEngine::new(config.rewards.clone()),
    }
}

fn health_bonus(config: &HealthConfig) -> HealthBonus {
    let now = Utc::now();
    match &config.samples_path {
        Some(path) => HealthService::new(FileHealthSource::new(path), config.clone()).bonus(now),
        None => HealthService::new(UnavailableSource, config.clone()).bonus(now),
    }
}

fn run_scripted(answers: &[i64], mut engine: ScoringEngine, health: HealthBonus) -> Result<CheckInResult> {
    let mut session = CheckInSession::start(QuestionCatalog::standard());
    let expected = session.catalog().len();
    if answers.len() != expected {
        return Err(ValidationError::InvalidValue {
            field: "answers".to_string(),
            message: format!("expected {expected} answers, got {}", answers.len()),
        }
        .into());
    }

    for &value in answers {
        session.select_value(value)?;
        session.confirm()?;
    }

    let result = engine.finalize(&session, health)?;
    tracing::debug!(event = ?result.finalized_event(), "scripted check-in done");
    session.close();
    Ok(result)
}

enum Outcome {
    Continue,
    Finalized(Box<CheckInResult>),
    Close,
}

/// Line-driven session. Ends on `finalize`, `close` or end of input.
fn play<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    mut engine: ScoringEngine,
    health: HealthBonus,
) -> CmdResult<Option<CheckInResult>> {
    let mut session = CheckInSession::start(QuestionCatalog::standard());
    writeln!(out, "commands: 1-9, confirm, back, edit, finalize, close, status")?;
    write_prompt(out, &session)?;

    let mut finalized = None;
    for line in input.lines() {
        let line = line?;
        if let Some(event) = session.tick() {
            tracing::debug!(kind = event.kind(), "pending default applied");
        }

        match apply(&mut session, &mut engine, health, line.trim(), out) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Finalized(result)) => {
                write!(out, "{}", render_receipt(&result))?;
                finalized = Some(*result);
                break;
            }
            Ok(Outcome::Close) => break,
            Err(e) => writeln!(out, "! {e}")?,
        }
        write_prompt(out, &session)?;
    }

    session.close();
    if finalized.is_none() {
        writeln!(out, "check-in closed without finishing")?;
    }
    Ok(finalized)
}

fn apply<W: Write>(
    session: &mut CheckInSession,
    engine: &mut ScoringEngine,
    health: HealthBonus,
    command: &str,
    out: &mut W,
) -> CmdResult<Outcome> {
    match command {
        "" => {}
        "c" | "confirm" => {
            session.confirm()?;
        }
        "b" | "back" => {
            session.back()?;
        }
        "e" | "edit" => {
            session.edit()?;
        }
        "f" | "finalize" => {
            let result = engine.finalize(session, health)?;
            return Ok(Outcome::Finalized(Box::new(result)));
        }
        "q" | "close" => return Ok(Outcome::Close),
        "s" | "status" => {
            writeln!(out, "{}", serde_json::to_string_pretty(&session.snapshot())?)?;
        }
        other => {
            let value: i64 = other
                .parse()
                .map_err(|_| format!("unknown command: {other}"))?;
            session.select_value(value)?;
        }
    }
    Ok(Outcome::Continue)
}

fn write_prompt<W: Write>(out: &mut W, session: &CheckInSession) -> io::Result<()> {
    match session.phase() {
        Phase::Questioning => {
            let step = session.step_index();
            let value = session.answers().get(step).unwrap_or_default();
            if let Some(q) = session.current_question() {
                writeln!(
                    out,
                    "[{}/{}] {} {}: {} ({value})",
                    step + 1,
                    session.catalog().len(),
                    q.glyph,
                    q.label,
                    q.description
                )?;
            }
        }
        Phase::Summary => {
            writeln!(out, "summary:")?;
            for (q, value) in session.catalog().iter().zip(session.answers().values()) {
                writeln!(out, "  {} {:<14} {value}", q.glyph, q.label)?;
            }
            writeln!(out, "finalize, or edit to change the last answer")?;
        }
    }
    out.flush()
}

fn render_receipt(result: &CheckInResult) -> String {
    let mut s = String::new();
    s.push_str(&format!("\n{:>4}  {} {}\n\n", result.score, result.glyph, result.message));
    s.push_str("THANK YOU!\n");
    s.push_str(&format!(
        "{}\n\n",
        result.completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));

    s.push_str("SCORE BREAKDOWN\n");
    for line in &result.breakdown {
        let sign = if line.weight < 0 { '-' } else { '+' };
        s.push_str(&format!("  {} {:<16} {sign}{}\n", line.glyph, line.label, line.value));
    }
    s.push_str(&format!("  {:<18} {}\n\n", "TOTAL", result.score));

    s.push_str("$WHOCARES REWARDS\n");
    s.push_str(&format!("  {:<18} {:>10}\n", "Base Reward", group_thousands(result.base_reward)));
    s.push_str(&format!(
        "  {:<18} {:>10}\n",
        "Score Bonus",
        format!("+{}", group_thousands(result.bonus_reward))
    ));
    if result.health_bonus > 0 {
        s.push_str(&format!(
            "  {:<18} {:>10}\n",
            "Health Bonus",
            format!("+{}", group_thousands(result.health_bonus))
        ));
    }
    s.push_str(&format!("  {:<18} {:>10}\n", "TOTAL", group_thousands(result.total_reward)));
    s
}
