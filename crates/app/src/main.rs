use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use readers::load_bank;
use services::{
    QuestionCount, QuizMode, QuizSession, Review, SessionBuilder, SessionError, SessionOptions,
    VersionCheck,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingFile,
    InvalidCount { raw: String },
    InvalidTimer { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingFile => write!(f, "a question document is required"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- <file> [--count <n|all>] [--repeats] [--test]");
    eprintln!("                             [--timer <minutes>] [--seed <n>]");
    eprintln!();
    eprintln!("Accepted documents: .pptx, .txt, .md/.markdown, .docx");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --count all, no repeats, practice mode, no timer");
}

struct Args {
    file: PathBuf,
    options: SessionOptions,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut file: Option<PathBuf> = None;
        let mut options = SessionOptions::default();
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--count" => {
                    let value = require_value(args, "--count")?;
                    options.count = parse_count(&value)?;
                }
                "--repeats" => options.allow_repeats = true,
                "--test" => options.mode = QuizMode::Test,
                "--timer" => {
                    let value = require_value(args, "--timer")?;
                    options.timer_minutes = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimer { raw: value.clone() })?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if file.is_none() => file = Some(PathBuf::from(arg)),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            file: file.ok_or(ArgsError::MissingFile)?,
            options,
            seed,
        })
    }
}

fn parse_count(raw: &str) -> Result<QuestionCount, ArgsError> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(QuestionCount::All);
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(QuestionCount::Exactly(n)),
        _ => Err(ArgsError::InvalidCount {
            raw: raw.to_string(),
        }),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Strictly fire-and-forget; the quiz never waits on this.
    tokio::spawn(async {
        match VersionCheck::new().latest().await {
            Some(tag) => debug!(tag, "latest release"),
            None => debug!("version check unavailable"),
        }
    });

    let load = load_bank(&args.file)?;
    info!(
        source = load.bank.source(),
        questions = load.bank.len(),
        skipped = load.diagnostics.len(),
        "bank loaded"
    );
    for diagnostic in &load.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let builder = SessionBuilder::new(&load.bank, args.options);
    let session = match args.seed {
        Some(seed) => builder.build_with_rng(&mut StdRng::seed_from_u64(seed))?,
        None => builder.build()?,
    };

    let review = run_session(session)?;
    print!("{}", review.to_text());

    let export_path = args.file.with_extension("review.txt");
    std::fs::write(&export_path, review.to_text())?;
    info!(path = %export_path.display(), "review exported");
    Ok(())
}

const COMMANDS: &str = "\
commands:
  a <text>   select/toggle the answer with that option text
  1..9       select/toggle the Nth displayed option
  n / p      next / previous question
  g <num>    go to question <num>
  f          flag/unflag the current question
  c          check the current answer (practice mode)
  b          take the one-time 15-minute break
  s          show the current question again
  q          finish the quiz
";

/// Line-oriented command loop. The timer is driven from wall time elapsed
/// between commands, one `tick()` per whole second.
fn run_session(mut session: QuizSession) -> Result<Review, Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut last_tick = Instant::now();
    let mut carry = 0.0f64;

    println!("{} questions, {:?} mode.", session.len(), session.mode());
    print!("{COMMANDS}");
    show_question(&session);

    while !session.is_finished() {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            // stdin closed: submit what we have
            session.finish()?;
            break;
        };

        // catch the countdown up before acting
        let elapsed = last_tick.elapsed().as_secs_f64() + carry;
        last_tick = Instant::now();
        carry = elapsed.fract();
        for _ in 0..elapsed as u64 {
            if session.tick() {
                println!("Time is up.");
                break;
            }
        }
        if session.is_finished() {
            break;
        }

        if let Err(err) = handle_command(&mut session, line.trim()) {
            println!("{err}");
        }
    }

    Ok(Review::from_session(&session)?)
}

fn handle_command(session: &mut QuizSession, line: &str) -> Result<(), SessionError> {
    let (command, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "a" => {
            session.select_answer(session.current_index(), rest)?;
            show_question(session);
        }
        "n" => {
            session.navigate(1)?;
            show_question(session);
        }
        "p" => {
            session.navigate(-1)?;
            show_question(session);
        }
        "g" => {
            let index: usize = rest.parse().map_err(|_| SessionError::IndexOutOfRange {
                index: usize::MAX,
                len: session.len(),
            })?;
            session.jump_to(index.saturating_sub(1))?;
            show_question(session);
        }
        "f" => {
            session.toggle_flag(session.current_index())?;
            show_question(session);
        }
        "c" => {
            let verdict = session.check_answer(session.current_index())?;
            println!("{}", if verdict { "correct" } else { "not quite" });
        }
        "b" => {
            session.take_break()?;
            println!("Break started: the countdown is paused for 15 minutes.");
        }
        "s" => show_question(session),
        "q" => {
            let unanswered = session.unanswered_count();
            if unanswered > 0 {
                warn!(unanswered, "finishing with unanswered questions");
                println!("{unanswered} unanswered question(s) will score as wrong.");
            }
            session.finish()?;
        }
        digit if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) => {
            let position: usize = digit.parse().unwrap_or(0);
            let current = session.current_question();
            let Some(option) = current.display_options().get(position.saturating_sub(1)) else {
                println!("no option {digit} on this question");
                return Ok(());
            };
            let option = option.clone();
            session.select_answer(session.current_index(), &option)?;
            show_question(session);
        }
        other => println!("unknown command: {other}"),
    }
    Ok(())
}

fn show_question(session: &QuizSession) {
    let sq = session.current_question();
    let flag = if sq.flagged() { " [flagged]" } else { "" };
    println!();
    println!(
        "Question {}/{}{flag}: {}",
        session.current_index() + 1,
        session.len(),
        sq.question().prompt()
    );
    for (i, option) in sq.display_options().iter().enumerate() {
        let mark = if sq.selected().contains(option) { "*" } else { " " };
        println!("  {mark}{}) {option}", i + 1);
    }
    if let Some(timer) = session.timer() {
        if timer.on_break() {
            println!("  (on break, {}s left)", timer.break_remaining());
        } else {
            println!(
                "  ({}:{:02} remaining)",
                timer.remaining_seconds() / 60,
                timer.remaining_seconds() % 60
            );
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
