//! Fair Dice
//!
//! Plays one game of nontransitive dice against the computer on the console.
//! Every random choice is a commit-reveal round the user takes part in.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fair_dice::{
    config::timeout_from_secs,
    console::{render_probability_table, render_summary, stdin_lines, ConsolePlayer, LineSource},
    error::ErrorClass,
    game::{parse_dice, require_playable, ProbabilityMatrix},
    protocol::CounterpartError,
    FaceSet, FairDiceConfig, FairPlayError, FairSelector, GameSession, HashAlgorithm, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "fair-dice", version, about = "Provably fair nontransitive dice")]
struct Args {
    /// Dice as comma-separated faces, e.g. 2,2,4,4,9,9 (at least three).
    #[arg(required = true, value_name = "DICE")]
    dice: Vec<String>,

    /// MAC digest: sha3-256 or sha256. Overrides FAIR_DICE_HASH.
    #[arg(long)]
    hash: Option<HashAlgorithm>,

    /// Seconds to wait for each answer; 0 waits forever. Overrides
    /// FAIR_DICE_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the probability table and exit.
    #[arg(long)]
    table: bool,

    /// Print each round's transcript as JSON after the game.
    #[arg(long)]
    audit_json: bool,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);
    info!("Fair Dice v{}", VERSION);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "Game aborted");
            eprintln!("error: {err:#}");
            exit_code(&err)
        }
    }
}

/// Configuration mistakes exit with 2, everything else with 1.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<FairPlayError>().map(FairPlayError::class) {
        Some(ErrorClass::Configuration) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn load_config(args: &Args) -> Result<FairDiceConfig> {
    let mut config = FairDiceConfig::from_env()?;
    if let Some(hash) = args.hash {
        config.hash_algorithm = hash;
    }
    if let Some(secs) = args.timeout_secs {
        config.counterpart_timeout = timeout_from_secs(secs);
    }
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let dice = parse_dice(&args.dice)?;
    require_playable(&dice, config.min_dice)?;

    if args.table {
        print!("{}", render_probability_table(&dice, &ProbabilityMatrix::compute(&dice)));
        return Ok(());
    }

    info!(
        dice = dice.len(),
        hash = %config.hash_algorithm,
        timeout = ?config.counterpart_timeout,
        "Starting game"
    );

    let selector = FairSelector::with_os_rng(config.selector_config());
    let mut session = GameSession::new(dice, selector, &config)?;
    let input = stdin_lines().context("failed to start the stdin reader")?;
    let mut player = ConsolePlayer::new(input, std::io::stdout());

    let report = session.play(&mut player).await?;
    player.say(&render_summary(&report))?;

    if args.audit_json {
        for transcript in &report.rounds {
            let json = transcript.to_json().context("failed to encode transcript")?;
            player.say(&json)?;
        }
    }

    offer_table(&mut player, session.dice()).await
}

/// Ask whether to print the help table. Unparseable answers are asked again;
/// closed input ends the game without the table.
async fn offer_table<L, W>(player: &mut ConsolePlayer<L, W>, dice: &[FaceSet]) -> Result<()>
where
    L: LineSource,
    W: std::io::Write,
{
    loop {
        match player.confirm("Show the probability table?").await {
            Ok(true) => {
                player.say(&render_probability_table(dice, &ProbabilityMatrix::compute(dice)))?;
                return Ok(());
            }
            Ok(false) => return Ok(()),
            Err(CounterpartError::Malformed { input }) => {
                player.say(&format!("Please answer y or n (got '{input}')."))?;
            }
            Err(CounterpartError::Closed) => {
                warn!("Input closed before the table prompt was answered");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "fair-dice",
            "--hash",
            "sha256",
            "--timeout-secs",
            "0",
            "--audit-json",
            "2,2,4,4,9,9",
            "1,1,6,6,8,8",
            "3,3,5,5,7,7",
        ]);
        assert_eq!(args.dice.len(), 3);
        assert_eq!(args.hash, Some(HashAlgorithm::Sha256));
        assert!(args.audit_json);
        assert!(!args.table);
        assert_eq!(args.log_level, "warn");

        let config = load_config(&args).unwrap();
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.counterpart_timeout, None);
    }

    #[test]
    fn test_timeout_override() {
        let args = Args::parse_from(["fair-dice", "--timeout-secs", "5", "1,2", "3,4", "5,6"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.counterpart_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_rejects_bad_hash_and_missing_dice() {
        assert!(Args::try_parse_from(["fair-dice", "--hash", "md5", "1,2"]).is_err());
        assert!(Args::try_parse_from(["fair-dice"]).is_err());
    }

    fn classic_dice() -> Vec<FaceSet> {
        parse_dice(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
    }

    async fn table_prompt(input: &'static str) -> (Result<()>, String) {
        let mut player = ConsolePlayer::from_reader(input.as_bytes(), Vec::new());
        let result = offer_table(&mut player, &classic_dice()).await;
        (result, String::from_utf8(player.into_output()).unwrap())
    }

    #[tokio::test]
    async fn test_table_prompt_reasks_on_garbage() {
        let (result, shown) = table_prompt("maybe\ny\n").await;
        assert!(result.is_ok());
        assert!(shown.contains("Please answer y or n (got 'maybe')."));
        assert!(shown.contains("User dice v"));
    }

    #[tokio::test]
    async fn test_table_prompt_declined_or_closed() {
        let (result, shown) = table_prompt("n\n").await;
        assert!(result.is_ok());
        assert!(!shown.contains("User dice v"));

        let (result, shown) = table_prompt("").await;
        assert!(result.is_ok());
        assert!(!shown.contains("User dice v"));
    }

    #[test]
    fn test_exit_code_classes() {
        let usage = anyhow::Error::from(FairPlayError::NotEnoughDice {
            required: 3,
            provided: 1,
        });
        assert_eq!(exit_code(&usage), ExitCode::from(2));

        let other = anyhow::anyhow!("stdin closed");
        assert_eq!(exit_code(&other), ExitCode::FAILURE);
    }
}
