use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use env_logger::Env;
use log::debug;

use chrn::cli::{self, Args, ChangelogOptions, Command, Outcome, RotateOptions, Settings};
use chrn::config::load_config;
use chrn::forge::{load_token, OctocrabForge};
use chrn::git::Git2WorkingCopy;
use chrn::ui;
use chrn::ChrnError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            let code = e
                .downcast_ref::<ChrnError>()
                .map(ChrnError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(args: Args) -> Result<Outcome> {
    let config = load_config(args.config.as_deref())?;

    let outcome = match &args.command {
        Command::Changelog(changelog) => {
            let settings = Settings::resolve(&changelog.common, &config)?;
            let forge = connect(&settings)?;
            cli::changelog::run(&settings, &ChangelogOptions::from(changelog), &forge, Utc::now())
                .await?
        }
        Command::Note(note) => {
            let settings = Settings::resolve(&note.common, &config)?;
            let forge = connect(&settings)?;
            let mut confirm = ui::stdin_confirm();
            cli::note::run(&settings, &forge, &mut confirm).await?
        }
        Command::Rotate(rotate) => {
            let settings = Settings::resolve(&rotate.common, &config)?;
            let options = RotateOptions::resolve(rotate, &config);
            cli::rotate::ensure_ssh_key(&settings.ssh_key)?;

            let repo = open_working_copy(&settings)?;
            let forge = connect(&settings)?;
            let mut confirm = ui::stdin_confirm();
            let today = Local::now().date_naive();
            cli::rotate::run(&settings, &options, &forge, &repo, &mut confirm, today).await?
        }
    };

    Ok(outcome)
}

fn connect(settings: &Settings) -> Result<OctocrabForge> {
    let token = load_token(&settings.token_file);
    if token.is_none() {
        debug!(
            "no token in {}, using anonymous access",
            settings.token_file.display()
        );
    }
    Ok(OctocrabForge::new(settings.org.clone(), token)?)
}

fn open_working_copy(settings: &Settings) -> Result<Git2WorkingCopy> {
    let dir = settings
        .file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Git2WorkingCopy::open(dir, settings.ssh_key.clone())
        .with_context(|| format!("cannot open the repository holding {}", settings.file.display()))
}
