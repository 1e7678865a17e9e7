use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use docsync_core::replay::{parse_script, run_replay, ReplayReport};
use docsync_core::{InMemoryStore, SyncConfig};
use docsync_metrics::{performance_gaps, Measure};
use docsync_schema::{Canonical, IdpKind, Kind, KanbanKind, ScorecardKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn cli() -> Command {
    Command::new("docsync")
        .version(docsync_core::VERSION)
        .about("Reconciliation engine for AI-generated documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a JSON-lines event script through a session")
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Event script, one JSON event per line"),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .value_parser(["kanban", "scorecard", "idp"])
                        .help("Document kind"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("document-id")
                        .long("document-id")
                        .help("Document id (random when omitted)"),
                ),
        )
        .subcommand(
            Command::new("metrics")
                .about("Print derived metrics for a stored document")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(["kanban", "scorecard", "idp"])
                        .help("Document kind"),
                )
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Document JSON file"),
                )
                .arg(
                    Arg::new("gaps")
                        .long("gaps")
                        .action(ArgAction::SetTrue)
                        .help("List scorecard KPIs below target instead"),
                ),
        )
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn kind_arg(args: &ArgMatches) -> Result<Kind> {
    let Some(name) = args.get_one::<String>("kind") else {
        bail!("missing document kind");
    };
    Ok(name.parse()?)
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing {name}"))
}

async fn replay(args: &ArgMatches) -> Result<()> {
    let kind = kind_arg(args)?;
    let script = path_arg(args, "script")?;
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SyncConfig::default(),
    };
    let document_id = args
        .get_one::<String>("document-id")
        .cloned()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let text = std::fs::read_to_string(script)
        .with_context(|| format!("reading {}", script.display()))?;
    let events = parse_script(&text)?;
    let store = Arc::new(InMemoryStore::new());

    let report: ReplayReport = match kind {
        Kind::Kanban => run_replay::<KanbanKind>(&document_id, store, config, &events).await?,
        Kind::Scorecard => {
            run_replay::<ScorecardKind>(&document_id, store, config, &events).await?
        }
        Kind::Idp => run_replay::<IdpKind>(&document_id, store, config, &events).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn metrics(args: &ArgMatches) -> Result<()> {
    let kind = kind_arg(args)?;
    let file = path_arg(args, "file")?;
    let text =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let canonical = Canonical::parse(kind, &text)
        .with_context(|| format!("parsing {} as {kind}", file.display()))?;

    let output = if args.get_flag("gaps") {
        let Canonical::Scorecard(card) = &canonical else {
            bail!("--gaps needs a scorecard, got {kind}");
        };
        serde_json::to_string_pretty(&performance_gaps(card))?
    } else {
        serde_json::to_string_pretty(&canonical.measure())?
    };
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let log_format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_tracing(log_format);

    match matches.subcommand() {
        Some(("replay", args)) => replay(args).await,
        Some(("metrics", args)) => metrics(args),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_replay_args() {
        let matches = cli()
            .try_get_matches_from([
                "docsync",
                "replay",
                "events.jsonl",
                "--kind",
                "kanban",
                "--log-format",
                "json",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "replay");
        assert_eq!(kind_arg(args).unwrap(), Kind::Kanban);
        assert_eq!(args.get_one::<String>("log-format").unwrap(), "json");
    }
}
