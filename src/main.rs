use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use ytissues::youtrack::YouTrackClient;
use ytissues::{commands, config, logging};

/// Retrieve project names or issues from a YouTrack service.
///
/// Set YT_URL to the service url and YT_AUTH to a permanent token, or put
/// both into ~/.config/ytissues/config.toml.
#[derive(Debug, Parser)]
#[command(name = "ytissues", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Backup all issues of all projects with all attachments.
    Backup(BackupArgs),
    /// List projects, or the issues of one project.
    Ls(LsArgs),
}

#[derive(Debug, Args)]
struct BackupArgs {
    /// The root directory to store all tickets.
    #[arg(value_name = "YT_BACKUP_DIR")]
    backup_dir: PathBuf,

    /// Project ID to backup (eg '0-42'). If omitted, all projects are saved.
    #[arg(short = 'i', long, value_name = "PROJECT_ID")]
    project_id: Option<String>,
}

#[derive(Debug, Args)]
struct LsArgs {
    /// Print as a table instead of a list (or CSV for a single project).
    #[arg(short, long)]
    table: bool,

    /// List the given project with its issues.
    #[arg(short = 'i', long, value_name = "PROJECT_ID")]
    project_id: Option<String>,

    /// Display more information.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load()?;
    logging::init(cfg.logging.debug);

    let client = YouTrackClient::new(cfg.service()?)?;
    info!("using youtrack base url {}", client.config().base_url());

    let mut out = std::io::stdout().lock();
    match &cli.command {
        Command::Backup(args) => {
            let saved = commands::backup(&client, &args.backup_dir, args.project_id.as_deref())?;
            info!("backup finished with {} issues", saved);
        }
        Command::Ls(args) => match &args.project_id {
            Some(id) => {
                commands::list_project_details(&client, &mut out, id, args.table, args.verbose)?
            }
            None => commands::list_projects(&client, &mut out, args.table, args.verbose)?,
        },
    }
    Ok(())
}
