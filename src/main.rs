use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use imu_sync::config::{Settings, SftpCredentials, TransferPaths, paths};
use imu_sync::error::ImuError;
use imu_sync::mover::{self, MoveJob};
use imu_sync::{logging, sftp, transform};

/// Move the HR export over SFTP and reshape it for the import
#[derive(Parser)]
#[command(name = "imu-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the settings file (defaults to $IMU_SYNC_CONFIG when set)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Also write a daily log file into this directory
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the person export into the staging directory
    Download {
        /// Remote file name
        #[arg(long)]
        remote: Option<String>,

        /// Local destination
        #[arg(long)]
        local: Option<PathBuf>,
    },
    /// Download the reference people file used for username backfill
    DownloadReference,
    /// Upload the staged person file
    Upload {
        /// Local file to send
        #[arg(long)]
        local: Option<PathBuf>,

        /// Remote file name
        #[arg(long)]
        remote: Option<String>,

        /// Also upload a copy with a timestamp in its name
        #[arg(long)]
        timestamped_copy: bool,
    },
    /// Move the expenses export into the import directory
    MoveExpenses {
        #[arg(long)]
        source: Option<PathBuf>,

        #[arg(long)]
        destination: Option<PathBuf>,
    },
    /// Reshape the staged person file in place
    Transform {
        /// Staged person export
        #[arg(long)]
        input: Option<PathBuf>,

        /// Reference people file
        #[arg(long)]
        reference: Option<PathBuf>,
    },
    /// Download the reference and person files, then transform
    Sync,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.verbose, cli.log_dir.clone());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(target: logging::OUTCOME_TARGET, "{err}");
            eprintln!("imu-sync: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ImuError> {
    let config_path = paths::config_file(cli.config);
    let settings = Settings::load(config_path.as_deref())?;

    match cli.command {
        Commands::Download { remote, local } => {
            let credentials = SftpCredentials::from_env()?;
            let target = override_paths(&settings.person, remote, local);
            download(&credentials, &settings, &target).await
        }
        Commands::DownloadReference => {
            let credentials = SftpCredentials::from_env()?;
            download(&credentials, &settings, &settings.reference).await
        }
        Commands::Upload {
            local,
            remote,
            timestamped_copy,
        } => {
            let credentials = SftpCredentials::from_env()?;
            let source = override_paths(&settings.person, remote, local);
            let report = sftp::run_upload(
                &credentials,
                &settings.sftp,
                &source.local,
                &source.remote,
                timestamped_copy || settings.export.timestamped_copy,
            )
            .await?;
            for copy in &report.copies {
                tracing::info!("Timestamped copy: {}", copy);
            }
            Ok(())
        }
        Commands::MoveExpenses {
            source,
            destination,
        } => {
            let mut job = MoveJob::from_settings(&settings.expenses, Path::new("."));
            if let Some(source) = source {
                job.source = source;
            }
            if let Some(destination) = destination {
                job.destination = destination;
            }
            mover::move_file(&job)?;
            Ok(())
        }
        Commands::Transform { input, reference } => {
            let input = input.unwrap_or_else(|| settings.person.local.clone());
            let reference = reference.unwrap_or_else(|| settings.reference.local.clone());
            transform::transform_file(&input, &reference, &settings.transform)?;
            Ok(())
        }
        Commands::Sync => {
            let credentials = SftpCredentials::from_env()?;
            download(&credentials, &settings, &settings.reference).await?;
            download(&credentials, &settings, &settings.person).await?;
            transform::transform_file(
                &settings.person.local,
                &settings.reference.local,
                &settings.transform,
            )?;
            Ok(())
        }
    }
}

async fn download(
    credentials: &SftpCredentials,
    settings: &Settings,
    target: &TransferPaths,
) -> Result<(), ImuError> {
    sftp::run_download(credentials, &settings.sftp, &target.remote, &target.local).await?;
    Ok(())
}

fn override_paths(
    defaults: &TransferPaths,
    remote: Option<String>,
    local: Option<PathBuf>,
) -> TransferPaths {
    TransferPaths {
        remote: remote.unwrap_or_else(|| defaults.remote.clone()),
        local: local.unwrap_or_else(|| defaults.local.clone()),
    }
}
