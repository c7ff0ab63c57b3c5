use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wichtel_core::{
    build_assignments, invite_links, token_from_link, AssignmentsData, ErrorKind, Participant,
    RevealError, WichtelError,
};

pub mod logging;

pub const DEFAULT_INPUT: &str = "wichtel.json";
pub const DEFAULT_OUTPUT: &str = "assignments.json";
pub const USAGE_HINT: &str = "Usage: wichtel [path-to-wichtel.json] [path-to-assignments.json]";

#[derive(Debug, Parser)]
#[command(name = "wichtel", version)]
#[command(about = "Draw Secret Santa (Wichtel) pairs and mint personal reveal tokens")]
#[command(
    long_about = "Draw Secret Santa (Wichtel) pairs and mint personal reveal tokens.\n\n\
                  The giver → receiver lines are no longer printed by default; \
                  pass --show-pairs to see them."
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draw pairs and write the assignments file (the default)
    Generate(GenerateArgs),
    /// Show whom a token or reveal link belongs to
    Reveal(RevealArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Participant list (JSON array)
    #[arg(env = "WICHTEL_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where the assignments file is written
    #[arg(env = "WICHTEL_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed for a reproducible pairing; tokens stay random
    #[arg(long)]
    pub seed: Option<u64>,

    /// Site root of the reveal page; prints one link per giver
    #[arg(long, env = "WICHTEL_BASE_URL")]
    pub base_url: Option<String>,

    /// Print every giver → receiver pair (spoils the surprise)
    #[arg(long)]
    pub show_pairs: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RevealArgs {
    /// Token or full reveal link
    pub token: String,

    #[arg(long, env = "WICHTEL_ASSIGNMENTS", default_value = DEFAULT_OUTPUT)]
    pub assignments: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{} not found.", .0.display())]
    InputMissing(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize assignments: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to print progress: {0}")]
    Output(#[from] io::Error),
    #[error("{0}")]
    Core(#[from] WichtelError),
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::InputMissing(_)
            | GenerateError::Read { .. }
            | GenerateError::Write { .. }
            | GenerateError::Output(_) => ErrorKind::Io,
            GenerateError::Parse { .. } => ErrorKind::InvalidInput,
            GenerateError::Serialize(_) => ErrorKind::Internal,
            GenerateError::Core(err) => err.kind(),
        }
    }
}

pub fn run(cli: Cli, out: &mut dyn Write) -> ExitCode {
    match cli.command.unwrap_or(Command::Generate(cli.generate)) {
        Command::Generate(args) => match generate(&args, out) {
            Ok(_) => ExitCode::SUCCESS,
            Err(err @ GenerateError::InputMissing(_)) => {
                tracing::debug!("{err}");
                let _ = writeln!(out, "Error: {err}");
                let _ = writeln!(out, "{USAGE_HINT}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::debug!(kind = ?err.kind(), "generation failed: {err}");
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        },
        Command::Reveal(args) => match reveal_receiver(&args.assignments, &args.token) {
            Ok(receiver) => {
                let _ = writeln!(out, "You are the Wichtel for: {receiver}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Reads the participants, draws the pairs and writes the assignments file.
///
/// Progress goes to `out`. The output file is only touched once every
/// assignment has been built.
pub fn generate(args: &GenerateArgs, out: &mut dyn Write) -> Result<AssignmentsData, GenerateError> {
    writeln!(out, "Reading {}...", args.input.display())?;
    let participants = load_participants(&args.input)?;

    writeln!(out, "Found {} participants:", participants.len())?;
    for p in &participants {
        writeln!(out, "  - {} ({})", p.name, p.id)?;
    }

    writeln!(out)?;
    writeln!(out, "Generating Secret Santa derangement...")?;
    let mut rng = args
        .seed
        .map(ChaCha8Rng::seed_from_u64)
        .unwrap_or_else(ChaCha8Rng::from_entropy);
    let data = build_assignments(&participants, &mut rng)?;

    if args.show_pairs {
        for a in &data.assignments {
            writeln!(out, "  {} → {}", a.giver_name, a.receiver_name)?;
        }
    }

    write_assignments(&args.output, &data)?;

    // The file is published at this point; a closed stdout must not turn the
    // run into a failure.
    if let Err(err) = report_written(args, &participants, &data, out) {
        tracing::warn!("progress output failed after writing assignments: {err}");
    }
    Ok(data)
}

fn report_written(
    args: &GenerateArgs,
    participants: &[Participant],
    data: &AssignmentsData,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "✓ Assignments written to {}", args.output.display())?;

    if let Some(base_url) = &args.base_url {
        writeln!(out)?;
        writeln!(out, "Invite links:")?;
        for link in invite_links(participants, data, base_url) {
            let contact = link.contact.as_deref().unwrap_or("no contact");
            writeln!(
                out,
                "  {} <{}> via {}: {}",
                link.giver_name, contact, link.contact_type, link.url
            )?;
        }
    }

    writeln!(out, "✓ Generation complete!")
}

pub fn load_participants(path: &Path) -> Result<Vec<Participant>, GenerateError> {
    let text = read_text(path)?;
    let participants = serde_json::from_str(&text).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(participants)
}

pub fn load_assignments(path: &Path) -> Result<AssignmentsData, GenerateError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes pretty JSON to a sibling temp file and renames it into place, so
/// readers never see a half-written artifact.
pub fn write_assignments(path: &Path, data: &AssignmentsData) -> Result<(), GenerateError> {
    let mut json = serde_json::to_vec_pretty(data).map_err(GenerateError::Serialize)?;
    json.push(b'\n');

    let tmp_path = tmp_path_for(path);
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(GenerateError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(path = %path.display(), count = data.len(), "assignments written");
    Ok(())
}

/// Resolves a token (or link) against the assignments file the way the
/// reveal page does.
pub fn reveal_receiver(assignments: &Path, token_or_link: &str) -> Result<String, RevealError> {
    let data = load_assignments(assignments).map_err(|err| {
        tracing::debug!("assignments unavailable: {err}");
        RevealError::Unavailable
    })?;
    let receiver = data.reveal(token_from_link(token_or_link))?;
    Ok(receiver.to_owned())
}

fn read_text(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            GenerateError::InputMissing(path.to_path_buf())
        } else {
            GenerateError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
