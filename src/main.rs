use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use geohunt::config::Config;
use geohunt::marker::{self, Marker, NewMarker};
use geohunt::{logger, Coordinate};

#[derive(Parser, Debug)]
#[command(name = "markers")]
#[command(about = "Check a location against the marker snapshot, or add, edit and remove markers.")]
#[command(long_about = None)]
struct Cli {
    /// Path to the marker snapshot CSV
    #[arg(short, long)]
    markers: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Check)]
    mode: Mode,

    /// Current latitude in degrees (check, place)
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Current longitude in degrees (check, place)
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Marker to edit or delete
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    question: Option<String>,

    #[arg(long)]
    answer: Option<String>,

    /// Pass an empty string to clear the hint when editing
    #[arg(long)]
    hint: Option<String>,

    #[arg(long)]
    points: Option<u32>,

    /// Where to write the changed snapshot. Defaults to overwriting --markers.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Optional TOML file overriding the proximity thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Print the live status for the location
    Check,
    /// Add a marker at the location if nothing is too close
    Place,
    /// Print every marker in the snapshot
    List,
    /// Change the text fields and points of a marker
    Edit,
    /// Remove a marker
    Delete,
}

impl Cli {
    fn location(&self) -> Result<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).context("invalid location"),
            _ => bail!("--lat and --lon are required for {:?}", self.mode),
        }
    }

    fn marker_id(&self) -> Result<&str> {
        match &self.id {
            Some(id) => Ok(id),
            None => bail!("--id is required for {:?}", self.mode),
        }
    }

    /// Form fields from the command line, falling back to `base` for anything not given.
    fn fields(&self, base: NewMarker) -> NewMarker {
        NewMarker {
            title: self.title.clone().unwrap_or(base.title),
            question: self.question.clone().unwrap_or(base.question),
            answer: self.answer.clone().unwrap_or(base.answer),
            hint: self.hint.clone().or(base.hint),
            points: self.points.unwrap_or(base.points),
        }
    }

    fn out_path(&self) -> &PathBuf {
        self.out.as_ref().unwrap_or(&self.markers)
    }
}

fn print_marker(m: &Marker) {
    println!(
        "{:<6} {:<24} [{}] {} pts  Q: {}  A: {}  Hint: {}",
        m.id,
        m.title,
        m.location,
        m.points,
        m.question,
        m.answer,
        m.hint.as_deref().unwrap_or("-")
    );
}

fn save(cli: &Cli, markers: &[Marker]) -> Result<()> {
    let out_path = cli.out_path();
    marker::write_markers(out_path, markers)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!("Wrote {} markers to {}", markers.len(), out_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;
    let policy = config.policy();

    let mut snapshot = marker::read_markers(&cli.markers)
        .with_context(|| format!("reading {}", cli.markers.display()))?;

    match cli.mode {
        Mode::Check => {
            let here = cli.location()?;
            println!("Your Location: {}", here);
            println!("Status: {}", policy.classify(&here, &snapshot));
        }
        Mode::Place => {
            let here = cli.location()?;
            let draft = cli.fields(NewMarker::default());
            if draft.title.trim().is_empty() {
                bail!("--title is required to place a marker");
            }
            let placed = match marker::place(&policy, draft, here, &snapshot) {
                Ok(m) => m,
                Err(e) => bail!("New marker rejected: {}", e),
            };
            let id = placed.id.clone();
            snapshot.push(placed);
            save(&cli, &snapshot)?;
            println!("Marker {} added successfully at {}", id, here);
        }
        Mode::List => {
            for m in &snapshot {
                print_marker(m);
            }
            println!("{} markers", snapshot.len());
        }
        Mode::Edit => {
            let id = cli.marker_id()?;
            let current = snapshot
                .iter()
                .find(|m| m.id == id)
                .map(NewMarker::from)
                .unwrap_or_default();
            let updated = marker::update_marker(&mut snapshot, id, cli.fields(current))?;
            print_marker(updated);
            save(&cli, &snapshot)?;
            println!("Marker {} updated successfully!", id);
        }
        Mode::Delete => {
            let id = cli.marker_id()?;
            marker::remove_marker(&mut snapshot, id)?;
            save(&cli, &snapshot)?;
            println!("Marker {} deleted successfully!", id);
        }
    }

    Ok(())
}
