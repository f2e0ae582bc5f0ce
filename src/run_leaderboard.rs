use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use geohunt::config::Config;
use geohunt::leaderboard::{self, Leaderboard};
use geohunt::logger;

#[derive(Parser, Debug)]
#[command(name = "leaderboard")]
#[command(about = "Rank teams by points from a CSV with id,name,points,members per row.")]
#[command(long_about = None)]
struct Cli {
    /// Path to the teams CSV
    #[arg(short, long)]
    teams: PathBuf,

    /// 1-based page to print
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Member handle whose team gets highlighted
    #[arg(long)]
    me: Option<String>,

    /// Optional TOML file overriding the page size
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;
    let teams = leaderboard::read_teams(&cli.teams)
        .with_context(|| format!("reading {}", cli.teams.display()))?;
    let board = Leaderboard::new(teams, config.leaderboard.page_size);

    let podium = board.podium();
    if !podium.is_empty() {
        println!("Podium:");
        for (i, team) in podium.iter().enumerate() {
            println!("  [{}] {} ({:.2})", i + 1, team.handle(), team.points);
        }
        println!();
    }

    let rows = board.page(cli.page);
    if rows.is_empty() {
        println!("No teams on page {} of {}", cli.page, board.total_pages());
        return Ok(());
    }
    for row in &rows {
        let you = match &cli.me {
            Some(me) if row.team.is_member(me) => "  <- you",
            _ => "",
        };
        println!(
            "{:>4}  {:<30} {:>10.2}  {} members{}",
            row.rank,
            row.team.name,
            row.team.points,
            row.team.members.len(),
            you
        );
    }
    println!("Page {} of {} ({} teams)", cli.page, board.total_pages(), board.len());

    Ok(())
}
