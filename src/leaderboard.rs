use csv::ReaderBuilder;
use fnv::FnvHashSet;
use ordered_float::OrderedFloat;
use serde::Deserialize;
use std::cmp::Reverse;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{info, warn};

use crate::error::LoadError;

pub const TEAMS_PER_PAGE: NonZeroUsize = NonZeroUsize::new(15).unwrap();

#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub points: f64,
}

impl Team {
    /// Lowercased name with spaces turned into underscores.
    pub fn handle(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    pub fn is_member(&self, handle: &str) -> bool {
        let handle = handle.to_lowercase();
        self.members.iter().any(|m| m.to_lowercase() == handle)
    }
}

/// A team together with its 1-based position over the whole board.
#[derive(Debug, PartialEq)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub team: &'a Team,
}

#[derive(Debug)]
pub struct Leaderboard {
    teams: Vec<Team>,
    page_size: NonZeroUsize,
}

impl Leaderboard {
    /// Sorts by points, highest first. Ties keep their input order.
    pub fn new(mut teams: Vec<Team>, page_size: NonZeroUsize) -> Self {
        teams.sort_by_key(|t| Reverse(OrderedFloat(t.points)));
        Self { teams, page_size }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The top three, or nothing when fewer than three teams compete.
    pub fn podium(&self) -> &[Team] {
        if self.teams.len() >= 3 {
            &self.teams[..3]
        } else {
            &[]
        }
    }

    pub fn total_pages(&self) -> usize {
        self.teams.len().div_ceil(self.page_size.get())
    }

    /// Teams on the 1-based page `page`; empty when out of range.
    pub fn page(&self, page: usize) -> Vec<Ranked<'_>> {
        let first = match page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.page_size.get()))
        {
            Some(first) => first,
            None => return Vec::new(),
        };
        self.teams
            .iter()
            .enumerate()
            .skip(first)
            .take(self.page_size.get())
            .map(|(i, team)| Ranked { rank: i + 1, team })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    id: String,
    name: String,
    points: f64,
    #[serde(default)]
    members: String,
}

/// Reads `id,name,points,members` rows; `members` is `;`-separated.
/// A repeated team id keeps its first row.
pub fn read_teams<P: AsRef<Path>>(path: P) -> Result<Vec<Team>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let mut seen: FnvHashSet<String> = FnvHashSet::default();
    let mut teams = Vec::new();
    for result in rdr.deserialize::<TeamRow>() {
        let row = result?;
        if !seen.insert(row.id.clone()) {
            warn!("Skipping duplicate team id {}", row.id);
            continue;
        }
        let members = row
            .members
            .split(';')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();
        teams.push(Team {
            id: row.id,
            name: row.name,
            members,
            points: row.points,
        });
    }

    info!("Loaded {} teams from {}", teams.len(), path.as_ref().display());
    Ok(teams)
}
