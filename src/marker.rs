use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EditError, LoadError, PlacementError};
use crate::geo::Coordinate;
use crate::proximity::ProximityPolicy;

/// A geo-located puzzle placed by an organizer.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: String,
    pub location: Coordinate,
    pub title: String,
    pub question: String,
    pub answer: String,
    pub hint: Option<String>,
    pub points: u32,
}

/// Form fields for a marker that has not been committed yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewMarker {
    pub title: String,
    pub question: String,
    pub answer: String,
    pub hint: Option<String>,
    pub points: u32,
}

impl NewMarker {
    pub fn into_marker(self, id: String, location: Coordinate) -> Marker {
        Marker {
            id,
            location,
            title: self.title,
            question: self.question,
            answer: self.answer,
            hint: self.hint.filter(|h| !h.is_empty()),
            points: self.points,
        }
    }
}

impl From<&Marker> for NewMarker {
    fn from(m: &Marker) -> Self {
        NewMarker {
            title: m.title.clone(),
            question: m.question.clone(),
            answer: m.answer.clone(),
            hint: m.hint.clone(),
            points: m.points,
        }
    }
}

// One line of the snapshot file.
#[derive(Debug, Serialize, Deserialize)]
struct MarkerRow {
    id: String,
    title: String,
    question: String,
    answer: String,
    hint: String,
    points: u32,
    latitude: f64,
    longitude: f64,
}

impl From<&Marker> for MarkerRow {
    fn from(m: &Marker) -> Self {
        MarkerRow {
            id: m.id.clone(),
            title: m.title.clone(),
            question: m.question.clone(),
            answer: m.answer.clone(),
            hint: m.hint.clone().unwrap_or_default(),
            points: m.points,
            latitude: m.location.latitude(),
            longitude: m.location.longitude(),
        }
    }
}

/// Reads a marker snapshot, keeping file order.
pub fn read_markers<P: AsRef<Path>>(path: P) -> Result<Vec<Marker>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;

    let mut markers = Vec::new();
    for (i, result) in rdr.deserialize::<MarkerRow>().enumerate() {
        let row = result?;
        let location = Coordinate::new(row.latitude, row.longitude)
            .map_err(|source| LoadError::BadCoordinate { row: i + 1, source })?;
        markers.push(Marker {
            id: row.id,
            location,
            title: row.title,
            question: row.question,
            answer: row.answer,
            hint: Some(row.hint).filter(|h| !h.is_empty()),
            points: row.points,
        });
    }

    info!("Loaded {} markers from {}", markers.len(), path.as_ref().display());
    Ok(markers)
}

pub fn write_markers<P: AsRef<Path>>(path: P, markers: &[Marker]) -> Result<(), LoadError> {
    let mut wtr = Writer::from_path(path.as_ref())?;
    for m in markers {
        wtr.serialize(MarkerRow::from(m))?;
    }
    wtr.flush()?;
    Ok(())
}

/// `m{n}` with `n` one past the highest numeric `m`-suffix in the snapshot.
pub fn next_marker_id(markers: &[Marker]) -> String {
    let highest = markers
        .iter()
        .filter_map(|m| m.id.strip_prefix('m').and_then(|n| n.parse::<u64>().ok()))
        .max()
        .unwrap_or(0);
    format!("m{}", highest.max(markers.len() as u64) + 1)
}

/// Checks the candidate against the snapshot and, if accepted, returns the
/// marker ready to be committed.
pub fn place(
    policy: &ProximityPolicy,
    draft: NewMarker,
    location: Coordinate,
    snapshot: &[Marker],
) -> Result<Marker, PlacementError> {
    policy.validate_placement(&location, snapshot)?;
    Ok(draft.into_marker(next_marker_id(snapshot), location))
}

/// Replaces the editable fields of marker `id`. Id and location stay put.
pub fn update_marker<'a>(
    markers: &'a mut [Marker],
    id: &str,
    fields: NewMarker,
) -> Result<&'a Marker, EditError> {
    let marker = markers
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| EditError::UnknownMarker { id: id.to_string() })?;
    let location = marker.location;
    *marker = fields.into_marker(marker.id.clone(), location);
    debug!(marker = %marker.id, "updated");
    Ok(marker)
}

/// Removes marker `id`, keeping the order of the rest.
pub fn remove_marker(markers: &mut Vec<Marker>, id: &str) -> Result<Marker, EditError> {
    let idx = markers
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| EditError::UnknownMarker { id: id.to_string() })?;
    debug!(marker = %id, "removed");
    Ok(markers.remove(idx))
}
