pub mod config;
pub mod error;
pub mod geo;
pub mod leaderboard;
pub mod logger;
pub mod marker;
pub mod proximity;

pub use error::{ConfigError, EditError, GeoError, LoadError, PlacementError};
pub use geo::{distance, haversine_meters, Coordinate};
pub use leaderboard::{Leaderboard, Team};
pub use marker::{Marker, NewMarker};
pub use proximity::{ProximityPolicy, Status};
