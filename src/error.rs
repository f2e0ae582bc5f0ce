use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// The only way a placement can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("too close to an existing marker (less than {min_spacing_m}m)")]
    TooClose { min_spacing_m: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("no marker with id {id}")]
    UnknownMarker { id: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {source}")]
    BadCoordinate {
        row: usize,
        #[source]
        source: GeoError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}
