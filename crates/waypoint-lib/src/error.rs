use thiserror::Error;

/// Convenient result alias for the Waypoint library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a location identifier does not exist in the map.
    #[error("no location with id {id}")]
    UnknownId { id: String },

    /// Raised when a location name could not be found in the map.
    #[error("unknown location name: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a bounding box has min/max coordinates out of order.
    #[error(
        "malformed bounding box: longitude {min_lon}..{max_lon}, latitude {min_lat}..{max_lat}"
    )]
    InvalidRegion {
        min_lon: f64,
        max_lon: f64,
        max_lat: f64,
        min_lat: f64,
    },

    /// Raised when a name pattern does not compile as a regular expression.
    #[error("invalid location pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Raised when no route exists between two locations.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when a dependency cycle keeps the scheduler from placing every
    /// location.
    #[error("could not schedule every location, blocked on: {}", .missing.join(", "))]
    IncompleteSchedule { missing: Vec<String> },

    /// Raised when a search exceeds its configured deadline or step ceiling.
    #[error("search aborted after exhausting its budget")]
    SearchAborted,

    /// Raised when the source data contains the same location id twice.
    #[error("duplicate location id in source data: {id}")]
    DuplicateId { id: String },

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
