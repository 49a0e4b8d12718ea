//! Error types shared by the feed boundary and the catalog builder.

/// Failure to obtain a feed payload from upstream
///
/// Fatal to the current query. Nothing below the caller retries it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network-level failure (connect, TLS, timeout, truncated body)
    Transport(String),
    /// Upstream answered with a non-success HTTP status
    Status { status: u16, body: String },
    /// The body could not be decoded into a feed tree
    Decode(String),
    /// A local feed file could not be read
    Io(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Feed transport error: {}", msg),
            FetchError::Status { status, body } => {
                write!(f, "Feed returned HTTP {}: {}", status, body)
            }
            FetchError::Decode(msg) => write!(f, "Feed payload could not be decoded: {}", msg),
            FetchError::Io(msg) => write!(f, "Feed file could not be read: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// A feed entry that cannot become a `FlightRecord`.
///
/// Recovered by the catalog builder, which drops the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedFlight {
    /// The entry carries no leg objects at all
    NoLegs { flight_no: String },
    /// The entry is not a key/value node
    NotAnObject,
}

impl std::fmt::Display for MalformedFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedFlight::NoLegs { flight_no } => {
                write!(f, "Flight '{}' has no legs", flight_no)
            }
            MalformedFlight::NotAnObject => write!(f, "Flight entry is not an object"),
        }
    }
}

impl std::error::Error for MalformedFlight {}
