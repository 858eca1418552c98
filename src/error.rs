use rayon::ThreadPoolBuildError;
use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum UEError {
    File(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    ThreadPool(ThreadPoolBuildError),
    MissingAxis(String),
    MissingHistogram(String),
    HistogramKind { key: String, expected: &'static str },
    MissingEventField(String),
    InvalidAxis(String),
    Incompatible(String),
    Config(String),
    Truncated,
}

impl From<std::io::Error> for UEError {
    fn from(err: std::io::Error) -> Self {
        Self::File(err)
    }
}

impl From<serde_json::Error> for UEError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<serde_yaml::Error> for UEError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<ThreadPoolBuildError> for UEError {
    fn from(err: ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err)
    }
}

impl Display for UEError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(x) => write!(f, "Analysis had a file I/O error: {x}"),
            Self::Json(x) => write!(f, "Analysis had an error reading/writing JSON: {x}"),
            Self::Yaml(x) => write!(f, "Booking configuration could not be parsed: {x}"),
            Self::ThreadPool(x) => write!(f, "Unable to start the worker pool: {x}"),
            Self::MissingAxis(key) => write!(f, "No axis registered for {key}"),
            Self::MissingHistogram(key) => write!(f, "No histogram registered for {key}"),
            Self::HistogramKind { key, expected } => {
                write!(f, "Histogram {key} is not a {expected} histogram")
            }
            Self::MissingEventField(x) => write!(f, "Event record is missing field {x}"),
            Self::InvalidAxis(x) => write!(f, "Invalid axis definition: {x}"),
            Self::Incompatible(x) => write!(f, "Histograms cannot be merged: {x}"),
            Self::Config(x) => write!(f, "Invalid booking configuration: {x}"),
            Self::Truncated => write!(
                f,
                "Persisted analysis must hold an axis registry followed by a histogram registry"
            ),
        }
    }
}

impl Error for UEError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::File(x) => Some(x),
            Self::Json(x) => Some(x),
            Self::Yaml(x) => Some(x),
            Self::ThreadPool(x) => Some(x),
            _ => None,
        }
    }
}
