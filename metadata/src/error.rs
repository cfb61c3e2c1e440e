//! Crate-level error type.
//!
//! Only structural problems are reported through [`Error`]:
//! malformed tags, unusable top-level JSON,
//! and violations of the series/study invariants.
//! Content which does not match its value representation
//! is kept as-is by the value decoders and never surfaces here.
use snafu::{Backtrace, Snafu};

/// An error raised while building or querying the metadata model.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The tag text cannot be normalized to 8 hexadecimal digits.
    #[snafu(display("Invalid DICOM tag `{}`", input))]
    InvalidTag { input: String, backtrace: Backtrace },

    /// The top-level JSON is not a non-empty array of data set objects.
    #[snafu(display("Invalid DICOM JSON data: {}", reason))]
    InvalidInput { reason: String, backtrace: Backtrace },

    /// The JSON text could not be parsed at all.
    #[snafu(display("Invalid JSON: {}", source))]
    InvalidJson {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A series could not determine its series instance UID.
    #[snafu(display("Missing series instance UID: {}", reason))]
    MissingSeriesUid {
        reason: &'static str,
        backtrace: Backtrace,
    },

    /// An instance does not belong to the series it was given to.
    #[snafu(display(
        "Instance series UID ({}) does not match series UID ({})",
        found.as_deref().unwrap_or("<none>"),
        expected
    ))]
    SeriesUidMismatch {
        expected: String,
        found: Option<String>,
        backtrace: Backtrace,
    },

    /// The first instance of a study has no study instance UID.
    #[snafu(display("Study instance UID (0020000D) not found in first instance"))]
    MissingStudyUid { backtrace: Backtrace },

    /// A study was requested from an input without instances.
    #[snafu(display("No instances found to create study"))]
    NoInstancesFound { backtrace: Backtrace },

    /// The dictionary has no entries, so keywords cannot be resolved.
    #[snafu(display("Tag dictionary has no data loaded"))]
    MissingDictionaryData { backtrace: Backtrace },

    /// The dictionary does not know the given keyword.
    #[snafu(display("Unknown attribute keyword `{}`", keyword))]
    UnknownKeyword {
        keyword: String,
        backtrace: Backtrace,
    },

    /// Sequences are nested deeper than the configured limit.
    #[snafu(display(
        "Sequence {} exceeds the maximum nesting depth of {}",
        tag,
        max_depth
    ))]
    SequenceTooDeep {
        tag: crate::Tag,
        max_depth: usize,
        backtrace: Backtrace,
    },

    /// A dictionary resource could not be read.
    #[snafu(display("Could not load tag dictionary"))]
    LoadDictionary {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

/// Type alias for a result from this library.
pub type Result<T, E = Error> = std::result::Result<T, E>;
