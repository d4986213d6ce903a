use core::{fmt, str::FromStr};

use rivulet::{BehaviorSubject, Observable};

/// Granularity of time-based views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TimeResolution {
    Year,
    Month,
    #[default]
    Week,
}

impl TimeResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
        }
    }
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown [`TimeResolution`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time resolution `{0}`")]
pub struct ParseTimeResolutionError(String);

impl FromStr for TimeResolution {
    type Err = ParseTimeResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "YEAR" => Ok(Self::Year),
            "MONTH" => Ok(Self::Month),
            "WEEK" => Ok(Self::Week),
            _ => Err(ParseTimeResolutionError(s.to_owned())),
        }
    }
}

/// The active view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Filter {
    pub time_resolution: TimeResolution,
}

/// Holds the active [`Filter`] and announces every change.
#[derive(Debug, Clone)]
pub struct FilterService {
    subject: BehaviorSubject<Filter>,
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterService {
    /// Starts with a weekly filter.
    pub fn new() -> Self {
        Self {
            subject: BehaviorSubject::new(Filter::default()),
        }
    }

    /// The current filter first, then every change. Never completes.
    pub fn filter_changes(&self) -> Observable<Filter> {
        self.subject.as_observable()
    }

    pub fn set_filter(&self, filter: Filter) {
        self.subject.next(filter);
    }

    pub fn current(&self) -> Filter {
        self.subject.value()
    }
}
