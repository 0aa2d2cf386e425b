//! Error kinds surfaced at the core boundary (spec §7). The teacher never
//! needed a shared error enum — `Module::init` just bubbles up
//! `Box<dyn std::error::Error>` from whatever failed (a missing shapefile, a
//! bad TOML). The core's failure modes are few and worth naming so callers
//! can match on them, so this hand-rolls `Display`/`Error` the way the
//! teacher would if it needed one, rather than reaching for `thiserror`
//! (not in the teacher's dependency table).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// One of the five input documents was not supplied or unreadable.
    MissingInput(String),
    /// A document was malformed or an array field is missing/empty.
    ParseError(String),
    /// The universe builder produced zero flight templates.
    NoFeasibleFlights,
    /// `run_ga` was invoked with empty routes, universe, or OD demand.
    MissingData(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::MissingInput(what) => write!(f, "missing input: {what}"),
            ScheduleError::ParseError(what) => write!(f, "parse error: {what}"),
            ScheduleError::NoFeasibleFlights => {
                write!(f, "no feasible flights in the generated universe")
            }
            ScheduleError::MissingData(what) => write!(f, "missing data: {what}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
