//! Past/upcoming classification of shows.
//!
//! A show is upcoming when its start time is strictly after `now`; every
//! other show (including one starting exactly at `now`) is past. Callers
//! capture `now` once per request so both halves agree on the same
//! instant.

use chrono::{DateTime, Utc};
use fyyur_db::entities::show;

/// Wire format for show start times, e.g. `2019-05-21T21:30:00.000000Z`.
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_time > now
}

pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Number of upcoming shows in `shows`.
pub fn count_upcoming<'a, I>(shows: I, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a show::Model>,
{
    shows
        .into_iter()
        .filter(|s| is_upcoming(s.start_time, now))
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

/// Split `items` into past and upcoming in one pass, keeping input order
/// within each half. `start_time` extracts the instant to classify on.
pub fn split_shows<T, F>(items: Vec<T>, now: DateTime<Utc>, start_time: F) -> Schedule<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut schedule = Schedule::default();
    for item in items {
        if is_upcoming(start_time(&item), now) {
            schedule.upcoming.push(item);
        } else {
            schedule.past.push(item);
        }
    }
    schedule
}
