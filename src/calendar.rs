//! Activity data model and snapshot I/O
//!
//! A calendar is an ordered run of days, one count per day, covering a whole
//! number of weeks. The snapshot format is a JSON array of `{date, count}`
//! objects sorted by date ascending - the same document the `--raw-output`
//! flag writes, so a fetched calendar can be replayed offline.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_ROWS;
use crate::error::Error;

/// A single day's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u32,
}

/// A validated, date-ordered activity window
///
/// Shape invariant: the window covers `weeks() * 7` days and never changes
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCalendar {
    days: Vec<ActivityDay>,
}

impl ActivityCalendar {
    /// Build a calendar from an ordered day list.
    ///
    /// Rejects an empty window, a window that is not a whole number of
    /// weeks, and days that are out of order or non-consecutive. Truncating
    /// silently would desync the brick grid from the source data.
    pub fn from_days(days: Vec<ActivityDay>) -> Result<Self, Error> {
        if days.is_empty() {
            return Err(Error::data("calendar contains no days"));
        }
        if days.len() % GRID_ROWS != 0 {
            return Err(Error::data(format!(
                "calendar covers {} days, not a whole number of {GRID_ROWS}-day weeks",
                days.len()
            )));
        }
        for pair in days.windows(2) {
            let expected = pair[0].date.succ_opt();
            if expected != Some(pair[1].date) {
                return Err(Error::data(format!(
                    "days must be consecutive and ascending: {} is followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { days })
    }

    /// Number of week columns in the window
    pub fn weeks(&self) -> usize {
        self.days.len() / GRID_ROWS
    }

    pub fn days(&self) -> &[ActivityDay] {
        &self.days
    }

    /// Day at (week, weekday), week-major like the brick grid
    pub fn day(&self, week: usize, weekday: usize) -> Option<&ActivityDay> {
        if weekday >= GRID_ROWS {
            return None;
        }
        self.days.get(week * GRID_ROWS + weekday)
    }

    pub fn total_count(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }

    /// Parse a snapshot document.
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let days: Vec<ActivityDay> = serde_json::from_reader(reader)?;
        Self::from_days(days)
    }

    /// Write the snapshot document.
    pub fn to_writer(&self, writer: impl Write) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, &self.days)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Source of activity calendars
///
/// The simulation only ever sees a materialized [`ActivityCalendar`]; where
/// it came from (a saved snapshot, a live API client with its own retry
/// logic) is the source's business.
pub trait CalendarSource {
    fn fetch(&self) -> Result<ActivityCalendar, Error>;
}

/// Snapshot-file source
pub struct SnapshotSource {
    path: std::path::PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarSource for SnapshotSource {
    fn fetch(&self) -> Result<ActivityCalendar, Error> {
        ActivityCalendar::load(&self.path)
    }
}
