//! Finish-time parsing and time-bin histograms

use crate::config::Rounding;
use crate::ScrapeError;
use std::fmt;

const SECONDS_PER_DAY: u32 = 86_400;

/// A finishing time, whole seconds since the start gun
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FinishTime(u32);

impl FinishTime {
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FinishTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hms(self.0))
    }
}

/// Formats seconds as `H:MM:SS` without a day component
pub fn format_hms(secs: u32) -> String {
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Parses `H:MM:SS` (or `MM:SS`) into a finish time
///
/// Fractional seconds are truncated. Minutes and seconds must be below 60 and
/// the total below 24 hours.
pub fn parse_finish_time(raw: &str) -> Result<FinishTime, ScrapeError> {
    let invalid = || ScrapeError::InvalidTime(raw.to_string());
    let parts: Vec<&str> = raw.trim().split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return Err(invalid()),
    };

    let whole_seconds = match seconds.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c.is_ascii_digit()) => whole,
        Some(_) => return Err(invalid()),
        None => seconds,
    };

    let hours = parse_component(hours).ok_or_else(invalid)?;
    let minutes = parse_component(minutes).ok_or_else(invalid)?;
    let seconds = parse_component(whole_seconds).ok_or_else(invalid)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let total = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .filter(|total| *total < SECONDS_PER_DAY)
        .ok_or_else(invalid)?;

    Ok(FinishTime(total))
}

/// Digits only; rejects signs and empty strings
fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Rounds a time to a multiple of `bin_secs`
///
/// `Nearest` sends exact midpoints to the even bin index, so 3:00 with
/// 2-minute bins becomes 4:00 and 5:00 also becomes 4:00.
pub fn round_to_bin(secs: u32, bin_secs: u32, rounding: Rounding) -> u32 {
    let bin = bin_secs.max(1);
    let index = secs / bin;
    let remainder = secs % bin;

    let index = match rounding {
        Rounding::Floor => index,
        Rounding::Nearest => {
            let upper = bin - remainder;
            if remainder > upper || (remainder == upper && index % 2 == 1) {
                index + 1
            } else {
                index
            }
        }
    };

    index.saturating_mul(bin)
}

/// One time bin of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Bin position in seconds
    pub start: u32,
    pub count: usize,
}

impl Bucket {
    pub fn label(&self) -> String {
        format_hms(self.start)
    }
}

/// Counts finish times per bin
///
/// Every bin between the smallest and largest occupied bin is present, empty
/// ones with a count of 0. Bins are ordered by time.
pub fn bucket_counts(times: &[FinishTime], bin_secs: u32, rounding: Rounding) -> Vec<Bucket> {
    let bin = bin_secs.max(1);
    let rounded: Vec<u32> = times
        .iter()
        .map(|t| round_to_bin(t.as_secs(), bin, rounding))
        .collect();

    let (Some(&first), Some(&last)) = (rounded.iter().min(), rounded.iter().max()) else {
        return Vec::new();
    };

    let mut buckets: Vec<Bucket> = (first..=last)
        .step_by(bin as usize)
        .map(|start| Bucket { start, count: 0 })
        .collect();

    for start in rounded {
        let index = ((start - first) / bin) as usize;
        buckets[index].count += 1;
    }

    buckets
}

/// Arithmetic mean, truncated to whole seconds
pub fn mean_time(times: &[FinishTime]) -> Option<FinishTime> {
    if times.is_empty() {
        return None;
    }
    let total: u64 = times.iter().map(|t| u64::from(t.as_secs())).sum();
    Some(FinishTime((total / times.len() as u64) as u32))
}
