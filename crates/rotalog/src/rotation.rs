//! Timed log file rotation
//!
//! The active file rotates at midnight: it is renamed to
//! `{stem}-{YYYY-MM-DD}{ext}`, labelled with the day it covered, old
//! rotated files beyond the retention count are pruned, and a fresh
//! active file is opened. Label and schedule computations correct for
//! DST shifts so filenames do not drift by an hour across transitions.

use std::cmp::Ordering;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use rotalog_core::constants::{DATE_SUFFIX, SECS_PER_DAY};
use rotalog_core::{Error, Result};
use tracing::{debug, warn};

/// One rotating log file: the active handle plus the bookkeeping
/// needed to decide when and how to roll it over.
pub struct RollingFile {
    base_path: PathBuf,
    /// At most one open handle, always on `base_path`
    file: Option<BufWriter<File>>,
    /// Epoch seconds of the next rollover, strictly in the future when
    /// computed
    next_rollover_at: i64,
    /// Rotated files to keep; 0 keeps everything
    backups: usize,
    interval: i64,
    utc: bool,
    /// Defer opening the active file to the first write
    delay: bool,
}

impl RollingFile {
    /// Open a rotating file writing to `base_path`, creating parent
    /// directories as needed. With `delay` the active file is not
    /// opened until the first write.
    pub fn open(base_path: PathBuf, backups: usize, utc: bool, delay: bool) -> Result<Self> {
        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = if delay {
            None
        } else {
            Some(open_append(&base_path)?)
        };
        // Anchor the schedule on the existing file's mtime so a file
        // left over from a previous run still rotates on the first
        // write, and a restart never rotates the same period twice.
        let anchor = fs::metadata(&base_path)
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or_else(|| Utc::now().timestamp());
        Ok(Self {
            base_path,
            file,
            next_rollover_at: next_rollover_at(anchor, SECS_PER_DAY, utc, &local_offset_secs),
            backups,
            interval: SECS_PER_DAY,
            utc,
            delay,
        })
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Append one line, rolling the file over first if the current
    /// period has ended.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let now = Utc::now().timestamp();
        if now >= self.next_rollover_at {
            self.rollover(now)?;
        }
        if self.file.is_none() {
            self.file = Some(open_append(&self.base_path)?);
        }
        if let Some(writer) = self.file.as_mut() {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Flush pending output on the active handle
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.file.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Close the ending period: rename the active file to its dated
    /// name, prune old rotated files, reopen, and schedule the next
    /// rollover. Rename and delete failures are warned and skipped;
    /// only a failure to reopen the active file is returned.
    fn rollover(&mut self, now: i64) -> Result<()> {
        debug!("rolling over {}", self.base_path.display());
        if let Some(mut writer) = self.file.take() {
            if let Err(e) = writer.flush() {
                warn!(
                    "flush of {} before rotation failed: {}",
                    self.base_path.display(),
                    e
                );
            }
        }

        // Label with the start of the period being closed, not "now".
        let period_start = self.next_rollover_at - self.interval;
        let label = rotation_label(period_start, now, self.utc, &local_offset_secs);
        let rotated = rotated_path(&self.base_path, &label);

        // Last rotation for a given label wins, but only displace an
        // existing rotated file when there is an active file to take
        // its place; a re-entered rollover after a failed reopen must
        // not delete the period it already rotated.
        if self.base_path.exists() {
            if rotated.exists() {
                if let Err(e) = fs::remove_file(&rotated) {
                    report_rotation_io(&rotated, e);
                }
            }
            if let Err(e) = fs::rename(&self.base_path, &rotated) {
                report_rotation_io(&self.base_path, e);
            }
        }

        if self.backups > 0 {
            for stale in files_to_delete(&self.base_path, self.backups) {
                if let Err(e) = fs::remove_file(&stale) {
                    report_rotation_io(&stale, e);
                }
            }
        }

        if !self.delay {
            self.file = Some(open_append(&self.base_path)?);
        }

        self.next_rollover_at = next_rollover_at(now, self.interval, self.utc, &local_offset_secs);
        Ok(())
    }
}

/// Best-effort recovery: rotation IO failures go to the diagnostic
/// channel and never crash the writer
fn report_rotation_io(path: &Path, source: std::io::Error) {
    let err = Error::RotationIo {
        path: path.to_path_buf(),
        source,
    };
    warn!("{}", err);
}

fn open_append(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(BufWriter::new(file))
}

/// Offset from UTC, in seconds, of local time at instant `t`
fn local_offset_secs(t: i64) -> i32 {
    Local
        .timestamp_opt(t, 0)
        .single()
        .map(|dt| dt.offset().fix().local_minus_utc())
        .unwrap_or(0)
}

/// `(stem, extension)` of a file name, split at the last dot. The
/// extension keeps its leading dot; a dot at position zero is not an
/// extension separator.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Path of the rotated file for `label`, next to the active file
fn rotated_path(base: &Path, label: &str) -> PathBuf {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_name(&name);
    base.with_file_name(format!("{}-{}{}", stem, label, ext))
}

/// DST addend between two instants: +1h when "now" is in DST and the
/// other instant was not, -1h for the reverse, 0 when the state is the
/// same. Offsets differ exactly when the DST flags do.
fn dst_addend(offset_now: i32, offset_then: i32) -> i64 {
    match offset_now.cmp(&offset_then) {
        Ordering::Greater => 3600,
        Ordering::Less => -3600,
        Ordering::Equal => 0,
    }
}

/// Date label for the period that started at `period_start`, shifted
/// by an hour when a DST transition sits between then and `now` so the
/// label keeps the period's own calendar day.
fn rotation_label(period_start: i64, now: i64, utc: bool, offset_at: &dyn Fn(i64) -> i32) -> String {
    if utc {
        return format_label(period_start, 0);
    }
    let t = period_start + dst_addend(offset_at(now), offset_at(period_start));
    format_label(t, offset_at(t))
}

fn format_label(t: i64, offset_secs: i32) -> String {
    FixedOffset::east_opt(offset_secs)
        .and_then(|tz| tz.timestamp_opt(t, 0).single())
        .map(|dt| dt.format(DATE_SUFFIX).to_string())
        .unwrap_or_else(|| t.to_string())
}

/// Epoch time of the next midnight boundary strictly after `now`,
/// DST-adjusted so the boundary stays at local midnight
fn next_rollover_at(now: i64, interval: i64, utc: bool, offset_at: &dyn Fn(i64) -> i32) -> i64 {
    let offset_now = if utc { 0 } else { offset_at(now) as i64 };
    let into_day = (now + offset_now).rem_euclid(SECS_PER_DAY);
    let mut next = now + (SECS_PER_DAY - into_day);
    // into_day < SECS_PER_DAY already puts next after now; the loop
    // only matters if the clock moved between the two reads of it.
    while next <= now {
        next += interval;
    }
    if !utc {
        next += dst_addend(offset_at(now), offset_at(next));
    }
    next
}

/// Rotated files of `base` beyond the retention count, oldest first.
/// Fewer matching files than `backups` means pruning is not yet due.
fn files_to_delete(base: &Path, backups: usize) -> Vec<PathBuf> {
    let dir = match base.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_name(&name);
    let prefix = format!("{}-", stem);

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut matches = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let file_name = match file_name.to_str() {
            Some(n) => n,
            None => continue,
        };
        if !file_name.starts_with(&prefix) || !file_name.ends_with(ext) {
            continue;
        }
        let label = &file_name[prefix.len()..file_name.len() - ext.len()];
        if NaiveDate::parse_from_str(label, DATE_SUFFIX).is_ok() {
            matches.push(file_name.to_string());
        }
    }

    if matches.len() < backups {
        return Vec::new();
    }
    // Sortable date labels make lexicographic order chronological.
    matches.sort();
    matches.truncate(matches.len() - backups);
    matches.into_iter().map(|n| dir.join(n)).collect()
}
