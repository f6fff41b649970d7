//! Crontab files: one entry per line, `#` comments and blank lines ignored.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use crond_core::{CrondError, Result};

use crate::entry::CronEntry;

/// An entry with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrontabLine {
    pub line: usize,
    pub entry: CronEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Crontab {
    lines: Vec<CrontabLine>,
}

impl Crontab {
    /// Parse crontab text. The first malformed line fails the whole file.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let entry = CronEntry::parse(text).map_err(|e| CrondError::Crontab {
                line: idx + 1,
                message: e.to_string(),
            })?;
            lines.push(CrontabLine {
                line: idx + 1,
                entry,
            });
        }
        tracing::debug!("parsed {} crontab entries", lines.len());
        Ok(Self { lines })
    }

    /// Read and parse a crontab file; `~` is expanded.
    pub fn load(path: &Path) -> Result<Self> {
        // Non-UTF-8 paths are used as given.
        let expanded = match path.to_str() {
            Some(text) => PathBuf::from(shellexpand::tilde(text).as_ref()),
            None => path.to_path_buf(),
        };
        let content = std::fs::read_to_string(&expanded)?;
        Self::parse(&content)
    }

    pub fn lines(&self) -> &[CrontabLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The entry that fires first after `now`, with its run time.
    /// Ties go to the earlier line.
    pub fn next_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<(DateTime<Tz>, &CrontabLine)> {
        let mut best: Option<(DateTime<Tz>, &CrontabLine)> = None;
        for line in &self.lines {
            let at = match line.entry.next_execution(now) {
                Ok(at) => at,
                Err(e) => {
                    tracing::warn!("⚠️ crontab line {} skipped: {e}", line.line);
                    continue;
                }
            };
            let earlier = match &best {
                Some((current, _)) => at < *current,
                None => true,
            };
            if earlier {
                best = Some((at, line));
            }
        }
        best
    }

    /// Entries whose schedule matches the wall-clock minute of `at`.
    pub fn due_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Vec<&CrontabLine> {
        self.lines
            .iter()
            .filter(|l| l.entry.schedule.matches(at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SAMPLE: &str = "\
# nightly jobs
5 0 * * * backup.sh

  # indented comment
*/15 * * * * poll --quiet
0 12 * * 1 weekly-report
";

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let tab = Crontab::parse(SAMPLE).unwrap();
        assert_eq!(tab.len(), 3);
        let numbers: Vec<usize> = tab.lines().iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![2, 5, 6]);
        assert_eq!(tab.lines()[1].entry.command, "poll --quiet");
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = Crontab::parse("5 0 * * * ok\n\n5 0 * * 9 broken\n").unwrap_err();
        match err {
            CrondError::Crontab { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("day-of-week"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_crontab() {
        let tab = Crontab::parse("# nothing\n\n").unwrap();
        assert!(tab.is_empty());
        assert!(tab.next_due(&Utc::now()).is_none());
    }

    #[test]
    fn test_next_due() {
        let tab = Crontab::parse(SAMPLE).unwrap();
        let now = Utc.with_ymd_and_hms(2019, 12, 1, 0, 1, 0).unwrap();
        let (at, line) = tab.next_due(&now).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2019, 12, 1, 0, 5, 0).unwrap());
        assert_eq!(line.entry.command, "backup.sh");
    }

    #[test]
    fn test_next_due_tie_prefers_earlier_line() {
        let tab = Crontab::parse("0 * * * * first\n0 * * * * second\n").unwrap();
        let now = Utc.with_ymd_and_hms(2019, 12, 1, 0, 30, 0).unwrap();
        let (_, line) = tab.next_due(&now).unwrap();
        assert_eq!(line.entry.command, "first");
    }

    #[test]
    fn test_next_due_skips_impossible_entries() {
        let tab = Crontab::parse("0 0 30 2 * never\n0 0 1 1 * new-year\n").unwrap();
        let now = Utc.with_ymd_and_hms(2019, 12, 1, 0, 0, 0).unwrap();
        let (at, line) = tab.next_due(&now).unwrap();
        assert_eq!(line.entry.command, "new-year");
        assert_eq!(at, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_due_at() {
        let tab = Crontab::parse(SAMPLE).unwrap();
        let at = Utc.with_ymd_and_hms(2019, 12, 2, 12, 0, 0).unwrap();
        let due: Vec<&str> = tab
            .due_at(&at)
            .iter()
            .map(|l| l.entry.command.as_str())
            .collect();
        assert_eq!(due, vec!["poll --quiet", "weekly-report"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("crond-crontab-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("crontab");
        std::fs::write(&path, SAMPLE).unwrap();

        let tab = Crontab::load(&path).unwrap();
        assert_eq!(tab.len(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = std::env::temp_dir().join(format!("crond-crontab-raw-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(OsStr::from_bytes(b"cron\xfftab"));
        std::fs::write(&path, SAMPLE).unwrap();

        let tab = Crontab::load(&path).unwrap();
        assert_eq!(tab.len(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = Crontab::load(Path::new("/definitely/not/here/crontab")).unwrap_err();
        assert!(matches!(err, CrondError::Io(_)));
    }
}
