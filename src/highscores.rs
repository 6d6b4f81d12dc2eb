//! Persist the leaderboard to disk (XDG config or ~/.config/basecandy).

use anyhow::Result;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const FILENAME: &str = "highscores";

/// Records kept after each insert.
pub const MAX_RECORDS: usize = 100;

/// Returns the path to the leaderboard file (config dir / basecandy / highscores).
pub fn config_path() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if xdg.is_empty() {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".config")
        } else {
            PathBuf::from(xdg)
        }
    } else {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    base.join("basecandy").join(FILENAME)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub score: u32,
    pub name: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

impl ScoreRecord {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.splitn(3, '\t');
        let score = parts.next()?.trim().parse().ok()?;
        let timestamp = parts.next()?.trim().parse().ok()?;
        let name = parts.next()?.trim().to_string();
        Some(Self {
            score,
            name,
            timestamp,
        })
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Best scores first, at most [`MAX_RECORDS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    records: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Load from `path`. A missing or unreadable file is an empty board; bad lines are skipped.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        let mut records: Vec<ScoreRecord> = BufReader::new(&content[..])
            .lines()
            .map_while(Result::ok)
            .filter_map(|l| ScoreRecord::parse(&l))
            .collect();
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(MAX_RECORDS);
        Self { records }
    }

    /// Save to `path`. Creates the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = fs::File::create(path)?;
        for r in &self.records {
            writeln!(f, "{}\t{}\t{}", r.score, r.timestamp, r.name)?;
        }
        Ok(())
    }

    /// Insert a score and return its 1-based rank, or `None` if it fell off the bottom.
    /// Ties rank below earlier records with the same score.
    pub fn record(&mut self, score: u32, name: &str, timestamp: u64) -> Option<usize> {
        let name: String = name
            .trim()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let name = if name.is_empty() {
            "Anonymous".to_string()
        } else {
            name
        };
        let idx = self.records.partition_point(|r| r.score >= score);
        self.records.insert(
            idx,
            ScoreRecord {
                score,
                name,
                timestamp,
            },
        );
        self.records.truncate(MAX_RECORDS);
        (idx < self.records.len()).then_some(idx + 1)
    }

    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
