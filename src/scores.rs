/// High-score table: a bounded, score-descending list of (name, score)
/// entries persisted to a toml file.
///
/// Ordering rules:
///   - Sorted by score descending at all times.
///   - Equal scores keep insertion order: the earlier entry stays in front.
///   - Never longer than `capacity` (fixed at construction).
///
/// Persistence:
///   - Absent file on startup means an empty table; an empty file is
///     written immediately so the next save has a known location.
///   - A corrupt or unreadable file is treated as absent (warning logged)
///     and overwritten on the next save.
///   - Saves go through a sibling temp file + rename, so a crash mid-write
///     never leaves a truncated table behind.

use std::io;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Default number of entries kept, matching the in-game scores screen.
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        ScoreEntry { name: name.into(), score }
    }
}

/// On-disk schema: `[[entries]]` records.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoresFile {
    #[serde(default)]
    entries: Vec<ScoreEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoresTable {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl HighScoresTable {
    pub fn new(capacity: usize) -> Self {
        HighScoresTable { entries: Vec::new(), capacity }
    }

    /// Load the table from `path`, or create it (and the file) when absent.
    /// Deserialization failures fall back to an empty table.
    pub fn load_or_create(path: &Path, capacity: usize) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(text) => match toml::from_str::<ScoresFile>(&text) {
                    Ok(file) => {
                        let mut table = HighScoresTable { entries: file.entries, capacity };
                        // Hand-edited files may violate the invariants;
                        // restore them here. A stable sort keeps ties in
                        // file order.
                        table.entries.sort_by(|a, b| b.score.cmp(&a.score));
                        table.entries.truncate(capacity);
                        return table;
                    }
                    Err(e) => {
                        warn!("high scores file {} is corrupt ({e}); starting fresh", path.display());
                    }
                },
                Err(e) => {
                    warn!("cannot read high scores file {} ({e}); starting fresh", path.display());
                }
            }
            return HighScoresTable::new(capacity);
        }

        let table = HighScoresTable::new(capacity);
        if let Err(e) = table.save(path) {
            warn!("cannot create high scores file {} ({e})", path.display());
        }
        table
    }

    /// Index at which `score` would be inserted, or `None` when the table
    /// is full and `score` beats no existing entry. A tie with an existing
    /// entry lands after it.
    pub fn rank(&self, score: u32) -> Option<usize> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        if idx < self.capacity {
            Some(idx)
        } else {
            None
        }
    }

    /// Insert at rank; drops the evicted tail entry when full.
    /// Returns false when the score does not qualify.
    pub fn add(&mut self, entry: ScoreEntry) -> bool {
        match self.rank(entry.score) {
            Some(idx) => {
                self.entries.insert(idx, entry);
                self.entries.truncate(self.capacity);
                true
            }
            None => false,
        }
    }

    /// Atomic write: sibling temp file, then rename over the target.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = ScoresFile { entries: self.entries.clone() };
        let body = toml::to_string(&file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);
        std::fs::write(tmp, body)?;
        std::fs::rename(tmp, path)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table_with(scores: &[u32]) -> HighScoresTable {
        let mut t = HighScoresTable::new(DEFAULT_CAPACITY);
        for (i, &s) in scores.iter().enumerate() {
            t.add(ScoreEntry::new(format!("p{i}"), s));
        }
        t
    }

    fn sorted_desc(t: &HighScoresTable) -> bool {
        t.entries().windows(2).all(|w| w[0].score >= w[1].score)
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("brickbreak_scores_{}_{}.toml", tag, std::process::id()))
    }

    #[test]
    fn rank_on_empty_table_is_head() {
        let t = HighScoresTable::new(5);
        assert_eq!(t.rank(0), Some(0));
    }

    #[test]
    fn entries_stay_sorted_and_bounded() {
        let mut t = HighScoresTable::new(3);
        for s in [10, 50, 30, 70, 20, 60] {
            t.add(ScoreEntry::new("x", s));
            assert!(sorted_desc(&t));
            assert!(t.entries().len() <= 3);
        }
        let scores: Vec<u32> = t.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![70, 60, 50]);
    }

    #[test]
    fn full_table_rejects_score_equal_to_lowest() {
        let t = table_with(&[100, 80, 60, 40, 20]);
        assert_eq!(t.rank(20), None);
        assert_eq!(t.rank(19), None);
        assert_eq!(t.rank(21), Some(4));
    }

    #[test]
    fn tie_inserts_after_existing_entry() {
        let mut t = HighScoresTable::new(5);
        t.add(ScoreEntry::new("first", 50));
        t.add(ScoreEntry::new("second", 50));
        assert_eq!(t.entries()[0].name, "first");
        assert_eq!(t.entries()[1].name, "second");
    }

    #[test]
    fn add_evicts_the_lowest_entry_when_full() {
        let mut t = table_with(&[100, 80, 60, 40, 20]);
        assert!(t.add(ScoreEntry::new("P", 150)));
        let scores: Vec<u32> = t.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![150, 100, 80, 60, 40]);
    }

    #[test]
    fn rank_some_iff_add_changes_entries() {
        let t = table_with(&[100, 80, 60, 40, 20]);
        for s in [0, 20, 21, 100, 500] {
            let mut copy = t.clone();
            let changed = copy.add(ScoreEntry::new("x", s));
            assert_eq!(changed, t.rank(s).is_some());
            assert_eq!(changed, copy.entries() != t.entries());
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let t = table_with(&[12, 99, 7]);
        t.save(&path).unwrap();
        let loaded = HighScoresTable::load_or_create(&path, DEFAULT_CAPACITY);
        assert_eq!(loaded, t);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn absent_file_creates_empty_table_and_file() {
        let path = temp_path("absent");
        let _ = std::fs::remove_file(&path);
        let t = HighScoresTable::load_or_create(&path, DEFAULT_CAPACITY);
        assert!(t.is_empty());
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "entries = \"not a table\"").unwrap();
        let t = HighScoresTable::load_or_create(&path, DEFAULT_CAPACITY);
        assert!(t.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loading_unsorted_file_restores_the_invariant() {
        let path = temp_path("unsorted");
        std::fs::write(
            &path,
            "[[entries]]\nname = \"a\"\nscore = 5\n\n[[entries]]\nname = \"b\"\nscore = 9\n",
        )
        .unwrap();
        let t = HighScoresTable::load_or_create(&path, DEFAULT_CAPACITY);
        let scores: Vec<u32> = t.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 5]);
        let _ = std::fs::remove_file(&path);
    }
}
