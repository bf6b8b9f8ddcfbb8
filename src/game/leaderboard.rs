use itertools::Itertools;
use log::{info, trace, warn};
use std::cmp::Ordering;
use std::rc::Rc;

use crate::model::{GameResult, GlobalStats, RankedEntry, ScoreEntry};
use crate::platform::{read_json, write_json, Clock, Storage};

pub const MAX_ENTRIES: usize = 10;
pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const GLOBAL_STATS_KEY: &str = "global_stats";

/// The ranked top results, kept in storage across runs.
///
/// Entries are always ordered best-first and never exceed [`MAX_ENTRIES`].
/// Storage failures are logged and otherwise ignored so the game stays
/// playable when the data directory is broken.
pub struct LeaderboardStore {
    entries: Vec<ScoreEntry>,
    global_stats: GlobalStats,
    storage: Box<dyn Storage>,
    clock: Rc<dyn Clock>,
}

impl LeaderboardStore {
    /// Opens the store and loads whatever valid data storage holds.
    pub fn open(storage: Box<dyn Storage>, clock: Rc<dyn Clock>) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            global_stats: GlobalStats::default(),
            storage,
            clock,
        };
        store.entries = store.load();
        store.global_stats = store.load_global_stats();
        store
    }

    /// Reads the persisted leaderboard. Missing data gives an empty list;
    /// unreadable or corrupt data is logged and also gives an empty list.
    pub fn load(&self) -> Vec<ScoreEntry> {
        match read_json::<Vec<ScoreEntry>>(self.storage.as_ref(), LEADERBOARD_KEY) {
            Ok(Some(entries)) => {
                info!(target: "leaderboard", "Loaded {} leaderboard entries", entries.len());
                normalize(entries)
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(target: "leaderboard", "Discarding stored leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    fn load_global_stats(&self) -> GlobalStats {
        match read_json::<GlobalStats>(self.storage.as_ref(), GLOBAL_STATS_KEY) {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                warn!(target: "leaderboard", "Discarding stored global stats: {}", e);
                GlobalStats::default()
            }
        }
    }

    /// Re-reads storage, replacing the in-memory state.
    pub fn reload(&mut self) {
        self.entries = self.load();
        self.global_stats = self.load_global_stats();
    }

    /// Records a win: scores it, inserts it in rank order, trims the board
    /// to [`MAX_ENTRIES`] and persists the result.
    pub fn submit(&mut self, player_name: &str, elapsed_seconds: f64, attempts: u32) -> RankedEntry {
        let elapsed_seconds = if elapsed_seconds.is_finite() && elapsed_seconds >= 0.0 {
            elapsed_seconds
        } else {
            warn!(target: "leaderboard", "Recording invalid elapsed time {} as 0", elapsed_seconds);
            0.0
        };
        let attempts = if attempts == 0 {
            warn!(target: "leaderboard", "Recording a win with 0 attempts as 1");
            1
        } else {
            attempts
        };

        let entry = ScoreEntry::new(player_name, elapsed_seconds, attempts, self.clock.wall_clock());
        let position = insertion_point(&self.entries, &entry);
        self.entries.insert(position, entry.clone());
        self.entries.truncate(MAX_ENTRIES);
        let rank = (position < MAX_ENTRIES).then_some(position + 1);
        trace!(
            target: "leaderboard",
            "{} scored {:.2} ({} attempts, {:.1}s), rank {:?}",
            entry.player_name(),
            entry.score(),
            entry.attempts(),
            entry.elapsed_seconds(),
            rank
        );

        self.global_stats.record(&entry);

        let entries = self.entries.clone();
        self.persist(&entries);
        self.persist_global_stats();

        RankedEntry { entry, rank }
    }

    pub fn submit_result(&mut self, player_name: &str, result: &GameResult) -> RankedEntry {
        self.submit(player_name, result.elapsed_seconds(), result.attempts)
    }

    /// Writes the whole list under one key. Failures are logged and dropped.
    pub fn persist(&mut self, entries: &[ScoreEntry]) {
        if let Err(e) = write_json(self.storage.as_mut(), LEADERBOARD_KEY, &entries) {
            warn!(target: "leaderboard", "Failed to save leaderboard: {}", e);
        }
    }

    fn persist_global_stats(&mut self) {
        if let Err(e) = write_json(self.storage.as_mut(), GLOBAL_STATS_KEY, &self.global_stats) {
            warn!(target: "leaderboard", "Failed to save global stats: {}", e);
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Entries paired with their 1-based rank.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &ScoreEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Whether a result with this score would make the board right now.
    pub fn qualifies(&self, score: f64) -> bool {
        self.entries.len() < MAX_ENTRIES
            || self
                .entries
                .last()
                .is_some_and(|worst| score > worst.score())
    }

    pub fn global_stats(&self) -> &GlobalStats {
        &self.global_stats
    }
}

/// Index after every entry that ranks at least as well as `entry`, so
/// complete ties keep insertion order.
fn insertion_point(entries: &[ScoreEntry], entry: &ScoreEntry) -> usize {
    entries.partition_point(|existing| existing.rank_cmp(entry) != Ordering::Greater)
}

pub fn is_ranked(entries: &[ScoreEntry]) -> bool {
    entries
        .iter()
        .tuple_windows()
        .all(|(a, b)| a.rank_cmp(b) != Ordering::Greater)
}

/// Restores the ordering and size invariants on data read from storage.
fn normalize(mut entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    if !is_ranked(&entries) {
        warn!(target: "leaderboard", "Stored leaderboard was out of order, re-ranking");
        entries.sort_by(|a, b| a.rank_cmp(b));
    }
    if entries.len() > MAX_ENTRIES {
        warn!(
            target: "leaderboard",
            "Stored leaderboard had {} entries, keeping {}",
            entries.len(),
            MAX_ENTRIES
        );
        entries.truncate(MAX_ENTRIES);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ManualClock, MemoryStorage};
    use proptest::prelude::*;
    use test_context::test_context;

    use crate::tests::UsingLogger;

    fn open(storage: &MemoryStorage) -> LeaderboardStore {
        LeaderboardStore::open(Box::new(storage.clone()), Rc::new(ManualClock::new()))
    }

    fn scores(store: &LeaderboardStore) -> Vec<f64> {
        store.entries().iter().map(|e| e.score()).collect()
    }

    #[test]
    fn test_empty_storage_loads_empty() {
        let store = open(&MemoryStorage::new());
        assert!(store.entries().is_empty());
        assert_eq!(store.global_stats(), &GlobalStats::default());
    }

    #[test]
    fn test_submit_returns_entry_and_rank() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);

        let first = store.submit("Ada", 300.0, 50);
        assert_eq!(first.rank, Some(1));
        assert_eq!(first.entry.score(), 21.0);
        assert_eq!(first.entry.player_name(), "Ada");

        let better = store.submit("Bo", 10.0, 5);
        assert_eq!(better.rank, Some(1));
        let worse = store.submit("Cy", 600.0, 100);
        assert_eq!(worse.rank, Some(3));

        assert_eq!(scores(&store), vec![50.0, 21.0, 10.5]);
    }

    #[test]
    fn test_submit_persists_full_board() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.submit("Ada", 300.0, 50);
        store.submit("Bo", 600.0, 100);

        let reopened = open(&storage);

        assert_eq!(reopened.entries(), store.entries());
        assert_eq!(reopened.global_stats().games_won, 2);
    }

    #[test]
    fn test_board_is_capped() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        for attempts in 30..50 {
            store.submit("p", 300.0, attempts);
            assert!(store.entries().len() <= MAX_ENTRIES);
        }
        assert_eq!(store.entries().len(), MAX_ENTRIES);
        assert_eq!(store.entries()[0].attempts(), 30);
        assert_eq!(store.entries()[9].attempts(), 39);

        let missed = store.submit("late", 300.0, 500);
        assert_eq!(missed.rank, None);
        assert!(!missed.made_leaderboard());
        assert!(store.entries().iter().all(|e| e.id() != missed.entry.id()));
        assert_eq!(store.global_stats().games_won, 21);
    }

    #[test]
    fn test_equal_scores_rank_by_tie_breaker_regardless_of_order() {
        let mut store = open(&MemoryStorage::new());
        // All clamp to 50.0
        store.submit("slow", 50.0, 3);
        store.submit("fast", 5.0, 3);
        store.submit("lucky", 80.0, 1);

        let names: Vec<&str> = store.entries().iter().map(|e| e.player_name()).collect();
        assert_eq!(names, vec!["lucky", "fast", "slow"]);
    }

    #[test]
    fn test_complete_ties_keep_insertion_order() {
        let mut store = open(&MemoryStorage::new());
        store.submit("first", 12.0, 4);
        store.submit("second", 12.0, 4);
        let third = store.submit("third", 12.0, 4);

        assert_eq!(third.rank, Some(3));
        let names: Vec<&str> = store.entries().iter().map(|e| e.player_name()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_invalid_inputs_are_sanitized() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);

        let nan = store.submit("n", f64::NAN, 0);
        assert_eq!(nan.entry.elapsed_seconds(), 0.0);
        assert_eq!(nan.entry.attempts(), 1);
        store.submit("neg", -4.0, 2);

        // Still decodes, nothing was written as null
        assert_eq!(open(&storage).entries().len(), 2);
    }

    #[test]
    fn test_reload_keeps_exact_elapsed_and_score() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.submit("p", 189.66552742721242, 150);
        store.submit("q", 0.1 + 0.2, 7);

        let reopened = open(&storage);

        assert_eq!(reopened.entries(), store.entries());
        assert_eq!(reopened.entries()[1].elapsed_seconds(), 189.66552742721242);
    }

    #[test]
    fn test_huge_elapsed_is_recorded() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);

        let ranked = store.submit("p", 1.0e20, 1);

        assert_eq!(ranked.rank, Some(1));
        assert_eq!(ranked.entry.elapsed_seconds(), 1.0e20);
        assert_eq!(store.global_stats().games_won, 1);
        assert_eq!(open(&storage).entries(), store.entries());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_corrupt_storage_loads_empty(_: &mut UsingLogger) {
        let storage = MemoryStorage::new();
        storage.put_raw(LEADERBOARD_KEY, "[{\"id\": 3, \"truncated");
        storage.put_raw(GLOBAL_STATS_KEY, "\u{0}\u{1}");

        let mut store = open(&storage);
        assert!(store.entries().is_empty());
        assert_eq!(store.load(), Vec::new());

        // The next submit overwrites the corrupt blob with a valid one
        store.submit("Ada", 300.0, 50);
        assert_eq!(open(&storage).entries().len(), 1);
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let storage = MemoryStorage::new();
        storage.put_raw(LEADERBOARD_KEY, r#"{"entries": []}"#);
        assert!(open(&storage).entries().is_empty());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_failed_persist_keeps_memory_and_prior_storage(_: &mut UsingLogger) {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.submit("Ada", 300.0, 50);
        let saved = storage.raw(LEADERBOARD_KEY);

        storage.set_fail_writes(true);
        let ranked = store.submit("Bo", 10.0, 5);

        assert_eq!(ranked.rank, Some(1));
        assert_eq!(store.entries().len(), 2);
        assert_eq!(storage.raw(LEADERBOARD_KEY), saved);
        assert_eq!(open(&storage).entries().len(), 1);
    }

    #[test]
    fn test_out_of_order_storage_is_reranked_and_capped() {
        let storage = MemoryStorage::new();
        let mut source = open(&MemoryStorage::new());
        for attempts in 30..42 {
            source.submit("p", 300.0, attempts);
        }
        let mut shuffled: Vec<ScoreEntry> = source.entries().to_vec();
        shuffled.extend(source.entries().iter().take(3).cloned());
        shuffled.reverse();
        storage.put_raw(LEADERBOARD_KEY, serde_json::to_vec(&shuffled).unwrap());

        let store = open(&storage);

        assert_eq!(store.entries().len(), MAX_ENTRIES);
        assert!(is_ranked(store.entries()));
    }

    #[test]
    fn test_persist_replaces_stored_value() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.submit("Ada", 300.0, 50);

        store.persist(&[]);

        assert!(store.load().is_empty());
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        let mut other = open(&storage);
        other.submit("Ada", 300.0, 50);

        store.reload();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.global_stats().games_won, 1);
    }

    #[test]
    fn test_qualifies() {
        let mut store = open(&MemoryStorage::new());
        assert!(store.qualifies(1.0));
        for _ in 0..MAX_ENTRIES {
            store.submit("p", 300.0, 50);
        }
        assert!(!store.qualifies(21.0));
        assert!(!store.qualifies(3.0));
        assert!(store.qualifies(21.5));
        assert_eq!(store.best().map(|e| e.score()), Some(21.0));
        assert_eq!(store.ranked().map(|(rank, _)| rank).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn board_stays_ranked_and_bounded(
            results in prop::collection::vec((0.0f64..900.0, 1u32..200), 0..40)
        ) {
            let storage = MemoryStorage::new();
            let mut store = open(&storage);
            for (elapsed, attempts) in &results {
                store.submit("p", *elapsed, *attempts);
                prop_assert!(store.entries().len() <= MAX_ENTRIES);
                prop_assert!(is_ranked(store.entries()));
            }
            prop_assert_eq!(store.entries().len(), results.len().min(MAX_ENTRIES));
            let reopened = open(&storage);
            prop_assert_eq!(reopened.entries(), store.entries());
        }

        #[test]
        fn board_contents_ignore_insertion_order(
            results in prop::collection::vec((0.0f64..900.0, 1u32..200), 1..25)
        ) {
            let mut forward = open(&MemoryStorage::new());
            let mut backward = open(&MemoryStorage::new());
            for (elapsed, attempts) in &results {
                forward.submit("p", *elapsed, *attempts);
            }
            for (elapsed, attempts) in results.iter().rev() {
                backward.submit("p", *elapsed, *attempts);
            }
            let keys = |store: &LeaderboardStore| -> Vec<(f64, f64)> {
                store.entries().iter().map(|e| (e.score(), e.tie_breaker())).collect()
            };
            prop_assert_eq!(keys(&forward), keys(&backward));
        }
    }
}
