//! Randomized multi-user exerciser.
//!
//! One producer (the calling thread) draws tasks uniformly from the ten
//! public sheet operations and feeds them through a bounded crossbeam
//! channel to a pool of user threads. Arguments are drawn against the
//! sheet's shape at submission time; the sheet only grows while the
//! exerciser runs, so every drawn index stays valid.

use std::fmt;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::SheetError;
use tessera_engine::Sheet;

/// Strings written and searched for by the exerciser.
pub const VOCABULARY: [&str; 8] = [
    "hi",
    "my name is",
    "hi",
    "my name is",
    "hi",
    "my name is",
    "chiki chiki",
    "slim shady",
];

// ── Operation ──────────────────────────────────────────────────────

/// The public sheet operations the exerciser draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// [`Sheet::get`].
    Get,
    /// [`Sheet::set`].
    Set,
    /// [`Sheet::search_string`].
    SearchString,
    /// [`Sheet::exchange_rows`].
    ExchangeRows,
    /// [`Sheet::exchange_cols`].
    ExchangeCols,
    /// [`Sheet::search_in_row`].
    SearchInRow,
    /// [`Sheet::search_in_col`].
    SearchInCol,
    /// [`Sheet::search_in_range`].
    SearchInRange,
    /// [`Sheet::insert_row_after`].
    InsertRowAfter,
    /// [`Sheet::insert_col_after`].
    InsertColAfter,
}

impl Operation {
    /// Every operation, in draw order.
    pub const ALL: [Operation; 10] = [
        Operation::Get,
        Operation::Set,
        Operation::SearchString,
        Operation::ExchangeRows,
        Operation::ExchangeCols,
        Operation::SearchInRow,
        Operation::SearchInCol,
        Operation::SearchInRange,
        Operation::InsertRowAfter,
        Operation::InsertColAfter,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::SearchString => "search_string",
            Self::ExchangeRows => "exchange_rows",
            Self::ExchangeCols => "exchange_cols",
            Self::SearchInRow => "search_in_row",
            Self::SearchInCol => "search_in_col",
            Self::SearchInRange => "search_in_range",
            Self::InsertRowAfter => "insert_row_after",
            Self::InsertColAfter => "insert_col_after",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Task ───────────────────────────────────────────────────────────

/// One drawn operation with its arguments.
///
/// Every operation receives the full argument set and uses what it needs.
/// `row2 >= row1` and `col2 >= col1` always hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Which operation to run.
    pub op: Operation,
    /// Value to write or search for.
    pub value: &'static str,
    /// First row argument.
    pub row1: usize,
    /// Second row argument, never below `row1`.
    pub row2: usize,
    /// First column argument.
    pub col1: usize,
    /// Second column argument, never below `col1`.
    pub col2: usize,
}

impl Task {
    /// Draw a task against a sheet of `rows x cols`.
    pub fn draw(rng: &mut impl Rng, rows: usize, cols: usize) -> Self {
        let op = Operation::ALL[rng.random_range(0..Operation::ALL.len())];
        let value = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
        let row1 = rng.random_range(0..rows);
        let row2 = rng.random_range(row1..rows);
        let col1 = rng.random_range(0..cols);
        let col2 = rng.random_range(col1..cols);
        Self {
            op,
            value,
            row1,
            row2,
            col1,
            col2,
        }
    }

    /// Run the task against `sheet`. Returns whether a search found a match.
    pub fn execute(&self, sheet: &Sheet) -> Result<bool, SheetError> {
        let found = match self.op {
            Operation::Get => {
                sheet.get(self.row1, self.col1)?;
                false
            }
            Operation::Set => {
                sheet.set(self.row1, self.col1, self.value)?;
                false
            }
            Operation::SearchString => sheet.search_string(self.value)?.is_some(),
            Operation::ExchangeRows => {
                sheet.exchange_rows(self.row1, self.row2)?;
                false
            }
            Operation::ExchangeCols => {
                sheet.exchange_cols(self.col1, self.col2)?;
                false
            }
            Operation::SearchInRow => sheet.search_in_row(self.row1, self.value)?.is_some(),
            Operation::SearchInCol => sheet.search_in_col(self.col1, self.value)?.is_some(),
            Operation::SearchInRange => sheet
                .search_in_range(
                    to_bound(self.row1),
                    to_bound(self.row2),
                    to_bound(self.col1),
                    to_bound(self.col2),
                    self.value,
                )?
                .is_some(),
            Operation::InsertRowAfter => {
                sheet.insert_row_after(self.row1)?;
                false
            }
            Operation::InsertColAfter => {
                sheet.insert_col_after(self.col1)?;
                false
            }
        };
        Ok(found)
    }
}

fn to_bound(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

// ── ExerciserConfig ────────────────────────────────────────────────

/// Configuration for an [`Exerciser`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciserConfig {
    /// Number of user threads. `None` = auto-detect from available cores.
    pub users: Option<usize>,
    /// Total number of tasks to submit.
    pub tasks: usize,
    /// Seed for the task stream.
    pub seed: u64,
}

impl Default for ExerciserConfig {
    fn default() -> Self {
        Self {
            users: None,
            tasks: 1_000,
            seed: 0,
        }
    }
}

impl ExerciserConfig {
    /// Resolve the actual user count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 256]`. Auto-detection uses the
    /// number of available cores, clamped to `[2, 64]`.
    pub fn resolved_user_count(&self) -> usize {
        match self.users {
            Some(n) => n.clamp(1, 256),
            None => {
                let cpus = thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                cpus.clamp(2, 64)
            }
        }
    }
}

// ── ExerciseReport ─────────────────────────────────────────────────

/// Outcome of an exerciser run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseReport {
    counts: [u64; 10],
    /// Searches that found a match.
    pub searches_found: u64,
    /// Wall-clock time from first submission to last completion.
    pub elapsed: Duration,
}

impl ExerciseReport {
    /// Number of executed tasks of kind `op`.
    pub fn count(&self, op: Operation) -> u64 {
        self.counts[op.index()]
    }

    /// Total number of executed tasks.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn record(&mut self, op: Operation, found: bool) {
        self.counts[op.index()] += 1;
        self.searches_found += u64::from(found);
    }

    fn merge(&mut self, other: &ExerciseReport) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
        self.searches_found += other.searches_found;
    }
}

impl fmt::Display for ExerciseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tasks in {:.3}s ({} searches found a match)",
            self.total(),
            self.elapsed.as_secs_f64(),
            self.searches_found
        )?;
        for op in Operation::ALL {
            writeln!(f, "  {:<17} {:>8}", op.name(), self.count(op))?;
        }
        Ok(())
    }
}

// ── ExerciseError ──────────────────────────────────────────────────

/// Errors that end an exerciser run early.
#[derive(Debug)]
pub enum ExerciseError {
    /// A user thread could not be started.
    Spawn(io::Error),
    /// A sheet operation failed.
    Sheet {
        /// The task that failed.
        task: Task,
        /// The error the sheet returned.
        error: SheetError,
    },
    /// A user thread panicked.
    UserPanicked,
}

impl fmt::Display for ExerciseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn user thread: {e}"),
            Self::Sheet { task, error } => write!(f, "{} failed: {error}", task.op),
            Self::UserPanicked => write!(f, "a user thread panicked"),
        }
    }
}

impl std::error::Error for ExerciseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Sheet { error, .. } => Some(error),
            Self::UserPanicked => None,
        }
    }
}

// ── Exerciser ──────────────────────────────────────────────────────

/// Drives a [`Sheet`] from many threads with a seeded random task stream.
pub struct Exerciser {
    config: ExerciserConfig,
}

impl Exerciser {
    /// Create an exerciser for `config`.
    pub fn new(config: ExerciserConfig) -> Self {
        Self { config }
    }

    /// The configuration this exerciser runs with.
    pub fn config(&self) -> &ExerciserConfig {
        &self.config
    }

    /// Submit every task and wait for all of them to finish.
    ///
    /// The task stream depends only on the seed and on the sheet's shape
    /// at each submission; execution order across users is not
    /// deterministic.
    pub fn run(&self, sheet: &Sheet) -> Result<ExerciseReport, ExerciseError> {
        let users = self.config.resolved_user_count();
        let started = Instant::now();
        tracing::debug!(
            "exercising sheet {} with {} users, {} tasks",
            sheet.shape(),
            users,
            self.config.tasks
        );

        let mut report = thread::scope(|scope| {
            let (task_tx, task_rx) = crossbeam_channel::bounded::<Task>(users * 2);
            let mut handles = Vec::with_capacity(users);
            for i in 0..users {
                let task_rx = task_rx.clone();
                let handle = thread::Builder::new()
                    .name(format!("tessera-user-{i}"))
                    .spawn_scoped(scope, move || user_loop(sheet, task_rx))
                    .map_err(ExerciseError::Spawn)?;
                handles.push(handle);
            }
            drop(task_rx);

            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
            for _ in 0..self.config.tasks {
                let shape = sheet.shape();
                let task = Task::draw(&mut rng, shape.rows, shape.cols);
                if task_tx.send(task).is_err() {
                    // Every user has stopped; the join below reports why.
                    break;
                }
            }
            drop(task_tx);

            let mut report = ExerciseReport::default();
            let mut first_error = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(partial)) => report.merge(&partial),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(ExerciseError::UserPanicked);
                    }
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(report),
            }
        })?;

        report.elapsed = started.elapsed();
        tracing::debug!(
            "exercise finished: {} tasks in {:?}, final shape {}",
            report.total(),
            report.elapsed,
            sheet.shape()
        );
        Ok(report)
    }
}

/// Execute tasks until the channel closes or a task fails.
fn user_loop(sheet: &Sheet, task_rx: Receiver<Task>) -> Result<ExerciseReport, ExerciseError> {
    let mut report = ExerciseReport::default();
    while let Ok(task) = task_rx.recv() {
        match task.execute(sheet) {
            Ok(found) => report.record(task.op, found),
            Err(error) => {
                tracing::warn!("{} failed: {}", task.op, error);
                return Err(ExerciseError::Sheet { task, error });
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawn_tasks_respect_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1_000 {
            let task = Task::draw(&mut rng, 5, 7);
            assert!(task.row1 <= task.row2 && task.row2 < 5);
            assert!(task.col1 <= task.col2 && task.col2 < 7);
            assert!(VOCABULARY.contains(&task.value));
        }
    }

    #[test]
    fn every_operation_is_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = [false; 10];
        for _ in 0..1_000 {
            seen[Task::draw(&mut rng, 3, 3).op.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn user_count_clamps() {
        let cfg = ExerciserConfig {
            users: Some(0),
            ..ExerciserConfig::default()
        };
        assert_eq!(cfg.resolved_user_count(), 1);

        let cfg = ExerciserConfig {
            users: Some(10_000),
            ..ExerciserConfig::default()
        };
        assert_eq!(cfg.resolved_user_count(), 256);

        let auto = ExerciserConfig::default().resolved_user_count();
        assert!((2..=64).contains(&auto));
    }

    #[test]
    fn execute_runs_the_named_operation() {
        let sheet = Sheet::with_shape(3, 3).unwrap();
        let task = Task {
            op: Operation::Set,
            value: "hi",
            row1: 1,
            row2: 2,
            col1: 0,
            col2: 2,
        };
        assert!(!task.execute(&sheet).unwrap());
        assert_eq!(sheet.get(1, 0).unwrap(), "hi");

        let search = Task {
            op: Operation::SearchInRange,
            ..task.clone()
        };
        assert!(search.execute(&sheet).unwrap());

        let insert = Task {
            op: Operation::InsertColAfter,
            ..task
        };
        insert.execute(&sheet).unwrap();
        assert_eq!(sheet.shape().cols, 4);
    }

    #[test]
    fn report_display_lists_every_operation() {
        let mut report = ExerciseReport::default();
        report.record(Operation::Get, false);
        report.record(Operation::SearchString, true);
        let text = report.to_string();
        assert!(text.starts_with("2 tasks"));
        for op in Operation::ALL {
            assert!(text.contains(op.name()));
        }
    }
}
