//! Attribute scheduler
//!
//! Runs one boundary search per eligible attribute on a fixed-size worker
//! pool:
//!
//! ```text
//!            task queue                 result channel
//! driver --> [(i, column), ...] --> worker 0 --+
//!                                   worker 1 --+--> (i, scheme) --> driver --> SchemeStore[i]
//!                                   ...      --+
//! ```
//!
//! Each task owns an immutable copy of its attribute column, so workers share
//! nothing with the dataset. The driver waits for the results until a
//! deadline; tasks that have not reported by then leave their slot empty and
//! their workers are detached.

use std::{
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Mutex, PoisonError,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

use caim_dataset::DatasetView;
use caim_stats::quanta::OccurrenceTable;
use tracing::{debug, warn};

use crate::{scheme::SchemeStore, search::BoundarySearch};

/// Values of one attribute together with the class of every row.
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    /// Attribute position in the dataset
    pub index: usize,
    pub name: String,
    /// Per-row values, `None` if missing
    pub values: Vec<Option<f64>>,
    /// Per-row class index, `None` if the class is missing
    pub classes: Arc<[Option<usize>]>,
    pub num_classes: usize,
}

impl AttributeColumn {
    /// Copies attribute `index` out of `view`.
    ///
    /// # Panics
    ///
    /// Panics if `classes` does not have one entry per row.
    pub fn from_view<V>(
        view: &V,
        index: usize,
        classes: Arc<[Option<usize>]>,
        num_classes: usize,
    ) -> Self
    where
        V: DatasetView + ?Sized,
    {
        assert_eq!(classes.len(), view.num_rows(), "one class per row");
        Self {
            index,
            name: view.attribute(index).name.clone(),
            values: (0..view.num_rows())
                .map(|row| view.number(row, index))
                .collect(),
            classes,
            num_classes,
        }
    }

    /// Occurrence table of the rows where both the value and the class are
    /// present.
    #[must_use]
    pub fn occurrence_table(&self) -> OccurrenceTable {
        let pairs = self
            .values
            .iter()
            .zip(self.classes.iter())
            .filter_map(|(value, class)| Some(((*class)?, (*value)?)));
        OccurrenceTable::from_pairs(self.num_classes, pairs)
    }
}

/// Fixed-size pool of worker threads with a bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    threads: NonZeroUsize,
    timeout: Duration,
}

impl WorkerPool {
    /// Creates a pool of `threads` workers, or one per available core.
    #[must_use]
    pub fn new(threads: Option<NonZeroUsize>, timeout: Duration) -> Self {
        let threads = threads
            .or_else(|| thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);
        Self { threads, timeout }
    }

    #[must_use]
    pub fn threads(&self) -> NonZeroUsize {
        self.threads
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `work` on every task and returns the results in task order.
    ///
    /// At most `threads` workers are started, never more than there are
    /// tasks. A result is `None` if its task panicked or did not finish
    /// before the timeout. A panicking task does not stop its worker.
    pub fn execute<T, R, F>(&self, tasks: Vec<T>, work: F) -> Vec<Option<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let num_tasks = tasks.len();
        let mut results = (0..num_tasks).map(|_| None).collect::<Vec<_>>();
        if num_tasks == 0 {
            return results;
        }

        let (task_tx, task_rx) = mpsc::channel();
        for task in tasks.into_iter().enumerate() {
            task_tx.send(task).expect("task queue is open");
        }
        drop(task_tx);

        let task_rx = Arc::new(Mutex::new(task_rx));
        let work = Arc::new(work);
        let (result_tx, result_rx) = mpsc::channel();
        let num_workers = self.threads.get().min(num_tasks);
        for _ in 0..num_workers {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            let work = Arc::clone(&work);
            thread::spawn(move || worker(&task_rx, &result_tx, &*work));
        }
        drop(result_tx);
        debug!(tasks = num_tasks, workers = num_workers, "dispatched");

        let deadline = Instant::now().checked_add(self.timeout);
        let mut received = 0;
        while received < num_tasks {
            let message = match deadline {
                Some(deadline) => {
                    result_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => result_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match message {
                Ok((index, Some(result))) => {
                    results[index] = Some(result);
                    received += 1;
                }
                Ok((index, None)) => {
                    warn!(task = index, "task panicked");
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        timeout = ?self.timeout,
                        unfinished = num_tasks - received,
                        "workers did not finish in time"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(unfinished = num_tasks - received, "workers exited without reporting");
                    break;
                }
            }
        }
        results
    }
}

fn worker<T, R>(
    tasks: &Mutex<mpsc::Receiver<(usize, T)>>,
    results: &mpsc::Sender<(usize, Option<R>)>,
    work: &dyn Fn(T) -> R,
) {
    loop {
        let next = tasks.lock().unwrap_or_else(PoisonError::into_inner).recv();
        let Ok((index, task)) = next else {
            return;
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| work(task))).ok();
        if results.send((index, result)).is_err() {
            return;
        }
    }
}

/// Searches every column on `pool` and fills their slots in `store`.
///
/// Slots of columns without values, or whose search did not finish, are left
/// empty. Returns the number of slots filled.
///
/// # Panics
///
/// Panics if a column's slot was not reserved in `store`.
pub fn search_all(
    pool: &WorkerPool,
    search: Arc<dyn BoundarySearch>,
    columns: Vec<AttributeColumn>,
    store: &mut SchemeStore,
) -> usize {
    let names = columns
        .iter()
        .map(|column| (column.index, column.name.clone()))
        .collect::<Vec<_>>();

    let results = pool.execute(columns, move |column| {
        debug!(attribute = %column.name, "searching boundaries");
        search.build_scheme(&column.occurrence_table())
    });

    let mut filled = 0;
    for ((index, name), result) in names.into_iter().zip(results) {
        match result {
            Some(Some(scheme)) => {
                debug!(
                    attribute = %name,
                    intervals = scheme.num_intervals(),
                    score = scheme.score(),
                    "fitted"
                );
                store.fill(index, scheme);
                filled += 1;
            }
            Some(None) => warn!(attribute = %name, "no values; treated as a single bin"),
            None => warn!(attribute = %name, "search did not finish; treated as a single bin"),
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use caim_dataset::{Attribute, Dataset, Value};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{scheme::AttributeSlot, search::CaimSearch};

    fn pool(threads: usize) -> WorkerPool {
        WorkerPool::new(NonZeroUsize::new(threads), Duration::from_secs(60))
    }

    #[test]
    fn test_results_keep_task_order() {
        let tasks = (0..50).collect::<Vec<u64>>();
        let results = pool(4).execute(tasks, |n| n * n);
        assert_eq!(results, (0..50).map(|n| Some(n * n)).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_tasks() {
        let results = pool(4).execute(Vec::<u32>::new(), |n| n);
        assert!(results.is_empty());
    }

    #[test]
    fn test_timeout_leaves_results_empty() {
        let pool = WorkerPool::new(NonZeroUsize::new(2), Duration::from_millis(20));
        let results = pool.execute(vec![0, 1], |n: u32| {
            thread::sleep(Duration::from_secs(2));
            n
        });
        assert_eq!(results, vec![None, None]);
    }

    #[test]
    fn test_panicking_task_does_not_stop_its_worker() {
        let results = pool(1).execute(vec![1, 0, 2, 3], |n: u32| {
            assert!(n != 0, "boom");
            n
        });
        assert_eq!(results, vec![Some(1), None, Some(2), Some(3)]);
    }

    #[test]
    fn test_unbounded_timeout() {
        let pool = WorkerPool::new(NonZeroUsize::new(2), Duration::MAX);
        assert_eq!(pool.execute(vec![1, 2], |n: u32| n + 1), vec![Some(2), Some(3)]);
    }

    fn random_dataset(seed: u64) -> Dataset {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let attributes = vec![
            Attribute::numeric("a"),
            Attribute::numeric("b"),
            Attribute::numeric("c"),
            Attribute::nominal("class", ["x", "y", "z"]),
        ];
        let rows = (0..120)
            .map(|_| {
                let class = rng.random_range(0..3_u32);
                let mut row = (0..3)
                    .map(|_| {
                        let value = f64::from(class) + rng.random_range(-1.0..1.0);
                        Value::from((value * 10.0).round() / 10.0)
                    })
                    .collect::<Vec<_>>();
                row.push(Value::from(["x", "y", "z"][class as usize]));
                row
            })
            .collect();
        Dataset::new("random", attributes, rows).unwrap()
    }

    fn fit_store(dataset: &Dataset, threads: usize) -> SchemeStore {
        let class_index = 3;
        let labels = dataset.nominal_values(class_index).unwrap();
        let classes = (0..dataset.num_rows())
            .map(|row| {
                let label = dataset.label(row, class_index)?;
                labels.iter().position(|l| l == label)
            })
            .collect::<Arc<[_]>>();
        let mut store = SchemeStore::new(dataset.num_attributes());
        let columns = (0..3)
            .map(|index| {
                store.reserve(index);
                AttributeColumn::from_view(dataset, index, Arc::clone(&classes), labels.len())
            })
            .collect();
        let filled = search_all(&pool(threads), Arc::new(CaimSearch), columns, &mut store);
        assert_eq!(filled, 3);
        store
    }

    #[test]
    fn test_pool_size_does_not_change_results() {
        let dataset = random_dataset(7);
        let single = fit_store(&dataset, 1);
        let many = fit_store(&dataset, 8);
        assert_eq!(single, many);
        assert_eq!(single.slot(3), &AttributeSlot::Skipped);
    }

    #[test]
    fn test_missing_values_leave_slot_empty() {
        let dataset = Dataset::new(
            "missing",
            vec![Attribute::numeric("x"), Attribute::nominal("class", ["a"])],
            vec![
                vec![Value::Missing, Value::from("a")],
                vec![Value::Missing, Value::from("a")],
            ],
        )
        .unwrap();
        let classes = Arc::from(vec![Some(0), Some(0)]);
        let column = AttributeColumn::from_view(&dataset, 0, classes, 1);
        assert!(column.occurrence_table().is_empty());

        let mut store = SchemeStore::new(2);
        store.reserve(0);
        let filled = search_all(&pool(2), Arc::new(CaimSearch), vec![column], &mut store);
        assert_eq!(filled, 0);
        assert_eq!(store.slot(0), &AttributeSlot::Empty);
    }

    #[test]
    fn test_rows_with_missing_class_are_ignored() {
        let dataset = Dataset::new(
            "partial",
            vec![Attribute::numeric("x"), Attribute::nominal("class", ["a", "b"])],
            vec![
                vec![Value::from(1.0), Value::from("a")],
                vec![Value::from(100.0), Value::Missing],
                vec![Value::from(3.0), Value::from("b")],
            ],
        )
        .unwrap();
        let classes = Arc::from(vec![Some(0), None, Some(1)]);
        let table = AttributeColumn::from_view(&dataset, 0, classes, 2).occurrence_table();
        assert_eq!(table.values(), &[1.0, 3.0]);
    }
}
