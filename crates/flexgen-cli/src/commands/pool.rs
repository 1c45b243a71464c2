//! Worker pool for per-file work.

use crossbeam::channel;

/// Run `work` over `items` on up to `jobs` threads. Results come back in
/// input order.
pub fn map_parallel<T, R, F>(items: Vec<T>, jobs: usize, work: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let total = items.len();
    let jobs = jobs.clamp(1, total.max(1));

    let (task_tx, task_rx) = channel::unbounded::<(usize, T)>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, R)>();
    for task in items.into_iter().enumerate() {
        let _ = task_tx.send(task);
    }
    drop(task_tx);

    tracing::debug!(files = total, workers = jobs, "starting workers");
    std::thread::scope(|scope| {
        for _ in 0..jobs {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let work = &work;
            scope.spawn(move || {
                for (index, item) in task_rx {
                    let _ = result_tx.send((index, work(item)));
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
    for (index, result) in result_rx {
        results[index] = Some(result);
    }
    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_input_order() {
        let items: Vec<u64> = (0..50).collect();
        let results = map_parallel(items, 4, |n| {
            std::thread::sleep(std::time::Duration::from_micros((50 - n) * 10));
            n * 2
        });
        assert_eq!(results, (0..50).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_jobs_and_empty_input() {
        assert_eq!(map_parallel(vec![1, 2, 3], 0, |n| n + 1), vec![2, 3, 4]);
        assert!(map_parallel(Vec::<u8>::new(), 8, |n| n).is_empty());
    }
}
