/// Returns the number of logical CPU cores available to the current process.
///
/// Delegates to [`std::thread::available_parallelism`], which honours OS-level
/// CPU affinity masks where supported. If the query fails the fallback of
/// [`crate::config::NB_WORKERS_DEFAULT`] prevents callers from creating
/// zero-sized worker pools.
pub fn count_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(crate::config::NB_WORKERS_DEFAULT)
}
