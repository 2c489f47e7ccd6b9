//! Concurrency helper: limit how many independent work items run in parallel.

use rayon::prelude::*;

/// Run `f` on every item with at most `limit` in flight. `limit <= 1` runs in
/// input order on the calling thread. Items are independent: `f` reports its own
/// outcome and a failing item never stops the rest.
///
/// Items run on a private pool of `limit` threads, so a slow item only holds its
/// own thread. If that pool cannot be built, items run in chunks of `limit` on the
/// global pool, and each chunk waits for its slowest item.
pub fn for_each_limited<T, F>(items: &[T], limit: usize, f: F)
where
    T: Sync,
    F: Sync + Fn(&T),
{
    if limit <= 1 {
        items.iter().for_each(&f);
        return;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(limit).build() {
        Ok(pool) => pool.install(|| items.par_iter().for_each(&f)),
        Err(e) => {
            tracing::warn!(limit, error = %e, "thread pool unavailable; running in chunks");
            for chunk in items.chunks(limit) {
                chunk.par_iter().for_each(&f);
            }
        }
    }
}
