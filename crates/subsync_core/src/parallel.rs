//! Order-preserving parallel map over independent work items.

use rayon::prelude::*;

/// Map `f` over `items` with the given parallelism degree.
///
/// A degree of 1 runs strictly sequentially on the calling thread; anything
/// higher dispatches to a dedicated pool of that many workers. Results are
/// gathered in submission order regardless of completion order. A panicking
/// worker aborts the whole batch.
pub(crate) fn maybe_parallel_map<T, U, F>(
    items: Vec<T>,
    parallelism: usize,
    f: F,
) -> Result<Vec<U>, rayon::ThreadPoolBuildError>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    if parallelism <= 1 {
        return Ok(items.into_iter().map(f).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()?;

    Ok(pool.install(|| items.into_par_iter().map(f).collect()))
}
