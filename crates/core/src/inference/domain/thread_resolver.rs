use crate::shared::constants::FALLBACK_MAX_THREADS;

/// Clamps a requested worker count into `[1, max_available]`.
///
/// A non-positive request means "use everything available".
pub fn resolve_threads(requested: i32, max_available: usize) -> usize {
    let ceiling = max_available.max(1);
    if requested <= 0 {
        return ceiling;
    }
    (requested as usize).clamp(1, ceiling)
}

/// Thread count for one request: the per-call override when positive, otherwise
/// the session default.
pub fn threads_for_request(thread_override: i32, max_threads: usize, default_threads: usize) -> usize {
    if thread_override > 0 {
        resolve_threads(thread_override, max_threads)
    } else {
        default_threads
    }
}

/// Hardware concurrency reported by the host, or the fallback when unavailable.
pub fn host_max_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_MAX_THREADS)
}
