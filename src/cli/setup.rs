//! Runtime setup for the CLI: the rayon pool used by the evaluation fan-out.

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        // Already configured
        tracing::debug!("Thread pool already configured: {}", e);
    }
}
