use std::thread::JoinHandle;

/// Spawns a dedicated named OS thread for a polling worker loop.
///
/// Busy-polling loops must not run on an async executor, so they get their own thread.
pub fn spawn_worker_thread<F, R>(name: impl Into<String>, f: F) -> std::io::Result<JoinHandle<R>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let name = name.into();
	tracing::debug!(worker = name.as_str(), "worker.spawn_thread");
	std::thread::Builder::new().name(name).spawn(f)
}
