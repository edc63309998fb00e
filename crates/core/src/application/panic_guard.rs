// Panic isolation for provider tasks
use std::any::Any;
use tokio::task::JoinHandle;
use tracing::error;

/// Result of a panic-guarded task
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Task completed
    Success(T),
    /// Task panicked
    Panicked(String),
    /// Task was aborted before completing
    Aborted,
}

/// Await a spawned task with panic isolation
///
/// A panic inside the task is caught by the runtime and returned as
/// `PanicGuardResult::Panicked`, so one failing provider cannot take the
/// scan down. Takes the handle by reference so callers can still `abort()`
/// it from a `select!` branch.
///
/// # Example
/// ```text
/// let mut handle = tokio::spawn(async { panic!("boom") });
/// match join_guarded(&mut handle).await {
///     PanicGuardResult::Panicked(msg) => assert_eq!(msg, "boom"),
///     _ => unreachable!(),
/// }
/// ```
pub async fn join_guarded<T>(handle: &mut JoinHandle<T>) -> PanicGuardResult<T> {
    match handle.await {
        Ok(value) => PanicGuardResult::Success(value),
        Err(join_err) if join_err.is_panic() => {
            let panic_msg = panic_message(join_err.into_panic());
            error!(panic_msg = %panic_msg, "Provider task panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
        Err(_) => PanicGuardResult::Aborted,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
