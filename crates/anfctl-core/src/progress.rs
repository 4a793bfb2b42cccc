//! Progress tracking and polling for long-running ARM operations
//!
//! ARM create/update calls return immediately with a `provisioningState`
//! that must be polled to completion, and deletes must be polled until the
//! resource stops existing. Both pollers emit optional progress events for
//! UI updates.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{CoreError, Result};

/// Progress events emitted while waiting on a resource
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Waiting has begun for the named resource
    Started { resource: String },
    /// Polling iteration with the current provisioning state
    Polling {
        resource: String,
        state: String,
        elapsed: Duration,
    },
    /// The resource reached its desired state
    Completed { resource: String },
    /// The provider reported failure
    Failed { resource: String, error: String },
}

/// Callback type for progress updates; the CLI hangs a spinner off this
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Poll `fetch` until the resource's provisioning state is terminal.
///
/// `state_of` extracts the provisioning state from a fetched resource.
/// `Succeeded` completes the poll; `Failed`/`Error` fails it; anything else
/// (including a missing state) sleeps `interval` and retries until
/// `timeout` elapses.
pub async fn poll_provisioning<T, F, Fut>(
    resource: &str,
    fetch: F,
    state_of: impl Fn(&T) -> Option<&str>,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            resource: resource.to_string(),
        },
    );

    loop {
        let elapsed = start.elapsed();
        if elapsed > timeout {
            return Err(CoreError::PollTimeout(timeout));
        }

        let current = fetch().await?;
        let state = state_of(&current).unwrap_or("").to_string();

        emit(
            &on_progress,
            ProgressEvent::Polling {
                resource: resource.to_string(),
                state: state.clone(),
                elapsed,
            },
        );

        match state.as_str() {
            "Succeeded" => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        resource: resource.to_string(),
                    },
                );
                return Ok(current);
            }
            "Failed" | "Error" => {
                let error = format!("provider reported state '{}' for {}", state, resource);
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        resource: resource.to_string(),
                        error: error.clone(),
                    },
                );
                return Err(CoreError::ProvisioningFailed(error));
            }
            _ => {
                // Still creating/updating/deleting
                tokio::time::sleep(interval).await;
            }
        }
    }
}

/// Poll `fetch` until it reports `NotFound`.
///
/// This is the deletion-confirmation loop: ARM acknowledges a delete before
/// the resource is actually gone. The loop terminates exactly when the
/// provider reports not-found; any other error propagates immediately.
pub async fn poll_until_absent<T, F, Fut>(
    resource: &str,
    fetch: F,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            resource: resource.to_string(),
        },
    );

    loop {
        let elapsed = start.elapsed();
        if elapsed > timeout {
            return Err(CoreError::PollTimeout(timeout));
        }

        match fetch().await {
            Ok(_) => {
                emit(
                    &on_progress,
                    ProgressEvent::Polling {
                        resource: resource.to_string(),
                        state: "Deleting".to_string(),
                        elapsed,
                    },
                );
                tokio::time::sleep(interval).await;
            }
            Err(e) if e.is_not_found() => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        resource: resource.to_string(),
                    },
                );
                return Ok(());
            }
            Err(e) => {
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        resource: resource.to_string(),
                        error: e.to_string(),
                    },
                );
                return Err(e);
            }
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn short() -> (Duration, Duration) {
        (Duration::from_millis(500), Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_poll_provisioning_completes_on_succeeded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (timeout, interval) = short();

        let calls_in = calls.clone();
        let result = poll_provisioning(
            "acct",
            move || {
                let n = calls_in.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(if n < 2 {
                        "Creating".to_string()
                    } else {
                        "Succeeded".to_string()
                    })
                }
            },
            |s: &String| Some(s.as_str()),
            timeout,
            interval,
            None,
        )
        .await;

        assert_eq!(result.unwrap(), "Succeeded");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_provisioning_fails_on_failed_state() {
        let (timeout, interval) = short();
        let result = poll_provisioning(
            "pool",
            || async { Ok("Failed".to_string()) },
            |s: &String| Some(s.as_str()),
            timeout,
            interval,
            None,
        )
        .await;

        match result {
            Err(CoreError::ProvisioningFailed(msg)) => assert!(msg.contains("pool")),
            other => panic!("expected ProvisioningFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_poll_provisioning_times_out() {
        let result = poll_provisioning(
            "vol",
            || async { Ok("Creating".to_string()) },
            |s: &String| Some(s.as_str()),
            Duration::from_millis(20),
            Duration::from_millis(5),
            None,
        )
        .await;

        assert!(matches!(result, Err(CoreError::PollTimeout(_))));
    }

    #[tokio::test]
    async fn test_poll_until_absent_stops_on_not_found() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (timeout, interval) = short();

        let calls_in = calls.clone();
        let result = poll_until_absent(
            "vol",
            move || {
                let n = calls_in.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Ok(())
                    } else {
                        Err(CoreError::NotFound {
                            resource: "vol".to_string(),
                        })
                    }
                }
            },
            timeout,
            interval,
            None,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_until_absent_propagates_other_errors() {
        let (timeout, interval) = short();
        let result = poll_until_absent(
            "vol",
            || async {
                Err::<(), _>(CoreError::Api {
                    status: 500,
                    code: "InternalServerError".to_string(),
                    message: "boom".to_string(),
                })
            },
            timeout,
            interval,
            None,
        )
        .await;

        assert!(matches!(result, Err(CoreError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_progress_events_are_emitted_in_order() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let events_in = events.clone();
        let (timeout, interval) = short();

        poll_provisioning(
            "acct",
            || async { Ok("Succeeded".to_string()) },
            |s: &String| Some(s.as_str()),
            timeout,
            interval,
            Some(Box::new(move |event| {
                events_in.lock().unwrap().push(event);
            })),
        )
        .await
        .unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events[0], ProgressEvent::Started { .. }));
        assert!(matches!(events[1], ProgressEvent::Polling { .. }));
        assert!(matches!(
            events.last().unwrap(),
            ProgressEvent::Completed { .. }
        ));
    }
}
