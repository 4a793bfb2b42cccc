//! Command implementations

use indicatif::{ProgressBar, ProgressStyle};

use anfctl_core::{ProgressCallback, ProgressEvent};

pub mod provision;
pub mod status;
pub mod teardown;

/// Spinner wired to core progress events, used while polling a resource
pub fn polling_spinner(action: &str, resource: &str) -> (ProgressBar, ProgressCallback) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap(),
    );
    pb.set_message(format!("{} {}", action, resource));

    let pb_clone = pb.clone();
    let callback: ProgressCallback = Box::new(move |event| match event {
        ProgressEvent::Started { resource } => {
            pb_clone.set_message(format!("Waiting for {}", resource));
        }
        ProgressEvent::Polling { resource, state, .. } => {
            let state = if state.is_empty() {
                "pending".to_string()
            } else {
                state
            };
            pb_clone.set_message(format!("{}: {}", resource, state));
        }
        ProgressEvent::Completed { resource } => {
            pb_clone.finish_with_message(format!("{}: done", resource));
        }
        ProgressEvent::Failed { resource, error } => {
            pb_clone.finish_with_message(format!("{} failed: {}", resource, error));
        }
    });

    (pb, callback)
}
