//! Automatic night pass for participants without a night ability.
//!
//! Once per Night activation whose surfaces ask for it, wait a short delay
//! and submit an empty night action. If the activation is gone by then
//! (the phase moved on, or the player gained a target), or the player
//! already passed it by hand, nothing is sent. A failed pass is retried
//! after the next published frame for the same activation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wolfpack_domain::Activation;

use crate::application::submitter::{ActionSubmitter, SubmitError, SubmitRequest};
use crate::application::sync::{ClientFrame, SyncEngine};

pub const DEFAULT_AUTO_PASS_DELAY: Duration = Duration::from_secs(2);

fn pending_pass(frame: Option<&ClientFrame>) -> Option<Activation> {
    frame
        .filter(|f| f.surfaces.auto_pass())
        .map(|f| f.snapshot.activation())
}

/// Watch published frames and schedule passes. Abort the handle to stop.
pub fn spawn_auto_pass(
    sync: Arc<SyncEngine>,
    submitter: Arc<ActionSubmitter>,
    delay: Duration,
) -> JoinHandle<()> {
    let mut frames = sync.subscribe();
    let (failed_tx, mut failed_rx) = mpsc::unbounded_channel::<Activation>();

    tokio::spawn(async move {
        let mut scheduled: Option<Activation> = None;
        let mut evaluate = true;
        loop {
            if evaluate {
                let due = pending_pass(frames.borrow_and_update().as_deref());
                if let Some(activation) = due.filter(|a| scheduled != Some(*a)) {
                    scheduled = Some(activation);
                    tracing::debug!(
                        day = activation.day,
                        ?delay,
                        "Scheduling automatic night pass"
                    );
                    tokio::spawn(pass_after(
                        Arc::clone(&sync),
                        Arc::clone(&submitter),
                        activation,
                        delay,
                        failed_tx.clone(),
                    ));
                }
            }

            tokio::select! {
                changed = frames.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    evaluate = true;
                }
                Some(activation) = failed_rx.recv() => {
                    // Re-arm on the next frame, not on the one that just failed.
                    if scheduled == Some(activation) {
                        scheduled = None;
                    }
                    evaluate = false;
                }
            }
        }
    })
}

async fn pass_after(
    sync: Arc<SyncEngine>,
    submitter: Arc<ActionSubmitter>,
    activation: Activation,
    delay: Duration,
    failed: mpsc::UnboundedSender<Activation>,
) {
    tokio::time::sleep(delay).await;

    if pending_pass(sync.current_frame().as_deref()) != Some(activation) {
        tracing::debug!(day = activation.day, "Night ended before automatic pass");
        return;
    }
    if submitter.has_passed(activation).await {
        tracing::debug!(day = activation.day, "Night already passed by hand");
        return;
    }
    match submitter.submit(SubmitRequest::NightPass).await {
        Ok(_) => tracing::info!(day = activation.day, "Passed the night automatically"),
        Err(SubmitError::AlreadyPassed) => {
            tracing::debug!(day = activation.day, "Night already passed by hand");
        }
        Err(e) => {
            tracing::warn!(day = activation.day, error = %e, "Automatic night pass failed");
            let _ = failed.send(activation);
        }
    }
}
