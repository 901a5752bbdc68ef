//! How sequences reach the sequencer.
//!
//! [`SequencePlayer::Direct`] plays in the caller's task, so two transitions
//! dispatched close together interleave their commands on the shared light
//! group. [`SequencePlayer::Queued`] hands sequences to a single worker task
//! that plays them one after another.

use monitor_core::color::ActionSequence;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actuator::Actuator;
use crate::sequencer::Sequencer;

/// Sequences buffered before `play` starts waiting on the worker.
const QUEUE_CAPACITY: usize = 16;

pub enum SequencePlayer<A> {
    /// Play immediately; concurrent plays are not mutually excluded.
    Direct(Sequencer<A>),
    /// Enqueue for the single serial worker.
    Queued(mpsc::Sender<ActionSequence>),
}

impl<A> Clone for SequencePlayer<A> {
    fn clone(&self) -> Self {
        match self {
            SequencePlayer::Direct(sequencer) => SequencePlayer::Direct(sequencer.clone()),
            SequencePlayer::Queued(tx) => SequencePlayer::Queued(tx.clone()),
        }
    }
}

impl<A: Actuator> SequencePlayer<A> {
    pub fn direct(sequencer: Sequencer<A>) -> Self {
        SequencePlayer::Direct(sequencer)
    }

    /// Spawn the serial worker and return a player that feeds it.
    ///
    /// The worker exits once every clone of the returned player is dropped
    /// and the queue has drained.
    pub fn queued(sequencer: Sequencer<A>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<ActionSequence>(QUEUE_CAPACITY);

        let worker = tokio::spawn(async move {
            while let Some(sequence) = rx.recv().await {
                sequencer.play(&sequence).await;
            }
            tracing::debug!("sequence queue closed; worker exiting");
        });

        (SequencePlayer::Queued(tx), worker)
    }

    /// Play `sequence`.
    ///
    /// `Direct` returns once the sequence has finished; `Queued` returns as
    /// soon as the sequence is accepted by the queue.
    pub async fn play(&self, sequence: ActionSequence) {
        match self {
            SequencePlayer::Direct(sequencer) => sequencer.play(&sequence).await,
            SequencePlayer::Queued(tx) => {
                if let Err(e) = tx.send(sequence).await {
                    tracing::warn!(error = %e, "sequence queue closed; dropping sequence");
                }
            }
        }
    }
}
