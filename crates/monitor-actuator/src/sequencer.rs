//! Plays action sequences on an actuator, one step at a time.

use std::sync::Arc;

use monitor_core::color::ActionSequence;

use crate::actuator::Actuator;

/// Drives an [`Actuator`] through an [`ActionSequence`].
///
/// Concurrent calls to [`Sequencer::play`] are not serialized against each
/// other; their commands interleave on the shared target. Wrap the sequencer
/// in [`SequencePlayer::queued`](crate::player::SequencePlayer::queued) to
/// play sequences strictly one after another.
pub struct Sequencer<A> {
    actuator: Arc<A>,
}

impl<A> Clone for Sequencer<A> {
    fn clone(&self) -> Self {
        Self {
            actuator: Arc::clone(&self.actuator),
        }
    }
}

impl<A: Actuator> Sequencer<A> {
    pub fn new(actuator: Arc<A>) -> Self {
        Self { actuator }
    }

    /// Play every step in order, holding each for at least `sequence.dwell`.
    ///
    /// A failed step is logged and skipped; it is neither retried nor does it
    /// abort the remaining steps.
    pub async fn play(&self, sequence: &ActionSequence) {
        tracing::debug!(steps = sequence.len(), dwell = ?sequence.dwell, "playing sequence");

        for (index, step) in sequence.steps.iter().enumerate() {
            let xy = step.color.to_xy();
            if let Err(e) = self.actuator.set_xy(xy).await {
                tracing::warn!(step = index, error = %e, "actuator step failed; continuing");
            }
            tokio::time::sleep(sequence.dwell).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use monitor_core::color::{Color, Xy};
    use monitor_core::error::{MonitorError, Result};

    /// Records every command with the instant it arrived; optionally fails
    /// the command at `fail_at`.
    #[derive(Default)]
    pub(crate) struct RecordingActuator {
        pub(crate) commands: Mutex<Vec<(Xy, Instant)>>,
        pub(crate) fail_at: Option<usize>,
    }

    impl RecordingActuator {
        pub(crate) fn xys(&self) -> Vec<Xy> {
            self.commands.lock().unwrap().iter().map(|(xy, _)| *xy).collect()
        }
    }

    impl Actuator for RecordingActuator {
        async fn set_xy(&self, xy: Xy) -> Result<()> {
            let mut commands = self.commands.lock().unwrap();
            let index = commands.len();
            commands.push((xy, Instant::now()));
            if self.fail_at == Some(index) {
                return Err(MonitorError::Actuator("bridge unreachable".to_string()));
            }
            Ok(())
        }
    }

    fn rgb_sequence(dwell: Duration) -> ActionSequence {
        ActionSequence::from_rgb(
            &[
                [255.0, 0.0, 0.0],
                [0.0, 255.0, 0.0],
                [0.0, 0.0, 255.0],
                [100.0, 100.0, 100.0],
            ],
            dwell,
        )
    }

    #[tokio::test]
    async fn test_steps_transmitted_in_order() {
        let actuator = Arc::new(RecordingActuator::default());
        let sequencer = Sequencer::new(Arc::clone(&actuator));
        let sequence = rgb_sequence(Duration::from_millis(1));

        sequencer.play(&sequence).await;

        let expected: Vec<Xy> = sequence.steps.iter().map(|s| s.color.to_xy()).collect();
        assert_eq!(actuator.xys(), expected);
    }

    #[tokio::test]
    async fn test_total_time_is_at_least_steps_times_dwell() {
        let actuator = Arc::new(RecordingActuator::default());
        let sequencer = Sequencer::new(Arc::clone(&actuator));
        let dwell = Duration::from_millis(20);
        let sequence = rgb_sequence(dwell);

        let started = Instant::now();
        sequencer.play(&sequence).await;
        assert!(started.elapsed() >= dwell * 4);

        // Consecutive commands are spaced by at least one dwell.
        let commands = actuator.commands.lock().unwrap();
        for pair in commands.windows(2) {
            assert!(pair[1].1.duration_since(pair[0].1) >= dwell);
        }
    }

    #[tokio::test]
    async fn test_failed_step_does_not_abort_sequence() {
        let actuator = Arc::new(RecordingActuator {
            fail_at: Some(1),
            ..Default::default()
        });
        let sequencer = Sequencer::new(Arc::clone(&actuator));

        sequencer.play(&rgb_sequence(Duration::from_millis(1))).await;

        // Step 1 failed, but all four were attempted exactly once.
        assert_eq!(actuator.xys().len(), 4);
    }

    #[tokio::test]
    async fn test_single_step_red() {
        let actuator = Arc::new(RecordingActuator::default());
        let sequencer = Sequencer::new(Arc::clone(&actuator));
        let red = ActionSequence::new(
            vec![Color::rgb(255.0, 0.0, 0.0).into()],
            Duration::from_millis(1),
        );

        sequencer.play(&red).await;

        let xys = actuator.xys();
        assert_eq!(xys.len(), 1);
        assert!((xys[0].x - 0.64).abs() < 1e-3);
        assert!((xys[0].y - 0.33).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_empty_sequence_sends_nothing() {
        let actuator = Arc::new(RecordingActuator::default());
        let sequencer = Sequencer::new(Arc::clone(&actuator));
        sequencer
            .play(&ActionSequence::new(vec![], Duration::from_millis(50)))
            .await;
        assert!(actuator.xys().is_empty());
    }
}
