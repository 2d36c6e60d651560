//! Staged overlay transitions.

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};

use crate::settings::Settings;

/// Identifies one overlay lifecycle. Deferred messages carrying an older
/// ticket are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl Ticket {
    pub fn next(self) -> Ticket {
        Ticket(self.0 + 1)
    }
}

/// Deferred stages of a close, in the order they fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseStage {
    /// Drop the overlay's visible state.
    Hide,
    /// Mark the overlay hidden.
    MarkHidden,
    /// Stop displaying the overlay and clear its content.
    Teardown,
}

/// Close stages with their offsets from the close request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseSchedule {
    pub ticket: Ticket,
    pub stages: Vec<(Duration, CloseStage)>,
}

impl CloseSchedule {
    pub fn new(ticket: Ticket, settings: &Settings) -> Self {
        let mut stages = vec![
            (Duration::from_millis(settings.close_hide_ms), CloseStage::Hide),
            (
                Duration::from_millis(settings.close_mark_hidden_ms),
                CloseStage::MarkHidden,
            ),
            (
                Duration::from_millis(settings.close_teardown_ms),
                CloseStage::Teardown,
            ),
        ];
        // Offsets are absolute; keep stage order even if a page configures them oddly.
        let mut last = Duration::ZERO;
        for (offset, _) in stages.iter_mut() {
            *offset = (*offset).max(last);
            last = *offset;
        }
        CloseSchedule { ticket, stages }
    }

    /// Stream yielding each stage once its offset has elapsed.
    pub fn into_stream(self) -> impl Stream<Item = (Ticket, CloseStage)> + Send + 'static {
        let ticket = self.ticket;
        let mut previous = Duration::ZERO;
        let steps: Vec<(Duration, CloseStage)> = self
            .stages
            .into_iter()
            .map(|(offset, stage)| {
                let wait = offset.saturating_sub(previous);
                previous = offset;
                (wait, stage)
            })
            .collect();

        stream::iter(steps).then(move |(wait, stage)| async move {
            tokio::time::sleep(wait).await;
            (ticket, stage)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_matches_presentation_timings() {
        let schedule = CloseSchedule::new(Ticket(3), &Settings::default());
        assert_eq!(schedule.ticket, Ticket(3));
        assert_eq!(
            schedule.stages,
            vec![
                (Duration::from_millis(500), CloseStage::Hide),
                (Duration::from_millis(600), CloseStage::MarkHidden),
                (Duration::from_millis(900), CloseStage::Teardown),
            ]
        );
    }

    #[test]
    fn offsets_never_run_backwards() {
        let settings = Settings {
            close_hide_ms: 700,
            close_mark_hidden_ms: 100,
            ..Settings::default()
        };
        let schedule = CloseSchedule::new(Ticket(0), &settings);
        let offsets: Vec<u128> = schedule.stages.iter().map(|(d, _)| d.as_millis()).collect();
        assert_eq!(offsets, vec![700, 700, 900]);
    }

    #[test]
    fn stream_emits_stages_in_order() {
        let settings = Settings {
            close_hide_ms: 1,
            close_mark_hidden_ms: 2,
            close_teardown_ms: 3,
            ..Settings::default()
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("failed to build runtime");

        let emitted: Vec<(Ticket, CloseStage)> = runtime.block_on(
            CloseSchedule::new(Ticket(7), &settings)
                .into_stream()
                .collect(),
        );

        assert_eq!(
            emitted,
            vec![
                (Ticket(7), CloseStage::Hide),
                (Ticket(7), CloseStage::MarkHidden),
                (Ticket(7), CloseStage::Teardown),
            ]
        );
    }
}
