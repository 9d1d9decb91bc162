use std::time::{Duration, Instant};

use crate::sim::{CameraState, FrameReport};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub contacts: u32,
    pub scrolling_ticks: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    contacts: u32,
    scrolling_ticks: u32,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            contacts: 0,
            scrolling_ticks: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self, report: &FrameReport) {
        self.ticks = self.ticks.saturating_add(1);
        self.contacts = self.contacts.saturating_add(report.contacts.total());
        if matches!(report.camera, Some(CameraState::Tracking { .. })) {
            self.scrolling_ticks = self.scrolling_ticks.saturating_add(1);
        }
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            contacts: self.contacts,
            scrolling_ticks: self.scrolling_ticks,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_sum = Duration::ZERO;
        self.contacts = 0;
        self.scrolling_ticks = 0;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ContactReport;

    fn report(contacts: ContactReport, camera: Option<CameraState>) -> FrameReport {
        FrameReport {
            frame: 0,
            contacts,
            camera,
        }
    }

    #[test]
    fn snapshot_computes_expected_rates() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = accumulator.interval_start;

        accumulator.record_frame(Duration::from_millis(16));
        accumulator.record_frame(Duration::from_millis(16));
        for _ in 0..4 {
            accumulator.record_tick(&report(ContactReport::default(), None));
        }

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.tps - 4.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 16.0).abs() < 0.001);
    }

    #[test]
    fn contacts_and_scrolling_ticks_are_counted_then_reset() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = accumulator.interval_start;
        let landed_on_floor = ContactReport {
            floor: true,
            left_face: 1,
            ..ContactReport::default()
        };

        accumulator.record_tick(&report(landed_on_floor, Some(CameraState::Locked)));
        accumulator.record_tick(&report(
            ContactReport::default(),
            Some(CameraState::Tracking { delta: 10.0 }),
        ));

        let first = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot");
        assert_eq!(first.contacts, 2);
        assert_eq!(first.scrolling_ticks, 1);

        let second = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("snapshot");
        assert_eq!(second.contacts, 0);
        assert_eq!(second.scrolling_ticks, 0);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = accumulator.interval_start;
        accumulator.record_frame(Duration::from_millis(16));

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }
}
