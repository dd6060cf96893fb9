//! Sampling-window resolution and fixed-period stepping, shared by the
//! animation and property samplers.

use log::debug;

use crate::errors::{ExtractError, Result};
use crate::source::SceneSource;

/// Resolved per-clip sampling parameters. Computed once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingWindow {
    /// Clip start, in scene seconds.
    pub start: f32,
    /// Clip end, in scene seconds.
    pub end: f32,
    /// `end - start`, or 1.0 for a pose-only clip (`end <= start`).
    pub duration: f32,
    /// Sampling period, `1 / rate` seconds.
    pub period: f32,
}

impl SamplingWindow {
    /// Resolves the window for `clip`.
    ///
    /// The span comes from the clip's explicit time span when it declares
    /// one, else from the scene default. The rate is the argument when
    /// positive, else the scene frame rate.
    pub fn resolve<S: SceneSource>(source: &S, clip: &str, sampling_rate: f32) -> Result<Self> {
        if !source.has_clip(clip) {
            return Err(ExtractError::ClipNotFound(clip.to_string()));
        }

        let span = source
            .clip_time_span(clip)
            .unwrap_or_else(|| source.default_time_span());

        let rate = if sampling_rate > 0.0 {
            debug!("using sampling rate of {sampling_rate}hz");
            sampling_rate
        } else {
            let scene_rate = source.frame_rate();
            debug!("using scene sampling rate of {scene_rate}hz");
            scene_rate
        };

        // A span that ends where it starts is just a pose; give it a default
        // 1s duration.
        let duration = if span.end > span.start {
            span.end - span.start
        } else {
            1.0
        };

        Ok(Self {
            start: span.start,
            end: span.end,
            duration,
            period: 1.0 / rate,
        })
    }

    /// Upper bound on keys per track, for preallocation.
    #[must_use]
    pub(crate) fn max_keys(&self) -> usize {
        (3.0 + (self.end - self.start) / self.period) as usize
    }

    /// Sample instants `start, start + period, start + 2·period, …`, with the
    /// final step clamped to exactly `end` (never overshoots) and always at
    /// least one instant.
    #[must_use]
    pub fn frames(&self) -> Frames {
        Frames {
            window: *self,
            index: 0,
            done: false,
        }
    }
}

/// Iterator over the sample instants of a [`SamplingWindow`].
#[derive(Debug, Clone)]
pub struct Frames {
    window: SamplingWindow,
    index: u32,
    done: bool,
}

impl Iterator for Frames {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.done {
            return None;
        }
        // Stepping by index rather than accumulating keeps the last sample
        // from drifting past or short of `end`.
        let t = self.window.start + self.index as f32 * self.window.period;
        self.index += 1;
        if t >= self.window.end {
            self.done = true;
            Some(self.window.end)
        } else {
            Some(t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f32, end: f32, rate: f32) -> SamplingWindow {
        SamplingWindow {
            start,
            end,
            duration: if end > start { end - start } else { 1.0 },
            period: 1.0 / rate,
        }
    }

    #[test]
    fn frames_cover_span_inclusive() {
        let times: Vec<f32> = window(0.0, 2.0, 10.0).frames().collect();
        assert_eq!(times.len(), 21);
        assert_eq!(times[0], 0.0);
        assert_eq!(*times.last().unwrap(), 2.0);
        for (i, t) in times.iter().enumerate().take(20) {
            assert!((t - i as f32 * 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn frames_clamp_final_step_to_end() {
        // 0.75s at 2Hz: 0.0, 0.5, then the clamped 0.75.
        let times: Vec<f32> = window(0.0, 0.75, 2.0).frames().collect();
        assert_eq!(times, vec![0.0, 0.5, 0.75]);
    }

    #[test]
    fn frames_pose_only_single_sample() {
        let times: Vec<f32> = window(2.0, 2.0, 30.0).frames().collect();
        assert_eq!(times, vec![2.0]);
    }

    #[test]
    fn frames_offset_start() {
        let times: Vec<f32> = window(1.0, 3.0, 1.0).frames().collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }
}
