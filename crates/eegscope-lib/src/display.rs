use crate::signal::{last_timestamp, Sample};
use serde::{Deserialize, Serialize};

/// Vertical distance between stacked channel strips.
pub const TRACE_SPACING: f64 = 15.0;

/// Inclusive time range shown by the strips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub start: f64,
    pub end: f64,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1000.0,
        }
    }
}

impl DisplayWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of an uploaded recording: from zero to the last timestamp.
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self::new(0.0, last_timestamp(samples).unwrap_or(0.0))
    }

    /// Window of a preset recording, whose timestamps are row indices.
    pub fn for_preset(sample_count: usize) -> Self {
        Self::new(0.0, sample_count.saturating_sub(1) as f64)
    }

    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Amplitude multiplier, kept within the slider range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AmplitudeScale(f64);

impl AmplitudeScale {
    pub const MIN: f64 = 0.1;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for AmplitudeScale {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for AmplitudeScale {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<AmplitudeScale> for f64 {
    fn from(scale: AmplitudeScale) -> Self {
        scale.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub window: DisplayWindow,
    pub scale: AmplitudeScale,
}

/// Points of one channel strip, already scaled and offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub channel: String,
    pub points: Vec<[f64; 2]>,
}

/// Strips for `channels`, stacked top to bottom in the given order.
///
/// Only samples inside the window are used; the strip at position `i` plots
/// `value * scale - i * TRACE_SPACING`. Samples missing the channel are skipped.
pub fn stacked_traces<S: AsRef<str>>(
    samples: &[Sample],
    channels: &[S],
    view: &ViewSettings,
) -> Vec<Trace> {
    let scale = view.scale.get();
    channels
        .iter()
        .enumerate()
        .map(|(position, channel)| {
            let channel = channel.as_ref();
            let offset = position as f64 * TRACE_SPACING;
            let points = samples
                .iter()
                .filter(|sample| view.window.contains(sample.timestamp))
                .filter_map(|sample| {
                    sample
                        .value(channel)
                        .map(|value| [sample.timestamp, value * scale - offset])
                })
                .collect();
            Trace {
                channel: channel.to_string(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        (0..5)
            .map(|i| {
                Sample::new(i as f64 * 10.0)
                    .with("FP1", i as f64)
                    .with("CZ", 1.0)
            })
            .collect()
    }

    #[test]
    fn windows_from_recordings() {
        assert_eq!(DisplayWindow::from_samples(&samples()), DisplayWindow::new(0.0, 40.0));
        assert_eq!(DisplayWindow::from_samples(&[]), DisplayWindow::new(0.0, 0.0));
        assert_eq!(DisplayWindow::for_preset(250), DisplayWindow::new(0.0, 249.0));
        assert_eq!(DisplayWindow::for_preset(0), DisplayWindow::new(0.0, 0.0));
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(AmplitudeScale::new(50.0).get(), 10.0);
        assert_eq!(AmplitudeScale::new(0.0).get(), 0.1);
        assert_eq!(AmplitudeScale::new(f64::NAN).get(), 1.0);
        let parsed: AmplitudeScale = serde_json::from_str("20.0").unwrap();
        assert_eq!(parsed.get(), 10.0);
    }

    #[test]
    fn traces_are_windowed_scaled_and_stacked() {
        let view = ViewSettings {
            window: DisplayWindow::new(10.0, 30.0),
            scale: AmplitudeScale::new(2.0),
        };
        let traces = stacked_traces(&samples(), &["FP1", "CZ", "O1"], &view);
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].points, vec![[10.0, 2.0], [20.0, 4.0], [30.0, 6.0]]);
        assert_eq!(traces[1].points[0], [10.0, 2.0 - TRACE_SPACING]);
        assert!(traces[2].points.is_empty());
    }
}
