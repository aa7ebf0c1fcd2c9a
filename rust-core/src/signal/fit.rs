//! Fitting decoded recordings into a fixed-size analysis buffer
//!
//! Decoders hand over recordings of arbitrary length. The analysis pipeline
//! works on one fixed-size buffer, so recordings are either linearly
//! interpolated across the buffer (timestamped CSV data) or truncated and
//! zero-padded (sampled audio).

use std::borrow::Cow;

/// Lowest effective sample rate assigned to a fitted recording
pub const MIN_EFFECTIVE_SAMPLE_RATE: f64 = 100.0;

/// One timestamped sample from a decoded recording
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSample {
    /// Time in seconds
    pub time: f64,
    pub amplitude: f64,
}

/// A recording fitted into an analysis buffer
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSignal {
    pub samples: Vec<f32>,

    /// Sample rate implied by spreading `samples` over `duration`
    pub sample_rate: f64,

    /// Nominal duration of the original recording in seconds
    pub duration: f64,
}

/// Stretch `input` to exactly `len` samples by linear interpolation
///
/// The first and last input samples map onto the first and last output
/// samples. A single-sample input fills the buffer; an empty input yields
/// silence.
pub fn fit_to_length(input: &[f32], len: usize) -> Vec<f32> {
    match (input.len(), len) {
        (_, 0) => Vec::new(),
        (0, _) => vec![0.0; len],
        (1, _) | (_, 1) => vec![input[0]; len],
        (n, _) => {
            let step = (n - 1) as f64 / (len - 1) as f64;
            (0..len)
                .map(|i| {
                    let pos = i as f64 * step;
                    let lo = (pos.floor() as usize).min(n - 1);
                    let hi = (lo + 1).min(n - 1);
                    let frac = pos - lo as f64;
                    (input[lo] as f64 * (1.0 - frac) + input[hi] as f64 * frac) as f32
                })
                .collect()
        }
    }
}

/// Fit timestamped samples onto `len` evenly spaced points over `[0, duration]`
///
/// `samples` may arrive in any order; they are ordered by time first, equal
/// timestamps keeping their input order. The duration is the largest
/// timestamp, or 1 second when no timestamp is positive. Points outside the
/// recorded range hold the nearest edge value.
pub fn fit_timed_samples(samples: &[TimedSample], len: usize) -> FittedSignal {
    let samples = sorted_by_time(samples);
    let max_time = samples.iter().fold(0.0f64, |m, s| m.max(s.time));
    let duration = if max_time > 0.0 { max_time } else { 1.0 };
    let sample_rate = effective_sample_rate(len, duration);

    let values = match samples.len() {
        0 => vec![0.0; len],
        1 => vec![samples[0].amplitude as f32; len],
        _ => {
            let span = len.saturating_sub(1).max(1) as f64;
            let mut cursor = 0;
            (0..len)
                .map(|i| {
                    let target = i as f64 / span * duration;
                    while cursor + 2 < samples.len() && samples[cursor + 1].time <= target {
                        cursor += 1;
                    }
                    interpolate(&samples[cursor], &samples[cursor + 1], target) as f32
                })
                .collect()
        }
    };

    FittedSignal {
        samples: values,
        sample_rate,
        duration,
    }
}

fn sorted_by_time(samples: &[TimedSample]) -> Cow<'_, [TimedSample]> {
    if samples.windows(2).all(|w| w[0].time.total_cmp(&w[1].time).is_le()) {
        return Cow::Borrowed(samples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    Cow::Owned(sorted)
}

fn interpolate(a: &TimedSample, b: &TimedSample, t: f64) -> f64 {
    let dt = b.time - a.time;
    if dt <= 0.0 || t <= a.time {
        return a.amplitude;
    }
    if t >= b.time {
        return b.amplitude;
    }
    a.amplitude + (b.amplitude - a.amplitude) * (t - a.time) / dt
}

/// Parse `time,amplitude` rows of a recorded CSV
///
/// Fields may be separated by commas, semicolons or whitespace. Blank lines,
/// header lines starting with `time` or `frequency`, `#` comments and rows
/// without two numbers are skipped.
pub fn parse_timed_csv(text: &str) -> Vec<TimedSample> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_header(line))
        .filter_map(|line| {
            let mut fields = line
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|f| !f.is_empty());
            let time = fields.next()?.parse::<f64>().ok()?;
            let amplitude = fields.next()?.parse::<f64>().ok()?;
            (!time.is_nan() && !amplitude.is_nan()).then_some(TimedSample { time, amplitude })
        })
        .collect()
}

fn is_header(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("time") || lower.starts_with("frequency") || lower.starts_with('#')
}

/// Take the first `len` samples, zero-padding short recordings
pub fn truncate_or_pad(input: &[f32], len: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    let n = input.len().min(len);
    out[..n].copy_from_slice(&input[..n]);
    out
}

/// Sample rate that spreads `len` samples over `duration` seconds
pub fn effective_sample_rate(len: usize, duration: f64) -> f64 {
    (len as f64 / duration).floor().max(MIN_EFFECTIVE_SAMPLE_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(points: &[(f64, f64)]) -> Vec<TimedSample> {
        points
            .iter()
            .map(|&(time, amplitude)| TimedSample { time, amplitude })
            .collect()
    }

    #[test]
    fn test_fit_to_length_stretches_linearly() {
        let out = fit_to_length(&[0.0, 1.0], 5);
        assert_eq!(out, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_fit_to_length_shrinks() {
        let input: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let out = fit_to_length(&input, 3);
        assert_eq!(out, vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_fit_to_length_degenerate() {
        assert_eq!(fit_to_length(&[], 4), vec![0.0; 4]);
        assert_eq!(fit_to_length(&[0.5], 3), vec![0.5; 3]);
        assert!(fit_to_length(&[1.0, 2.0], 0).is_empty());
        assert_eq!(fit_to_length(&[1.0, 2.0], 1), vec![1.0]);
    }

    #[test]
    fn test_fit_timed_samples() {
        let samples = timed(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let fitted = fit_timed_samples(&samples, 5);

        assert_eq!(fitted.duration, 2.0);
        assert_eq!(fitted.samples, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
        assert_eq!(fitted.sample_rate, MIN_EFFECTIVE_SAMPLE_RATE);
    }

    #[test]
    fn test_fit_timed_samples_rate() {
        let samples = timed(&[(0.0, 1.0), (0.5, -1.0)]);
        let fitted = fit_timed_samples(&samples, 1024);

        assert_eq!(fitted.duration, 0.5);
        assert_eq!(fitted.sample_rate, 2048.0);
        assert_eq!(fitted.samples.len(), 1024);
        assert_eq!(fitted.samples[0], 1.0);
        assert_eq!(fitted.samples[1023], -1.0);
    }

    #[test]
    fn test_fit_timed_samples_unordered() {
        let ordered = timed(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0), (1.5, -1.0), (2.0, 0.0)]);
        let shuffled = timed(&[(1.5, -1.0), (0.0, 0.0), (2.0, 0.0), (0.5, 1.0), (1.0, 0.0)]);

        let expected = fit_timed_samples(&ordered, 9);
        assert_eq!(fit_timed_samples(&shuffled, 9), expected);
        assert_eq!(expected.samples, vec![0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5, 0.0]);
    }

    #[test]
    fn test_fit_timed_single_point() {
        let fitted = fit_timed_samples(&timed(&[(0.0, 0.7)]), 8);
        assert_eq!(fitted.duration, 1.0);
        assert!(fitted.samples.iter().all(|&s| (s - 0.7).abs() < 1e-6));
    }

    #[test]
    fn test_truncate_or_pad() {
        assert_eq!(truncate_or_pad(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
        assert_eq!(truncate_or_pad(&[1.0], 3), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_timed_csv() {
        let text = "Time (s),Amplitude\n# exported\n0.0,0.5\n\n0.1; -0.25\n0.2\t1e-1\nbad,row\n0.3\n";
        let samples = parse_timed_csv(text);

        assert_eq!(samples, timed(&[(0.0, 0.5), (0.1, -0.25), (0.2, 0.1)]));
    }
}
