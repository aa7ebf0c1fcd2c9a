//! Fundamental detection, harmonic profile and total harmonic distortion

/// Number of entries in a harmonic profile (fundamental plus harmonics 2..=8)
pub const HARMONIC_COUNT: usize = 8;

/// Fundamental magnitude at or below which no harmonic analysis is done
pub const FUNDAMENTAL_FLOOR: f32 = 1e-5;

/// Strongest non-DC bin of a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamental {
    pub bin: usize,
    pub magnitude: f32,
}

impl Fundamental {
    /// Whether the fundamental is strong enough for harmonic analysis
    pub fn is_significant(&self) -> bool {
        self.bin > 0 && self.magnitude > FUNDAMENTAL_FLOOR
    }
}

/// Relative amplitudes of the fundamental and harmonics 2..=8
///
/// Index 0 is the fundamental (1.0 when one was found), index `h - 1` is
/// harmonic `h` relative to the fundamental. All zeros means no fundamental.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicProfile(pub [f32; HARMONIC_COUNT]);

impl HarmonicProfile {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }
}

/// Find the fundamental: the global maximum over bins 1.. (DC excluded)
///
/// The first of several equal maxima wins. Only bins strictly above zero can
/// win, so an empty or silent spectrum has no fundamental.
pub fn find_fundamental(magnitude: &[f32]) -> Option<Fundamental> {
    let mut best: Option<Fundamental> = None;
    let mut max_mag = 0.0f32;

    for (bin, &mag) in magnitude.iter().enumerate().skip(1) {
        if mag > max_mag {
            max_mag = mag;
            best = Some(Fundamental { bin, magnitude: mag });
        }
    }

    best
}

/// Magnitudes at harmonics 2..=8 of `fundamental_bin`, `None` past the end
fn harmonic_bins(magnitude: &[f32], fundamental_bin: usize) -> impl Iterator<Item = Option<f32>> + '_ {
    (2..=HARMONIC_COUNT).map(move |h| {
        fundamental_bin
            .checked_mul(h)
            .and_then(|bin| magnitude.get(bin))
            .copied()
    })
}

/// Harmonic amplitudes relative to the fundamental
///
/// Returns an all-zero profile when `fundamental_bin` is 0 or
/// `fundamental_mag <= 1e-5`. Harmonics beyond the end of the spectrum are 0.
pub fn harmonic_profile(magnitude: &[f32], fundamental_bin: usize, fundamental_mag: f32) -> HarmonicProfile {
    let mut profile = [0.0; HARMONIC_COUNT];

    if fundamental_bin == 0 || !(fundamental_mag > FUNDAMENTAL_FLOOR) {
        return HarmonicProfile(profile);
    }

    profile[0] = 1.0;
    for (slot, mag) in profile[1..].iter_mut().zip(harmonic_bins(magnitude, fundamental_bin)) {
        *slot = mag.map_or(0.0, |m| m / fundamental_mag);
    }

    HarmonicProfile(profile)
}

/// Harmonic profile for an optional fundamental
pub fn profile_for(magnitude: &[f32], fundamental: Option<&Fundamental>) -> HarmonicProfile {
    match fundamental {
        Some(f) => harmonic_profile(magnitude, f.bin, f.magnitude),
        None => HarmonicProfile::default(),
    }
}

/// Total harmonic distortion in percent
///
/// `100 * sqrt(sum of squared harmonic 2..=8 magnitudes) / fundamental`.
///
/// # Returns
/// `None` ("not applicable") unless the fundamental is above 1e-5
pub fn total_harmonic_distortion(magnitude: &[f32], fundamental: &Fundamental) -> Option<f32> {
    if !fundamental.is_significant() {
        return None;
    }

    let power: f64 = harmonic_bins(magnitude, fundamental.bin)
        .flatten()
        .map(|m| (m as f64) * (m as f64))
        .sum();

    Some((100.0 * power.sqrt() / fundamental.magnitude as f64) as f32)
}
