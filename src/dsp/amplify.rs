//! Gain staging and bus summing primitives.

/*
Gain Staging
============

Every stage of the mixer is a multiplication or an addition:

  gain          A multiplier applied to amplitude.
                  gain > 1.0  →  louder
                  gain = 1.0  →  unity
                  gain < 1.0  →  quieter
                  gain = 0.0  →  silence

  summing       Adding several signals sample by sample. Eight drum channels
                hitting on the same step add up, which is why every channel
                is trimmed before it reaches the master bus.

Decibels
--------

    dB   = 20 × log₁₀(gain)
    gain = 10 ^ (dB / 20)

    ×1.0   =   0 dB
    ×0.5   ≈  -6 dB
    ×0.1   = -20 dB   (the channel pre-gain trim)
    ×0.01  = -40 dB   (the envelope floor)

Compressors and limiters think in dB; buffers think in linear gain. The two
helpers below convert between them.
*/

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear gain factor to decibels. Silence maps to -120 dB.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.abs().max(1e-6).log10()
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Add `source` into `bus` sample by sample.
#[inline]
pub fn sum_into(bus: &mut [f32], source: &[f32]) {
    debug_assert_eq!(bus.len(), source.len());

    for (b, &s) in bus.iter_mut().zip(source.iter()) {
        *b += s;
    }
}

/// Add `source × gain` into `bus` (aux sends).
#[inline]
pub fn sum_scaled_into(bus: &mut [f32], source: &[f32], gain: f32) {
    debug_assert_eq!(bus.len(), source.len());

    if gain == 0.0 {
        return;
    }
    for (b, &s) in bus.iter_mut().zip(source.iter()) {
        *b += s * gain;
    }
}

/// Peak absolute value of a buffer.
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip_reference_points() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-6);
        assert!((gain_to_db(0.5) + 6.0206).abs() < 1e-3);
        assert!(gain_to_db(0.0) <= -119.0);
    }

    #[test]
    fn test_apply_gain() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        apply_gain(&mut signal, 0.5);
        assert_eq!(signal, [0.5, 0.25, -0.25, -0.5]);
    }

    #[test]
    fn test_sum_into() {
        let mut bus = [0.1, 0.2, 0.3];
        sum_into(&mut bus, &[0.1, -0.2, 0.0]);
        assert_eq!(bus, [0.2, 0.0, 0.3]);
    }

    #[test]
    fn zero_send_leaves_bus_untouched() {
        let mut bus = [0.25; 4];
        sum_scaled_into(&mut bus, &[1.0; 4], 0.0);
        assert_eq!(bus, [0.25; 4]);

        sum_scaled_into(&mut bus, &[1.0; 4], 0.5);
        assert_eq!(bus, [0.75; 4]);
    }

    #[test]
    fn peak_ignores_sign() {
        assert_eq!(peak(&[0.1, -0.9, 0.5]), 0.9);
        assert_eq!(peak(&[]), 0.0);
    }
}
