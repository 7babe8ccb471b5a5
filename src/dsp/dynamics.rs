use crate::dsp::amplify::{db_to_gain, gain_to_db};

/*
Compressor / Limiter
====================

A feed-forward peak compressor working in the dB domain.

  threshold   Level (dBFS) above which gain reduction starts.
  ratio       How much the overshoot is scaled down. 4:1 means 8 dB over
              the threshold comes out 2 dB over.
  attack      Time constant for gain reduction to grow.
  release     Time constant for gain reduction to fall back to 0 dB.

Static curve:

    over = level_db - threshold_db
    gr   = over × (1 - 1 / ratio)        when over > 0, otherwise 0

  Out dB
     │            ╱ 1:1
     │          ╱
     │        ╱ ....... 4:1
     │      ╱...
     │    ╱.
     │  ╱
     └───────┬────────→ In dB
         threshold

Gain reduction is smoothed with one-pole filters, using the attack
coefficient while reduction grows and the release coefficient while it
shrinks:

    coeff = exp(-1 / (time × sample_rate))
    gr    = target + coeff × (gr - target)

A limiter is the same circuit with a high ratio and a very fast attack.
*/

#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    attack: f32,
    release: f32,
    /// Current smoothed gain reduction in dB (>= 0).
    reduction_db: f32,
    attack_coeff: f32,
    release_coeff: f32,
    coeff_rate: f32,
}

impl Compressor {
    pub fn new(threshold_db: f32, ratio: f32, attack: f32, release: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            attack: attack.max(crate::MIN_TIME),
            release: release.max(crate::MIN_TIME),
            reduction_db: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            coeff_rate: 0.0,
        }
    }

    /// Channel strip dynamics: -24 dB, 4:1, 3 ms / 250 ms.
    pub fn channel() -> Self {
        Self::new(-24.0, 4.0, 0.003, 0.25)
    }

    /// Master bus glue: -18 dB, 3:1, 3 ms / 250 ms.
    pub fn master() -> Self {
        Self::new(-18.0, 3.0, 0.003, 0.25)
    }

    /// Brickwall-ish output stage: -3 dB, 20:1, 1 ms / 100 ms.
    pub fn limiter() -> Self {
        Self::new(-3.0, 20.0, 0.001, 0.1)
    }

    /// Gain reduction currently applied, in dB.
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        self.attack_coeff = (-1.0 / (self.attack * sample_rate)).exp();
        self.release_coeff = (-1.0 / (self.release * sample_rate)).exp();
        self.coeff_rate = sample_rate;
    }

    #[inline]
    fn next_sample(&mut self, x: f32) -> f32 {
        let over = gain_to_db(x) - self.threshold_db;
        let target = if over > 0.0 {
            over * (1.0 - 1.0 / self.ratio)
        } else {
            0.0
        };

        let coeff = if target > self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = target + coeff * (self.reduction_db - target);

        x * db_to_gain(-self.reduction_db)
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        if self.coeff_rate != sample_rate {
            self.update_coefficients(sample_rate);
        }
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.reduction_db = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::amplify::peak;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn quiet_signal_passes_unchanged() {
        let mut comp = Compressor::channel();
        let level = db_to_gain(-40.0);
        let mut buffer = vec![level; 256];
        comp.render(&mut buffer, SAMPLE_RATE);

        for &s in &buffer {
            assert!((s - level).abs() < 1e-6);
        }
        assert_eq!(comp.reduction_db(), 0.0);
    }

    #[test]
    fn steady_overshoot_settles_on_static_curve() {
        // 0 dBFS into -24 dB at 4:1 => 24 dB over => 18 dB reduction.
        let mut comp = Compressor::channel();
        let mut buffer = vec![1.0; 48_000];
        comp.render(&mut buffer, SAMPLE_RATE);

        assert!((comp.reduction_db() - 18.0).abs() < 0.01);
        let out_db = gain_to_db(buffer[buffer.len() - 1]);
        assert!((out_db - (-18.0)).abs() < 0.01, "got {out_db} dB");
    }

    #[test]
    fn limiter_keeps_hot_input_near_ceiling() {
        let mut limiter = Compressor::limiter();
        let mut buffer = vec![db_to_gain(6.0); 4_800];
        limiter.render(&mut buffer, SAMPLE_RATE);

        // 9 dB over at 20:1 leaves 0.45 dB above the -3 dB threshold.
        let tail = peak(&buffer[2_400..]);
        assert!(gain_to_db(tail) < -2.4, "limiter let {tail} through");
    }

    #[test]
    fn reduction_releases_after_signal_drops() {
        let mut comp = Compressor::master();
        let mut loud = vec![1.0; 4_800];
        comp.render(&mut loud, SAMPLE_RATE);
        let engaged = comp.reduction_db();

        let mut quiet = vec![0.0; 96_000];
        comp.render(&mut quiet, SAMPLE_RATE);
        assert!(engaged > 10.0);
        assert!(comp.reduction_db() < 0.01);
    }
}
