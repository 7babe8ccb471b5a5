use crate::MAX_DELAY_SAMPLES;

/// Circular buffer delay. Reads happen before writes so the caller can feed
/// the delayed output back into the input.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_DELAY_SAMPLES)
    }

    pub fn with_capacity(samples: usize) -> Self {
        Self {
            buffer: vec![0.0; samples.max(2)],
            write_pos: 0,
        }
    }

    /// Sample written `delay_samples` writes ago.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len - 1);
        self.buffer[(self.write_pos + len - delay_samples) % len]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Echo with feedback: output is the wet signal only.
    #[inline]
    pub fn next_sample(&mut self, input: f32, delay_samples: usize, feedback: f32) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(input + delayed * feedback);
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize, feedback: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples, feedback);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}
