//! Fixed-size radix-2 FFT with ping-pong buffers.
//!
//! Each pass reads only from the source buffer and writes a fully reordered
//! result into the destination, then the two swap roles. The reordering is
//! folded into the butterfly addressing, so no bit-reversal step is needed
//! at the cost of a second buffer.

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

pub struct PingPongFft {
    size: usize,
    /// `exp(-2πi·k/N)` for `k` in `0..N/2`.
    twiddles: Vec<Complex<f32>>,
    ping: Vec<Complex<f32>>,
    pong: Vec<Complex<f32>>,
}

impl PingPongFft {
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(Error::InvalidFftSize(size));
        }

        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * std::f64::consts::PI * k as f64 / size as f64;
                Complex::new(angle.cos() as f32, angle.sin() as f32)
            })
            .collect();

        Ok(Self {
            size,
            twiddles,
            ping: vec![Complex::new(0.0, 0.0); size],
            pong: vec![Complex::new(0.0, 0.0); size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Input slot for the next transform. Callers fill all `size` entries.
    pub fn input_mut(&mut self) -> &mut [Complex<f32>] {
        &mut self.ping
    }

    /// Transform the contents of [`input_mut`](Self::input_mut) and return
    /// the `size` frequency bins in natural order.
    pub fn process(&mut self) -> &[Complex<f32>] {
        let mut src: &mut [Complex<f32>] = &mut self.ping;
        let mut dst: &mut [Complex<f32>] = &mut self.pong;

        // `span` halves and `blocks` doubles every pass.
        let mut span = self.size / 2;
        let mut blocks = 1;
        while span > 0 {
            for p in 0..span {
                let w = self.twiddles[p * blocks];
                for q in 0..blocks {
                    let a = src[q + blocks * p];
                    let b = src[q + blocks * (p + span)];
                    dst[q + blocks * 2 * p] = a + b;
                    dst[q + blocks * (2 * p + 1)] = (a - b) * w;
                }
            }
            std::mem::swap(&mut src, &mut dst);
            span /= 2;
            blocks *= 2;
        }

        src
    }
}
