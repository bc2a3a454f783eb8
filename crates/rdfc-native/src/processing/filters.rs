//! Zero-phase filtering for rdFC epochs
//!
//! Provides the EEG conditioning chain applied before pattern generation:
//! an elliptic 0.5–70 Hz band-pass followed by a mains notch, each run
//! forward and backward with Gustafsson's initial conditions so the three
//! channels stay aligned sample for sample.
//!
//! The band-pass runs as a cascade of biquads. Its 0.5 Hz edge puts poles
//! close to z = 1, where a single high-order polynomial loses the response
//! to rounding at high sampling rates.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, SVD};
use num_complex::Complex64;
use rdfc_core::{Epoch, NotchFrequency, RdfcError, RdfcResult};
use serde::{Deserialize, Serialize};

use super::ellip::EllipticBandpass;

// ============================================================================
// Transfer Function
// ============================================================================

/// IIR filter as numerator/denominator polynomials in `z^-1`.
///
/// Coefficients are normalised so that `a[0] == 1` and both polynomials
/// have the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl TransferFunction {
    /// Create a transfer function, normalising by `a[0]`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `a` is empty, `a[0]` is zero or a coefficient
    /// is not finite.
    pub fn new(mut b: Vec<f64>, mut a: Vec<f64>) -> RdfcResult<Self> {
        let a0 = match a.first() {
            Some(&a0) if a0 != 0.0 && a0.is_finite() => a0,
            _ => return Err(RdfcError::invalid("denominator must start with a non-zero coefficient")),
        };
        if b.is_empty() || b.iter().chain(&a).any(|c| !c.is_finite()) {
            return Err(RdfcError::invalid("filter coefficients must be finite and non-empty"));
        }

        let len = b.len().max(a.len());
        b.resize(len, 0.0);
        a.resize(len, 0.0);
        for c in b.iter_mut().chain(a.iter_mut()) {
            *c /= a0;
        }

        Ok(Self { b, a })
    }

    /// Numerator coefficients
    #[inline]
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients (`a[0] == 1`)
    #[inline]
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Filter order (number of delay elements)
    #[inline]
    pub fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Multiply the numerator by `gain`.
    pub fn scale(&mut self, gain: f64) {
        for c in &mut self.b {
            *c *= gain;
        }
    }

    /// Magnitude response at a frequency given in cycles per sample.
    pub fn response(&self, freq: f64) -> f64 {
        let z_inv = Complex64::from_polar(1.0, -2.0 * PI * freq);
        let eval = |coeffs: &[f64]| {
            coeffs
                .iter()
                .rev()
                .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z_inv + c)
        };
        (eval(&self.b) / eval(&self.a)).norm()
    }

    /// Run the filter over `x` (direct form II transposed).
    ///
    /// `zi` is the initial delay-line state (length [`order`](Self::order),
    /// missing entries are zero); `None` starts from rest.
    pub fn lfilter(&self, x: &[f64], zi: Option<&[f64]>) -> Vec<f64> {
        let order = self.order();
        let mut z = vec![0.0; order];
        if let Some(zi) = zi {
            let n = zi.len().min(order);
            z[..n].copy_from_slice(&zi[..n]);
        }

        let (b, a) = (&self.b, &self.a);
        let mut y = Vec::with_capacity(x.len());

        for &xn in x {
            let yn = match z.first() {
                Some(&z0) => z0 + b[0] * xn,
                None => b[0] * xn,
            };
            for k in 0..order {
                let next = if k + 1 < order { z[k + 1] } else { 0.0 };
                z[k] = next + b[k + 1] * xn - a[k + 1] * yn;
            }
            y.push(yn);
        }

        y
    }

    fn lfilter_reversed(&self, x: &[f64]) -> Vec<f64> {
        let reversed: Vec<f64> = x.iter().rev().copied().collect();
        self.lfilter(&reversed, None)
    }

    /// Zero-phase forward-backward filtering with Gustafsson's method.
    ///
    /// The forward and backward initial states are chosen by least squares
    /// so that filtering forward-then-backward and backward-then-forward
    /// agree, which suppresses the edge transients of a plain filtfilt.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the least-squares problem cannot be solved.
    pub fn filtfilt(&self, x: &[f64]) -> RdfcResult<Vec<f64>> {
        let n = x.len();
        let order = self.order();
        if n == 0 {
            return Ok(Vec::new());
        }
        if order == 0 {
            let scale = (self.b[0] / self.a[0]).powi(2);
            return Ok(x.iter().map(|v| v * scale).collect());
        }

        // Observability matrix: output caused by each unit initial state
        let mut unit = vec![0.0; order];
        unit[0] = 1.0;
        let impulse = self.lfilter(&vec![0.0; n], Some(&unit));
        let obs = DMatrix::from_fn(n, order, |i, k| if i >= k { impulse[i - k] } else { 0.0 });

        // Reversed initial-state responses filtered again
        let mut s = DMatrix::zeros(n, order);
        for k in 0..order {
            let column: Vec<f64> = obs.column(k).iter().copied().collect();
            let filtered = self.lfilter_reversed(&column);
            s.set_column(k, &DVector::from_vec(filtered));
        }

        let rev = |m: &DMatrix<f64>| DMatrix::from_fn(n, order, |i, k| m[(n - 1 - i, k)]);
        let obs_r = rev(&obs);
        let s_r = rev(&s);

        let mut m = DMatrix::zeros(n, 2 * order);
        m.columns_mut(0, order).copy_from(&(&s_r - &obs));
        m.columns_mut(order, order).copy_from(&(&obs_r - &s));

        // Naive passes from rest
        let y_f = self.lfilter(x, None);
        let mut y_fb = self.lfilter_reversed(&y_f);
        y_fb.reverse();

        let mut y_b = self.lfilter_reversed(x);
        y_b.reverse();
        let y_bf = self.lfilter(&y_b, None);

        let delta = DVector::from_iterator(n, y_bf.iter().zip(&y_fb).map(|(bf, fb)| bf - fb));

        let svd = SVD::try_new(m, true, true, f64::EPSILON, 0)
            .ok_or_else(|| RdfcError::invalid("initial-condition solve did not converge"))?;
        let sigma_max = svd.singular_values.max();
        let tolerance = f64::EPSILON * n.max(2 * order) as f64 * sigma_max;
        let ic = svd.solve(&delta, tolerance).map_err(RdfcError::invalid)?;

        let mut w = DMatrix::zeros(n, 2 * order);
        w.columns_mut(0, order).copy_from(&s_r);
        w.columns_mut(order, order).copy_from(&obs_r);
        let correction = w * ic;

        Ok(y_fb.iter().zip(correction.iter()).map(|(y, c)| y + c).collect())
    }
}

// ============================================================================
// Biquad Cascade
// ============================================================================

/// Series of second-order sections applied one after another.
#[derive(Clone, Debug, PartialEq)]
pub struct BiquadCascade {
    sections: Vec<TransferFunction>,
}

impl BiquadCascade {
    /// Create a cascade from its sections, applied in order.
    pub fn new(sections: Vec<TransferFunction>) -> Self {
        Self { sections }
    }

    /// Sections in application order
    #[inline]
    pub fn sections(&self) -> &[TransferFunction] {
        &self.sections
    }

    /// Total number of delay elements
    pub fn order(&self) -> usize {
        self.sections.iter().map(TransferFunction::order).sum()
    }

    /// Magnitude response at a frequency given in cycles per sample.
    pub fn response(&self, freq: f64) -> f64 {
        self.sections.iter().map(|s| s.response(freq)).product()
    }

    /// Zero-phase filtering, section by section.
    ///
    /// # Errors
    ///
    /// As [`TransferFunction::filtfilt`].
    pub fn filtfilt(&self, x: &[f64]) -> RdfcResult<Vec<f64>> {
        let mut y = x.to_vec();
        for section in &self.sections {
            y = section.filtfilt(&y)?;
        }
        Ok(y)
    }
}

/// Second-order IIR notch at `w0` (normalised to Nyquist) with quality
/// factor `q`.
///
/// # Errors
///
/// `InvalidParameter` if `w0` is not strictly between 0 and 1 or `q` is not
/// positive.
pub fn notch(w0: f64, q: f64) -> RdfcResult<TransferFunction> {
    if !(w0 > 0.0 && w0 < 1.0) {
        return Err(RdfcError::invalid(format!(
            "notch frequency {w0} must lie strictly between 0 and Nyquist"
        )));
    }
    if !(q > 0.0 && q.is_finite()) {
        return Err(RdfcError::invalid(format!("notch quality factor {q} must be positive")));
    }

    let bw = w0 / q;
    let beta = (PI * bw / 2.0).tan();
    let gain = 1.0 / (1.0 + beta);
    let cos_w0 = (PI * w0).cos();

    TransferFunction::new(
        vec![gain, -2.0 * gain * cos_w0, gain],
        vec![1.0, -2.0 * gain * cos_w0, 2.0 * gain - 1.0],
    )
}

// ============================================================================
// Filter Stage
// ============================================================================

/// Filter design parameters (frequencies in Hz)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Band-pass passband edges (low, high)
    pub passband_hz: (f64, f64),
    /// Band-pass stopband edges (low, high)
    pub stopband_hz: (f64, f64),
    /// Maximum passband loss (dB)
    pub passband_loss_db: f64,
    /// Minimum stopband attenuation (dB)
    pub stopband_attenuation_db: f64,
    /// Notch quality factor
    pub notch_q: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            passband_hz: (0.5, 70.0),
            stopband_hz: (0.01, 90.0),
            passband_loss_db: 0.1,
            stopband_attenuation_db: 20.0,
            notch_q: 30.0,
        }
    }
}

/// Designed band-pass and notch for one sampling rate.
#[derive(Clone, Debug)]
pub struct FilterStage {
    bandpass: BiquadCascade,
    notch: TransferFunction,
}

impl FilterStage {
    /// Design both filters for a sampling rate and mains frequency.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the rate is zero, the upper stopband edge or the
    /// notch is not below Nyquist, or the elliptic design is infeasible.
    pub fn design(
        sampling_rate_hz: u32,
        notch_frequency: NotchFrequency,
        config: &FilterConfig,
    ) -> RdfcResult<Self> {
        if sampling_rate_hz == 0 {
            return Err(RdfcError::invalid("sampling rate must be a positive integer"));
        }
        let fs = f64::from(sampling_rate_hz);
        let nyquist = fs / 2.0;

        if config.stopband_hz.1 >= nyquist {
            return Err(RdfcError::invalid(format!(
                "upper stopband edge {} Hz is not below the Nyquist frequency {nyquist} Hz",
                config.stopband_hz.1
            )));
        }
        if notch_frequency.hz() >= nyquist {
            return Err(RdfcError::invalid(format!(
                "notch at {notch_frequency} is not below the Nyquist frequency {nyquist} Hz"
            )));
        }

        let elliptic = EllipticBandpass {
            passband: [config.passband_hz.0 / nyquist, config.passband_hz.1 / nyquist],
            stopband: [config.stopband_hz.0 / nyquist, config.stopband_hz.1 / nyquist],
            gpass_db: config.passband_loss_db,
            gstop_db: config.stopband_attenuation_db,
        };
        let (order, bandpass) = elliptic.design()?;
        let notch = notch(notch_frequency.hz() / nyquist, config.notch_q)?;

        tracing::debug!(
            "Designed elliptic band-pass of order {} ({} sections) and {} notch at {} Hz",
            order,
            bandpass.sections().len(),
            notch_frequency,
            sampling_rate_hz
        );

        Ok(Self { bandpass, notch })
    }

    /// Band-pass then notch one channel, both zero-phase.
    ///
    /// # Errors
    ///
    /// As [`BiquadCascade::filtfilt`].
    pub fn filter_channel(&self, samples: &[f64]) -> RdfcResult<Vec<f64>> {
        let bandpassed = self.bandpass.filtfilt(samples)?;
        self.notch.filtfilt(&bandpassed)
    }

    /// Filter every channel of an epoch into a new epoch of the same shape.
    ///
    /// # Errors
    ///
    /// As [`FilterStage::filter_channel`], or `InvalidParameter` if filtering
    /// produced non-finite samples.
    pub fn apply(&self, epoch: &Epoch) -> RdfcResult<Epoch> {
        let [a, b, c] = epoch.channels();
        let filtered = [self.filter_channel(a)?, self.filter_channel(b)?, self.filter_channel(c)?];
        tracing::debug!("Filtered {} samples on each of 3 channels", epoch.len());
        epoch.with_channels(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn sine(freq: f64, fs: f64, len: usize) -> Vec<f64> {
        (0..len).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    fn magnitude_at(samples: &[f64], bin: usize) -> f64 {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(samples.len());
        let mut buffer: Vec<Complex64> = samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        fft.process(&mut buffer);
        buffer[bin].norm()
    }

    #[test]
    fn test_transfer_function_normalisation() {
        let tf = TransferFunction::new(vec![2.0], vec![2.0, -1.0]).unwrap();
        assert_eq!(tf.b(), &[1.0, 0.0]);
        assert_eq!(tf.a(), &[1.0, -0.5]);
        assert_eq!(tf.order(), 1);

        assert!(TransferFunction::new(vec![1.0], vec![0.0, 1.0]).is_err());
        assert!(TransferFunction::new(vec![1.0], vec![]).is_err());
        assert!(TransferFunction::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_lfilter_impulse_response() {
        let tf = TransferFunction::new(vec![1.0], vec![1.0, -0.5]).unwrap();
        let y = tf.lfilter(&[1.0, 0.0, 0.0, 0.0], None);
        assert_eq!(y, vec![1.0, 0.5, 0.25, 0.125]);

        // Initial state appears at the output on the first sample
        let y = tf.lfilter(&[0.0, 0.0], Some(&[2.0]));
        assert_eq!(y, vec![2.0, 1.0]);
    }

    #[test]
    fn test_notch_coefficients() {
        let w0 = 2.0 * 50.0 / 256.0;
        let tf = notch(w0, 30.0).unwrap();

        let beta = (PI * w0 / 60.0).tan();
        let g = 1.0 / (1.0 + beta);
        let c = (PI * w0).cos();
        let expected_b = [g, -2.0 * g * c, g];
        let expected_a = [1.0, -2.0 * g * c, 2.0 * g - 1.0];
        for i in 0..3 {
            assert!((tf.b()[i] - expected_b[i]).abs() < 1e-15);
            assert!((tf.a()[i] - expected_a[i]).abs() < 1e-15);
        }

        // Unit gain at DC and Nyquist, null at the notch
        assert!((tf.response(0.0) - 1.0).abs() < 1e-12);
        assert!((tf.response(0.5) - 1.0).abs() < 1e-12);
        assert!(tf.response(50.0 / 256.0) < 1e-9);

        assert!(notch(1.0, 30.0).is_err());
        assert!(notch(0.3, 0.0).is_err());
    }

    #[test]
    fn test_filtfilt_passes_constant_through_notch() {
        let tf = notch(2.0 * 60.0 / 256.0, 30.0).unwrap();
        let y = tf.filtfilt(&[3.0; 2000]).unwrap();
        assert_eq!(y.len(), 2000);
        assert!(y.iter().all(|v| (v - 3.0).abs() < 1e-8));
    }

    #[test]
    fn test_filtfilt_is_zero_phase() {
        let fs = 256.0;
        let stage = FilterStage::design(256, NotchFrequency::Hz50, &FilterConfig::default()).unwrap();
        let x = sine(10.0, fs, 20 * 256);
        let y = stage.filter_channel(&x).unwrap();
        assert_eq!(y.len(), x.len());

        let interior = 512..x.len() - 512;
        let lag_score = |lag: isize| -> f64 {
            interior
                .clone()
                .map(|i| x[i] * y[(i as isize + lag) as usize])
                .sum()
        };
        let best = (-5..=5)
            .max_by(|&l, &r| lag_score(l).total_cmp(&lag_score(r)))
            .unwrap();
        assert_eq!(best, 0);

        let ratio = lag_score(0) / interior.clone().map(|i| x[i] * x[i]).sum::<f64>();
        assert!(ratio > 0.97 && ratio < 1.001, "in-band gain {ratio}");
    }

    #[test]
    fn test_in_band_gain_at_high_sampling_rate() {
        let rate = 2048;
        let fs = f64::from(rate);
        let stage = FilterStage::design(rate, NotchFrequency::Hz50, &FilterConfig::default()).unwrap();

        let x = sine(10.0, fs, 30 * rate as usize);
        let y = stage.filter_channel(&x).unwrap();
        let interior = &y[5 * rate as usize..25 * rate as usize];
        let rms = (interior.iter().map(|v| v * v).sum::<f64>() / interior.len() as f64).sqrt();
        // Unit sine rms is 0.7071; the band-pass ripple costs about 0.2 dB both ways
        assert!(rms > 0.68 && rms < 0.70, "10 Hz rms {rms}");
    }

    #[test]
    fn test_cascade_filtfilt_matches_sections() {
        let first = TransferFunction::new(vec![0.5, 0.5], vec![1.0, -0.3]).unwrap();
        let second = notch(0.4, 10.0).unwrap();
        let cascade = BiquadCascade::new(vec![first.clone(), second.clone()]);
        assert_eq!(cascade.order(), 3);
        assert!((cascade.response(0.1) - first.response(0.1) * second.response(0.1)).abs() < 1e-15);

        let x = sine(3.0, 64.0, 256);
        let expected = second.filtfilt(&first.filtfilt(&x).unwrap()).unwrap();
        assert_eq!(cascade.filtfilt(&x).unwrap(), expected);
    }

    #[test]
    fn test_notch_attenuates_mains() {
        let fs = 256.0;
        let len = 16 * 256;
        let x: Vec<f64> = sine(10.0, fs, len)
            .iter()
            .zip(sine(50.0, fs, len))
            .map(|(a, b)| a + b)
            .collect();

        let stage = FilterStage::design(256, NotchFrequency::Hz50, &FilterConfig::default()).unwrap();
        let y = stage.filter_channel(&x).unwrap();

        // 8 s interior window: 1/8 Hz bins, both tones on exact bins
        let window = &y[1024..3072];
        let input = &x[1024..3072];
        let before = magnitude_at(input, 400) / magnitude_at(input, 80);
        let after = magnitude_at(window, 400) / magnitude_at(window, 80);
        assert!(before > 0.9);
        assert!(after < 0.01, "50 Hz residual ratio {after}");
    }

    #[test]
    fn test_filter_stage_rejects_low_rates() {
        let config = FilterConfig::default();
        assert!(FilterStage::design(0, NotchFrequency::Hz50, &config).is_err());
        assert!(FilterStage::design(180, NotchFrequency::Hz60, &config).is_err());
        assert!(FilterStage::design(128, NotchFrequency::Hz50, &config).is_err());
        assert!(FilterStage::design(200, NotchFrequency::Hz60, &config).is_ok());
    }

    #[test]
    fn test_filter_stage_apply_preserves_shape() {
        let rate = 200;
        let len = Epoch::expected_len(rate);
        let fs = f64::from(rate);
        let raw = Epoch::new(
            rate,
            [sine(7.0, fs, len), sine(11.0, fs, len), sine(23.0, fs, len)],
        )
        .unwrap();

        let stage = FilterStage::design(rate, NotchFrequency::Hz60, &FilterConfig::default()).unwrap();
        let filtered = stage.apply(&raw).unwrap();
        assert_eq!(filtered.len(), raw.len());
        assert_eq!(filtered.sampling_rate_hz(), rate);
        assert_ne!(filtered, raw);
    }
}
