//! Elliptic (Cauer) IIR filter design
//!
//! Minimum-order elliptic band-pass design in four steps:
//! 1. Order selection from the pass/stop edges and ripple limits
//! 2. Analog low-pass prototype (zeros, poles, gain) from Jacobi elliptic
//!    functions
//! 3. Low-pass → band-pass frequency transformation
//! 4. Bilinear transform to the z-plane and factoring into second-order
//!    sections
//!
//! Frequencies are normalised so that 1.0 is the Nyquist frequency.

use std::f64::consts::PI;

use num_complex::Complex64;
use rdfc_core::{RdfcError, RdfcResult};

use super::filters::{BiquadCascade, TransferFunction};

/// Machine epsilon used by the AGM convergence test of [`ellipj`]
const MACHEP: f64 = 1.110_223_024_625_156_5e-16;

/// Jacobi values below this are treated as zero when placing zeros/poles
const EPSILON: f64 = 2e-16;

/// Iteration cap for the descending Landen transformation
const LANDEN_MAX_ITER: usize = 10;

/// Imaginary parts at or below this mark a real root when pairing
const CONJUGATE_TOLERANCE: f64 = 1e-9;

/// Number of nome series terms used by the degree equation
const ELLIPDEG_TERMS: i32 = 7;

/// `10^x - 1` without cancellation for small `x`
#[inline]
fn pow10m1(x: f64) -> f64 {
    (std::f64::consts::LN_10 * x).exp_m1()
}

// ============================================================================
// Elliptic Integrals and Functions
// ============================================================================

/// Arithmetic-geometric mean of `a` and `b`.
fn agm(mut a: f64, mut b: f64) -> f64 {
    for _ in 0..64 {
        if (a - b).abs() <= f64::EPSILON * a {
            break;
        }
        let next_a = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = next_a;
    }
    0.5 * (a + b)
}

/// Complete elliptic integral of the first kind, `K(m)`, parameter `m = k²`.
#[must_use]
pub fn ellipk(m: f64) -> f64 {
    ellipkm1(1.0 - m)
}

/// `K(1 - p)`, accurate for `p` close to zero.
#[must_use]
pub fn ellipkm1(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::INFINITY;
    }
    PI / (2.0 * agm(1.0, p.sqrt()))
}

/// Jacobi elliptic functions at argument `u`, parameter `m`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jacobi {
    /// sn(u | m)
    pub sn: f64,
    /// cn(u | m)
    pub cn: f64,
    /// dn(u | m)
    pub dn: f64,
}

/// Jacobi elliptic functions via the descending AGM scale.
///
/// # Errors
///
/// `InvalidParameter` if `m` is outside `[0, 1]`.
pub fn ellipj(u: f64, m: f64) -> RdfcResult<Jacobi> {
    if !(0.0..=1.0).contains(&m) {
        return Err(RdfcError::invalid(format!(
            "elliptic parameter {m} outside [0, 1]"
        )));
    }

    if m < 1.0e-9 {
        let t = u.sin();
        let b = u.cos();
        let ai = 0.25 * m * (u - t * b);
        return Ok(Jacobi {
            sn: t - ai * b,
            cn: b + ai * t,
            dn: 1.0 - 0.5 * m * t * t,
        });
    }

    if m >= 0.999_999_999_9 {
        let mut ai = 0.25 * (1.0 - m);
        let b = u.cosh();
        let t = u.tanh();
        let phi = 1.0 / b;
        let twon = b * u.sinh();
        let sn = t + ai * (twon - u) / (b * b);
        ai *= t * phi;
        return Ok(Jacobi {
            sn,
            cn: phi - ai * (twon - u),
            dn: phi + ai * (twon + u),
        });
    }

    let mut a = [0.0_f64; 9];
    let mut c = [0.0_f64; 9];
    a[0] = 1.0;
    c[0] = m.sqrt();
    let mut b = (1.0 - m).sqrt();
    let mut twon = 1.0;
    let mut i = 0;

    while (c[i] / a[i]).abs() > MACHEP && i < 8 {
        let ai = a[i];
        i += 1;
        c[i] = (ai - b) / 2.0;
        let t = (ai * b).sqrt();
        a[i] = (ai + b) / 2.0;
        b = t;
        twon *= 2.0;
    }

    // Backward recurrence
    let mut phi = twon * a[i] * u;
    let mut prev = phi;
    while i > 0 {
        let t = c[i] * phi.sin() / a[i];
        prev = phi;
        phi = (t.asin() + phi) / 2.0;
        i -= 1;
    }

    let cn = phi.cos();
    Ok(Jacobi {
        sn: phi.sin(),
        cn,
        dn: cn / (phi - prev).cos(),
    })
}

/// Solve the degree equation for the selectivity parameter `m` of an
/// order-`n` filter with discrimination parameter `m1`, using nome series.
#[must_use]
pub fn ellipdeg(n: usize, m1: f64) -> f64 {
    let k1 = ellipk(m1);
    let k1p = ellipkm1(m1);

    let q1 = (-PI * k1p / k1).exp();
    let q = q1.powf(1.0 / n as f64);

    let num: f64 = (0..=ELLIPDEG_TERMS).map(|m| q.powi(m * (m + 1))).sum();
    let den: f64 = 1.0 + 2.0 * (1..=ELLIPDEG_TERMS + 1).map(|m| q.powi(m * m)).sum::<f64>();

    16.0 * q * (num / den).powi(4)
}

/// Inverse Jacobi `sn` for complex argument via descending Landen
/// transformations.
fn arc_jac_sn(w: Complex64, m: f64) -> RdfcResult<Complex64> {
    fn complement(kx: Complex64) -> Complex64 {
        ((1.0 - kx) * (1.0 + kx)).sqrt()
    }

    let k = m.sqrt();
    if k > 1.0 || k.is_nan() {
        return Err(RdfcError::invalid(format!("elliptic modulus {k} outside [0, 1]")));
    }
    if k == 1.0 {
        return Ok(w.atanh());
    }

    let mut ks = vec![k];
    while let Some(&last) = ks.last() {
        if last == 0.0 {
            break;
        }
        if ks.len() > LANDEN_MAX_ITER {
            return Err(RdfcError::invalid("Landen transformation not converging"));
        }
        let kp = ((1.0 - last) * (1.0 + last)).sqrt();
        ks.push((1.0 - kp) / (1.0 + kp));
    }

    let capk = ks[1..].iter().map(|kn| 1.0 + kn).product::<f64>() * PI / 2.0;

    let mut wn = w;
    for pair in ks.windows(2) {
        let (kn, knext) = (pair[0], pair[1]);
        wn = 2.0 * wn / ((1.0 + knext) * (1.0 + complement(kn * wn)));
    }

    let u = 2.0 / PI * wn.asin();
    Ok(capk * u)
}

/// Real inverse of the Jacobi `sc` function with complementary parameter:
/// solves `w = sc(z, 1 - m)` for real `z`.
fn arc_jac_sc1(w: f64, m: f64) -> RdfcResult<f64> {
    let z = arc_jac_sn(Complex64::new(0.0, w), m)?;
    if z.re.abs() > 1e-14 {
        return Err(RdfcError::invalid("inverse Jacobi sc has a non-real solution"));
    }
    Ok(z.im)
}

// ============================================================================
// Zero-Pole-Gain Representation
// ============================================================================

/// Filter as zeros, poles and gain.
#[derive(Clone, Debug, PartialEq)]
pub struct Zpk {
    /// Zeros of the transfer function
    pub zeros: Vec<Complex64>,
    /// Poles of the transfer function
    pub poles: Vec<Complex64>,
    /// System gain
    pub gain: f64,
}

impl Zpk {
    /// Excess of poles over zeros
    fn relative_degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }

    /// Analog elliptic low-pass prototype with unit passband edge.
    ///
    /// # Arguments
    ///
    /// * `order` - Filter order
    /// * `rp` - Maximum passband ripple (dB)
    /// * `rs` - Minimum stopband attenuation (dB)
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the ripple limits are unrealisable.
    pub fn ellip_prototype(order: usize, rp: f64, rs: f64) -> RdfcResult<Self> {
        match order {
            0 => {
                return Ok(Self { zeros: Vec::new(), poles: Vec::new(), gain: 10f64.powf(-rp / 20.0) });
            }
            1 => {
                let p = -(1.0 / pow10m1(0.1 * rp)).sqrt();
                return Ok(Self {
                    zeros: Vec::new(),
                    poles: vec![Complex64::new(p, 0.0)],
                    gain: -p,
                });
            }
            _ => {}
        }

        let eps_sq = pow10m1(0.1 * rp);
        let eps = eps_sq.sqrt();
        let ck1_sq = eps_sq / pow10m1(0.1 * rs);
        if ck1_sq == 0.0 || !ck1_sq.is_finite() {
            return Err(RdfcError::invalid(format!(
                "cannot design an elliptic filter with rp={rp} dB, rs={rs} dB"
            )));
        }

        let val0 = ellipk(ck1_sq);
        let m = ellipdeg(order, ck1_sq);
        let capk = ellipk(m);

        let n = order as f64;
        let jacobi = (1 - order % 2..order)
            .step_by(2)
            .map(|j| ellipj(j as f64 * capk / n, m))
            .collect::<RdfcResult<Vec<_>>>()?;

        let mut zeros: Vec<Complex64> = jacobi
            .iter()
            .filter(|jv| jv.sn.abs() > EPSILON)
            .map(|jv| Complex64::new(0.0, 1.0 / (m.sqrt() * jv.sn)))
            .collect();
        let conjugates: Vec<Complex64> = zeros.iter().map(Complex64::conj).collect();
        zeros.extend(conjugates);

        let r = arc_jac_sc1(1.0 / eps, ck1_sq)?;
        let v0 = capk * r / (n * val0);
        let jv0 = ellipj(v0, 1.0 - m)?;
        let (sv, cv, dv) = (jv0.sn, jv0.cn, jv0.dn);

        let mut poles: Vec<Complex64> = jacobi
            .iter()
            .map(|jv| {
                -Complex64::new(jv.cn * jv.dn * sv * cv, jv.sn * dv) / (1.0 - (jv.dn * sv).powi(2))
            })
            .collect();

        if order % 2 == 1 {
            let threshold = EPSILON * poles.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
            let complex: Vec<Complex64> = poles
                .iter()
                .filter(|p| p.im.abs() > threshold)
                .map(Complex64::conj)
                .collect();
            poles.extend(complex);
        } else {
            let conjugates: Vec<Complex64> = poles.iter().map(Complex64::conj).collect();
            poles.extend(conjugates);
        }

        let num: Complex64 = poles.iter().map(|&p| -p).product();
        let den: Complex64 = zeros.iter().map(|&z| -z).product();
        let mut gain = (num / den).re;
        if order % 2 == 0 {
            gain /= (1.0 + eps_sq).sqrt();
        }

        Ok(Self { zeros, poles, gain })
    }

    /// Transform a unit low-pass prototype into a band-pass filter centred
    /// at `wo` with bandwidth `bw` (both in rad/s).
    #[must_use]
    pub fn lowpass_to_bandpass(&self, wo: f64, bw: f64) -> Self {
        let degree = self.relative_degree();

        let shift = |roots: &[Complex64]| -> Vec<Complex64> {
            let scaled: Vec<Complex64> = roots.iter().map(|&r| r * (bw / 2.0)).collect();
            let roots_sq: Vec<Complex64> =
                scaled.iter().map(|&r| (r * r - wo * wo).sqrt()).collect();
            let upper = scaled.iter().zip(&roots_sq).map(|(&r, &s)| r + s);
            let lower = scaled.iter().zip(&roots_sq).map(|(&r, &s)| r - s);
            upper.chain(lower).collect()
        };

        let mut zeros = shift(&self.zeros);
        zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

        Self {
            zeros,
            poles: shift(&self.poles),
            gain: self.gain * bw.powi(degree as i32),
        }
    }

    /// Bilinear transform from the s-plane to the z-plane at sample rate `fs`.
    #[must_use]
    pub fn bilinear(&self, fs: f64) -> Self {
        let degree = self.relative_degree();
        let fs2 = 2.0 * fs;

        let mut zeros: Vec<Complex64> =
            self.zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
        let poles: Vec<Complex64> = self.poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
        zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

        let num: Complex64 = self.zeros.iter().map(|&z| fs2 - z).product();
        let den: Complex64 = self.poles.iter().map(|&p| fs2 - p).product();

        Self { zeros, poles, gain: self.gain * (num / den).re }
    }

    /// Factor into a cascade of second-order sections.
    ///
    /// Poles are grouped into conjugate pairs and each pair takes the
    /// nearest remaining zero pair, starting from the poles closest to the
    /// unit circle. Those sections run last; the gain goes on the first.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if a pole lies on or outside the unit circle or a
    /// section has non-finite coefficients.
    pub fn to_sections(&self) -> RdfcResult<BiquadCascade> {
        if let Some(p) = self.poles.iter().find(|p| p.norm() >= 1.0 || p.norm().is_nan()) {
            return Err(RdfcError::invalid(format!(
                "unstable design: pole {p} lies outside the unit circle"
            )));
        }

        let mut pole_pairs = conjugate_pairs(&self.poles);
        pole_pairs.sort_by(|l, r| r[0].norm().total_cmp(&l[0].norm()));
        let mut zero_pairs = conjugate_pairs(&self.zeros);

        let mut sections = Vec::with_capacity(pole_pairs.len());
        for poles in &pole_pairs {
            let nearest = zero_pairs
                .iter()
                .enumerate()
                .map(|(i, zeros)| (i, (zeros[0] - poles[0]).norm().min((zeros[1] - poles[0]).norm())))
                .min_by(|l, r| l.1.total_cmp(&r.1))
                .map(|(i, _)| i);
            let zeros = match nearest {
                Some(i) => zero_pairs.swap_remove(i),
                None => [Complex64::new(0.0, 0.0); 2],
            };

            let b = poly(&zeros).into_iter().map(|c| c.re).collect();
            let a = poly(poles).into_iter().map(|c| c.re).collect();
            sections.push(TransferFunction::new(b, a)?);
        }
        sections.reverse();

        match sections.first_mut() {
            Some(first) => first.scale(self.gain),
            None => sections.push(TransferFunction::new(vec![self.gain], vec![1.0])?),
        }

        Ok(BiquadCascade::new(sections))
    }
}

/// Group roots into conjugate pairs. Real roots pair up in sorted order and
/// a leftover real root is paired with the origin.
fn conjugate_pairs(roots: &[Complex64]) -> Vec<[Complex64; 2]> {
    let mut pairs: Vec<[Complex64; 2]> = roots
        .iter()
        .filter(|r| r.im > CONJUGATE_TOLERANCE)
        .map(|&r| [r, r.conj()])
        .collect();

    let mut real: Vec<f64> = roots
        .iter()
        .filter(|r| r.im.abs() <= CONJUGATE_TOLERANCE)
        .map(|r| r.re)
        .collect();
    real.sort_by(f64::total_cmp);

    for chunk in real.chunks(2) {
        let second = chunk.get(1).copied().unwrap_or(0.0);
        pairs.push([Complex64::new(chunk[0], 0.0), Complex64::new(second, 0.0)]);
    }
    pairs
}

/// Monic polynomial coefficients (highest power first) with the given roots.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = coeffs.clone();
        next.push(Complex64::new(0.0, 0.0));
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}

// ============================================================================
// Band-Pass Design
// ============================================================================

/// Elliptic band-pass requirements with edges normalised to Nyquist.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipticBandpass {
    /// Passband edges (low, high)
    pub passband: [f64; 2],
    /// Stopband edges (low, high)
    pub stopband: [f64; 2],
    /// Maximum passband loss (dB)
    pub gpass_db: f64,
    /// Minimum stopband attenuation (dB)
    pub gstop_db: f64,
}

impl EllipticBandpass {
    fn validate(&self) -> RdfcResult<()> {
        let edges = [self.stopband[0], self.passband[0], self.passband[1], self.stopband[1]];
        if edges.iter().any(|w| !(*w > 0.0 && *w < 1.0)) {
            return Err(RdfcError::invalid(format!(
                "band edges {edges:?} must lie strictly between 0 and Nyquist"
            )));
        }
        if !edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(RdfcError::invalid(format!(
                "band edges {edges:?} must be stop < pass < pass < stop"
            )));
        }
        if !(self.gpass_db > 0.0 && self.gstop_db > self.gpass_db) {
            return Err(RdfcError::invalid(format!(
                "need 0 < gpass ({}) < gstop ({})",
                self.gpass_db, self.gstop_db
            )));
        }
        Ok(())
    }

    /// Lowest elliptic order meeting the requirements, and the natural
    /// (passband) frequencies to design at.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the edges or losses are inconsistent.
    pub fn min_order(&self) -> RdfcResult<(usize, [f64; 2])> {
        self.validate()?;

        let passb = self.passband.map(|w| (PI * w / 2.0).tan());
        let stopb = self.stopband.map(|w| (PI * w / 2.0).tan());

        let nat = stopb
            .iter()
            .map(|s| ((s * s - passb[0] * passb[1]) / (s * (passb[0] - passb[1]))).abs())
            .fold(f64::INFINITY, f64::min);

        let arg1_sq = pow10m1(0.1 * self.gpass_db) / pow10m1(0.1 * self.gstop_db);
        let arg0 = 1.0 / nat;
        let d0 = (ellipk(arg0 * arg0), ellipk(1.0 - arg0 * arg0));
        let d1 = (ellipk(arg1_sq), ellipkm1(arg1_sq));
        let ratio = d0.0 * d1.1 / (d0.1 * d1.0);
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(RdfcError::invalid("elliptic order estimate is not finite"));
        }

        let wn = passb.map(|p| 2.0 / PI * p.atan());
        Ok((ratio.ceil() as usize, wn))
    }

    /// Minimum-order elliptic band-pass as a biquad cascade.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the requirements cannot be realised.
    pub fn design(&self) -> RdfcResult<(usize, BiquadCascade)> {
        let (order, wn) = self.min_order()?;

        // Pre-warp for the bilinear transform at fs = 2 (Nyquist = 1)
        let fs = 2.0;
        let warped = wn.map(|w| 2.0 * fs * (PI * w / fs).tan());
        let bw = warped[1] - warped[0];
        let wo = (warped[0] * warped[1]).sqrt();

        let cascade = Zpk::ellip_prototype(order, self.gpass_db, self.gstop_db)?
            .lowpass_to_bandpass(wo, bw)
            .bilinear(fs)
            .to_sections()?;

        Ok((order, cascade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eeg_bandpass(fs: f64) -> EllipticBandpass {
        EllipticBandpass {
            passband: [2.0 * 0.5 / fs, 2.0 * 70.0 / fs],
            stopband: [2.0 * 0.01 / fs, 2.0 * 90.0 / fs],
            gpass_db: 0.1,
            gstop_db: 20.0,
        }
    }

    #[test]
    fn test_ellipk_known_values() {
        assert!((ellipk(0.0) - PI / 2.0).abs() < 1e-15);
        // K(0.5) = 1.854074677301372
        assert!((ellipk(0.5) - 1.854_074_677_301_372).abs() < 1e-13);
        // K(0.9) = 2.578092113348173
        assert!((ellipk(0.9) - 2.578_092_113_348_173).abs() < 1e-13);
        assert!((ellipkm1(0.1) - ellipk(0.9)).abs() < 1e-14);
        assert!(ellipkm1(0.0).is_infinite());
    }

    #[test]
    fn test_ellipj_identities() {
        for &(u, m) in &[(0.3, 0.2), (1.1, 0.7), (0.8, 0.999), (2.0, 1e-12), (0.5, 1.0)] {
            let j = ellipj(u, m).unwrap();
            assert!((j.sn * j.sn + j.cn * j.cn - 1.0).abs() < 1e-12, "u={u} m={m}");
            assert!((j.dn * j.dn + m * j.sn * j.sn - 1.0).abs() < 1e-12, "u={u} m={m}");
        }

        // m = 0 reduces to circular functions
        let j = ellipj(0.7, 0.0).unwrap();
        assert!((j.sn - 0.7f64.sin()).abs() < 1e-15);

        // sn(K(m) | m) = 1
        let m = 0.4;
        let j = ellipj(ellipk(m), m).unwrap();
        assert!((j.sn - 1.0).abs() < 1e-12);

        assert!(ellipj(0.1, 1.5).is_err());
    }

    #[test]
    fn test_arc_jac_sc1_inverts_sc() {
        let m = 0.3;
        let z = 0.9;
        let j = ellipj(z, 1.0 - m).unwrap();
        let w = j.sn / j.cn;
        let back = arc_jac_sc1(w, m).unwrap();
        assert!((back - z).abs() < 1e-10, "{back} vs {z}");
    }

    #[test]
    fn test_ellipdeg_bounds() {
        let m = ellipdeg(3, 2.35e-4);
        assert!(m > 0.0 && m < 1.0);
        // Higher order gives a sharper (larger) selectivity parameter
        assert!(ellipdeg(5, 2.35e-4) > m);
    }

    #[test]
    fn test_min_order_for_256_hz() {
        let (order, wn) = eeg_bandpass(256.0).min_order().unwrap();
        assert_eq!(order, 4);
        assert!((wn[0] - 1.0 / 256.0).abs() < 1e-15);
        assert!((wn[1] - 140.0 / 256.0).abs() < 1e-15);
    }

    #[test]
    fn test_prototype_structure() {
        let zpk = Zpk::ellip_prototype(3, 0.1, 20.0).unwrap();
        assert_eq!(zpk.poles.len(), 3);
        assert_eq!(zpk.zeros.len(), 2);
        assert!(zpk.poles.iter().all(|p| p.re < 0.0));
        assert!(zpk.zeros.iter().all(|z| z.re == 0.0));
        assert!(zpk.gain > 0.0);

        let even = Zpk::ellip_prototype(4, 0.1, 20.0).unwrap();
        assert_eq!(even.poles.len(), 4);
        assert_eq!(even.zeros.len(), 4);
    }

    #[test]
    fn test_prototype_passband_gain() {
        // Odd-order elliptic low-pass has unit DC gain
        let zpk = Zpk::ellip_prototype(3, 0.1, 20.0).unwrap();
        let num: Complex64 = zpk.zeros.iter().map(|&z| -z).product();
        let den: Complex64 = zpk.poles.iter().map(|&p| -p).product();
        let dc = zpk.gain * (num / den).norm();
        assert!((dc - 1.0).abs() < 1e-9, "DC gain {dc}");
    }

    #[test]
    fn test_poly_expansion() {
        let roots = [Complex64::new(1.0, 0.0), Complex64::new(-2.0, 0.0)];
        let c = poly(&roots);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].re, 1.0);
        assert_eq!(c[1].re, 1.0);
        assert_eq!(c[2].re, -2.0);
    }

    #[test]
    fn test_bandpass_design_shape() {
        let (order, cascade) = eeg_bandpass(256.0).design().unwrap();
        assert_eq!(order, 4);
        assert_eq!(cascade.sections().len(), 4);
        assert_eq!(cascade.order(), 8);
        for section in cascade.sections() {
            assert_eq!(section.b().len(), 3);
            assert!((section.a()[0] - 1.0).abs() < 1e-15);
        }

        // Even order: no zero at DC, which sits on the stopband floor
        let dc = cascade.response(0.0);
        assert!((20.0 * dc.log10() + 20.0).abs() < 1e-3, "DC gain {dc}");
    }

    #[test]
    fn test_bandpass_response_within_limits() {
        for fs in [256.0, 2048.0] {
            let (_, cascade) = eeg_bandpass(fs).design().unwrap();
            let gain_db = |f: f64| 20.0 * cascade.response(f / fs).log10();

            for f in [0.5, 1.0, 10.0, 50.0, 70.0] {
                assert!(gain_db(f) > -0.1 - 1e-6, "{fs}: {f} Hz: {} dB", gain_db(f));
                assert!(gain_db(f) < 1e-6);
            }
            for f in [0.01, 90.0, 100.0, fs / 2.0] {
                assert!(gain_db(f) < -20.0 + 1e-3, "{fs}: {f} Hz: {} dB", gain_db(f));
            }
        }
    }

    #[test]
    fn test_sections_are_stable() {
        let zpk = Zpk::ellip_prototype(4, 0.1, 20.0)
            .unwrap()
            .lowpass_to_bandpass(0.01, 2.0)
            .bilinear(2.0);
        let cascade = zpk.to_sections().unwrap();
        for section in cascade.sections() {
            // Biquad poles inside the unit circle: |a2| < 1 and |a1| < 1 + a2
            let a = section.a();
            assert!(a[2].abs() < 1.0);
            assert!(a[1].abs() < 1.0 + a[2]);
        }

        let mut unstable = zpk;
        unstable.poles[0] = Complex64::new(1.0, 0.0);
        assert!(unstable.to_sections().is_err());
    }

    #[test]
    fn test_conjugate_pairs() {
        let roots = [
            Complex64::new(0.5, 0.5),
            Complex64::new(0.3, 0.0),
            Complex64::new(0.5, -0.5),
            Complex64::new(-0.2, 0.0),
            Complex64::new(0.9, 0.0),
        ];
        let pairs = conjugate_pairs(&roots);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], [roots[0], roots[2]]);
        assert_eq!(pairs[1], [roots[3], roots[1]]);
        assert_eq!(pairs[2], [roots[4], Complex64::new(0.0, 0.0)]);
    }

    #[test]
    fn test_invalid_requirements() {
        assert!(eeg_bandpass(128.0).min_order().is_err());
        let mut bandpass = eeg_bandpass(256.0);
        bandpass.stopband[0] = bandpass.passband[0] * 2.0;
        assert!(bandpass.design().is_err());
        let mut bandpass = eeg_bandpass(256.0);
        bandpass.gstop_db = 0.05;
        assert!(bandpass.design().is_err());
    }
}
