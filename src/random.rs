use rand::{seq::index, CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::ring::{Poly, Ring};

/// Entropy-seeded CSPRNG used for all key material and encryption
/// randomness.
pub struct DefaultSecureRng(ChaCha8Rng);

impl DefaultSecureRng {
    pub fn new() -> Self {
        let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
        rand::thread_rng().fill_bytes(&mut seed);
        Self(ChaCha8Rng::from_seed(seed))
    }

    #[cfg(test)]
    pub(crate) fn from_u64_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for DefaultSecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for DefaultSecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for DefaultSecureRng {}

/// Fills `poly` with independent uniform residues in every RNS row.
pub(crate) fn fill_uniform<R: RngCore>(ring: &Ring, rng: &mut R, poly: &mut Poly) {
    for (q, row) in ring.moduli().iter().zip(poly.coeffs.iter_mut()) {
        for v in row.iter_mut() {
            *v = rng.gen_range(0..*q);
        }
    }
}

/// Ternary secret with Hamming weight `n/2`: half the coefficients are
/// non-zero, signs uniform.
pub(crate) fn fill_ternary_with_hamming_weight<R: RngCore>(
    n: usize,
    rng: &mut R,
    out: &mut [i64],
) {
    out.fill(0);
    for i in index::sample(rng, n, n / 2).iter() {
        out[i] = if rng.gen_bool(0.5) { 1 } else { -1 };
    }
}

/// Rounded continuous Gaussian with standard deviation `sigma`, tail cut at
/// `6*sigma`.
pub(crate) fn sample_gaussian<R: RngCore>(sigma: f64, rng: &mut R, out: &mut [i64]) {
    let normal = Normal::new(0.0, sigma).expect("invalid gaussian width");
    let bound = (6.0 * sigma).ceil() as i64;
    for v in out.iter_mut() {
        *v = (normal.sample(rng).round() as i64).clamp(-bound, bound);
    }
}

/// Writes signed coefficients into every RNS row of `poly`.
pub(crate) fn signed_into_poly(ring: &Ring, coeffs: &[i64], poly: &mut Poly) {
    for (q, row) in ring.moduli().iter().zip(poly.coeffs.iter_mut()) {
        for (v, c) in row.iter_mut().zip(coeffs.iter()) {
            *v = if *c < 0 {
                q - (-*c) as u64
            } else {
                *c as u64
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ternary_secret_has_requested_weight() {
        let mut rng = DefaultSecureRng::from_u64_seed(0);
        let mut s = vec![0i64; 256];
        fill_ternary_with_hamming_weight(256, &mut rng, &mut s);
        assert_eq!(s.iter().filter(|&&v| v != 0).count(), 128);
        assert!(s.iter().all(|&v| (-1..=1).contains(&v)));
    }

    #[test]
    fn gaussian_stays_bounded() {
        let mut rng = DefaultSecureRng::from_u64_seed(1);
        let mut e = vec![0i64; 4096];
        sample_gaussian(3.2, &mut rng, &mut e);
        assert!(e.iter().all(|&v| v.abs() <= 20));
        assert!(e.iter().any(|&v| v != 0));
    }
}
