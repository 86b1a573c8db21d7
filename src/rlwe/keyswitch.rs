use std::sync::Arc;

use itertools::izip;

use super::SwitchingKey;
use crate::ciphertext::Ciphertext;
use crate::ring::{Poly, Ring};

/// Applies gadget products against switching keys.
///
/// The input polynomial is decomposed one digit per prime: digit `i` is the
/// residue row modulo `q_i` broadcast across the chain, NTT-transformed and
/// multiplied against the key's `i`-th row pair.
pub struct KeySwitcher {
    ring: Arc<Ring>,
    digit: Poly,
}

impl KeySwitcher {
    pub fn new(ring: Arc<Ring>) -> Self {
        let digit = ring.new_poly();
        Self { ring, digit }
    }

    /// Gadget product with the output left in the NTT domain; feeds the
    /// matrix evaluator's key-switch collapse, which keeps accumulating
    /// there.
    pub fn gadget_product_ntt(&mut self, c: &Poly, key: &SwitchingKey, out: &mut Ciphertext) {
        let ring = self.ring.clone();
        assert!(
            key.value.len() == ring.level_count(),
            "switching key digit count mismatch"
        );
        out.value[0].zero();
        out.value[1].zero();
        for (i, pair) in key.value.iter().enumerate() {
            let src = &c.coeffs[i];
            for (&q, row) in izip!(ring.moduli(), &mut self.digit.coeffs) {
                for (v, &s) in izip!(row.iter_mut(), src.iter()) {
                    *v = s % q;
                }
            }
            ring.ntt(&mut self.digit);
            ring.mul_mont_add(&self.digit, &pair[0], &mut out.value[0]);
            ring.mul_mont_add(&self.digit, &pair[1], &mut out.value[1]);
        }
    }

    /// Gadget product with the output back in the coefficient domain.
    pub fn gadget_product(&mut self, c: &Poly, key: &SwitchingKey, out: &mut Ciphertext) {
        self.gadget_product_ntt(c, key, out);
        self.ring.intt(&mut out.value[0]);
        self.ring.intt(&mut out.value[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::fill_uniform;
    use crate::rlwe::KeyGenerator;
    use num_bigint_dig::BigInt;
    use num_traits::{Signed, Zero};
    use rand::{rngs::StdRng, SeedableRng};

    const MODULI: [u64; 3] = [0x40000081, 0x40000181, 0x40000381];

    /// `k0 + k1*s_out` must equal `c*s_in` up to key-switch noise.
    #[test]
    fn gadget_product_switches_keys() {
        let ring = Ring::new(64, &MODULI);
        let mut kgen = KeyGenerator::new(ring.clone(), 3.2);
        let s_in = kgen.gen_secret_key();
        let s_out = kgen.gen_secret_key();
        let key = kgen.gen_switching_key(&s_in.value, &s_out.value);

        let mut rng = StdRng::seed_from_u64(12);
        let mut c = ring.new_poly();
        fill_uniform(&ring, &mut rng, &mut c);

        let mut ksw = KeySwitcher::new(ring.clone());
        let mut out = Ciphertext {
            value: vec![ring.new_poly(), ring.new_poly()],
        };
        ksw.gadget_product(&c, &key, &mut out);

        // lhs = k0 + k1 * s_out
        let mut k1 = out.value[1].clone();
        ring.ntt(&mut k1);
        ring.mform(&mut k1);
        ring.mul_mont_assign(&mut k1, &s_out.value);
        ring.intt(&mut k1);
        let mut lhs = out.value[0].clone();
        ring.add_assign(&mut lhs, &k1);

        // rhs = c * s_in
        let mut rhs = c.clone();
        ring.ntt(&mut rhs);
        ring.mform(&mut rhs);
        ring.mul_mont_assign(&mut rhs, &s_in.value);
        ring.intt(&mut rhs);

        ring.sub_assign(&mut lhs, &rhs);
        let mut diff = vec![BigInt::zero(); 64];
        ring.to_bigint(&lhs, 1, &mut diff);
        let q_big = ring.modulus_big();
        let half = q_big / BigInt::from(2u64);
        // error bound: levels * n * q_max * 6*sigma, far below 2^52
        let bound = BigInt::from(1u64 << 52);
        for v in diff {
            let centered = if v > half { v - q_big } else { v };
            assert!(
                centered.abs() < bound,
                "key switch error {centered} too large"
            );
        }
    }
}
