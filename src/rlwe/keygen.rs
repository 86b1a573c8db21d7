use std::sync::Arc;

use itertools::izip;

use super::{PublicKey, RelinearizationKey, SecretKey, SwitchingKey};
use crate::random::{
    fill_ternary_with_hamming_weight, fill_uniform, sample_gaussian, signed_into_poly,
    DefaultSecureRng,
};
use crate::ring::{Poly, Ring};

/// Generates RLWE key material over one ring.
pub struct KeyGenerator {
    ring: Arc<Ring>,
    sigma: f64,
    rng: DefaultSecureRng,
}

impl KeyGenerator {
    pub fn new(ring: Arc<Ring>, sigma: f64) -> Self {
        Self {
            ring,
            sigma,
            rng: DefaultSecureRng::new(),
        }
    }

    pub fn gen_secret_key(&mut self) -> SecretKey {
        let ring = self.ring.clone();
        let mut coeffs = vec![0i64; ring.n()];
        fill_ternary_with_hamming_weight(ring.n(), &mut self.rng, &mut coeffs);
        let mut value = ring.new_poly();
        signed_into_poly(&ring, &coeffs, &mut value);
        ring.ntt(&mut value);
        SecretKey { value }
    }

    pub fn gen_public_key(&mut self, sk: &SecretKey) -> PublicKey {
        let ring = self.ring.clone();
        let mut a = ring.new_poly();
        fill_uniform(&ring, &mut self.rng, &mut a);
        ring.mform(&mut a);

        let mut b = self.sample_error_ntt();
        let mut a_s = ring.new_poly();
        ring.mul_mont(&a, &sk.value, &mut a_s);
        ring.sub_assign(&mut b, &a_s);
        ring.mform(&mut b);
        PublicKey { value: [b, a] }
    }

    pub fn gen_key_pair(&mut self) -> (SecretKey, PublicKey) {
        let sk = self.gen_secret_key();
        let pk = self.gen_public_key(&sk);
        (sk, pk)
    }

    /// Gadget-encrypts `s_in` under `s_out`; both in the NTT domain.
    pub fn gen_switching_key(&mut self, s_in: &Poly, s_out: &Poly) -> SwitchingKey {
        let ring = self.ring.clone();
        let value = (0..ring.level_count())
            .map(|i| {
                let mut a = ring.new_poly();
                fill_uniform(&ring, &mut self.rng, &mut a);
                ring.mform(&mut a);

                let mut b = self.sample_error_ntt();
                let mut a_s = ring.new_poly();
                ring.mul_mont(&a, s_out, &mut a_s);
                ring.sub_assign(&mut b, &a_s);

                // gadget constant: 1 on row i, 0 elsewhere
                let o = &ring.prime_ops()[i];
                for (x, y) in izip!(&mut b.coeffs[i], &s_in.coeffs[i]) {
                    *x = o.add(*x, *y);
                }
                ring.mform(&mut b);
                [b, a]
            })
            .collect();
        SwitchingKey { value }
    }

    /// Relinearisation key for degree-2 ciphertexts, `s^2 -> (1, s)`.
    pub fn gen_relinearization_key(&mut self, sk: &SecretKey) -> RelinearizationKey {
        let ring = self.ring.clone();
        let mut s2 = sk.value.clone();
        ring.mform(&mut s2);
        ring.mul_mont_assign(&mut s2, &sk.value);
        RelinearizationKey {
            keys: vec![self.gen_switching_key(&s2, &sk.value)],
        }
    }

    fn sample_error_ntt(&mut self) -> Poly {
        let ring = self.ring.clone();
        let mut coeffs = vec![0i64; ring.n()];
        sample_gaussian(self.sigma, &mut self.rng, &mut coeffs);
        let mut e = ring.new_poly();
        signed_into_poly(&ring, &coeffs, &mut e);
        ring.ntt(&mut e);
        e
    }
}
