use std::sync::Arc;

use super::{PublicKey, SecretKey};
use crate::ciphertext::Ciphertext;
use crate::random::{
    fill_ternary_with_hamming_weight, sample_gaussian, signed_into_poly, DefaultSecureRng,
};
use crate::ring::{Poly, Ring};

/// Public-key RLWE encryptor: `ct = (u*pk0 + e0 + pt, u*pk1 + e1)`.
pub struct Encryptor {
    ring: Arc<Ring>,
    pk: PublicKey,
    sigma: f64,
    rng: DefaultSecureRng,
    coeff_pool: Vec<i64>,
    pool_u: Poly,
    pool: Poly,
}

impl Encryptor {
    pub fn new(ring: Arc<Ring>, sigma: f64, pk: &PublicKey) -> Self {
        let pool_u = ring.new_poly();
        let pool = ring.new_poly();
        let coeff_pool = vec![0i64; ring.n()];
        Self {
            ring,
            pk: pk.clone(),
            sigma,
            rng: DefaultSecureRng::new(),
            coeff_pool,
            pool_u,
            pool,
        }
    }

    /// Encrypts the plaintext polynomial into a degree-1 ciphertext.
    pub fn encrypt(&mut self, pt: &Poly, ct: &mut Ciphertext) {
        assert!(ct.degree() == 1, "fresh encryptions are degree 1");
        let ring = self.ring.clone();

        fill_ternary_with_hamming_weight(ring.n(), &mut self.rng, &mut self.coeff_pool);
        signed_into_poly(&ring, &self.coeff_pool, &mut self.pool_u);
        ring.ntt(&mut self.pool_u);

        for j in 0..2 {
            ring.mul_mont(&self.pool_u, &self.pk.value[j], &mut self.pool);
            ring.intt(&mut self.pool);
            sample_gaussian(self.sigma, &mut self.rng, &mut self.coeff_pool);
            signed_into_poly(&ring, &self.coeff_pool, &mut ct.value[j]);
            ring.add_assign(&mut ct.value[j], &self.pool);
        }
        ring.add_assign(&mut ct.value[0], pt);
    }
}

/// RLWE decryptor; evaluates the ciphertext at the secret by Horner's rule
/// in the NTT domain, so any degree is supported.
pub struct Decryptor {
    ring: Arc<Ring>,
    sk_mform: Poly,
    pool: Poly,
    pool_term: Poly,
}

impl Decryptor {
    pub fn new(ring: Arc<Ring>, sk: &SecretKey) -> Self {
        let mut sk_mform = sk.value.clone();
        ring.mform(&mut sk_mform);
        let pool = ring.new_poly();
        let pool_term = ring.new_poly();
        Self {
            ring,
            sk_mform,
            pool,
            pool_term,
        }
    }

    pub fn decrypt(&mut self, ct: &Ciphertext, pt: &mut Poly) {
        let ring = self.ring.clone();
        self.pool.copy_from(&ct.value[ct.degree()]);
        ring.ntt(&mut self.pool);
        for d in (0..ct.degree()).rev() {
            ring.mul_mont_assign(&mut self.pool, &self.sk_mform);
            self.pool_term.copy_from(&ct.value[d]);
            ring.ntt(&mut self.pool_term);
            ring.add_assign(&mut self.pool, &self.pool_term);
        }
        ring.intt(&mut self.pool);
        pt.copy_from(&self.pool);
    }
}
