use std::collections::HashMap;

use crate::params::Parameters;
use crate::rlwe::{
    self, PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey,
};
use crate::utils::inv_mod_pow2;

/// Key generation with the scheme's Galois structure on top of the RLWE
/// primitives.
///
/// Two rotation-key shapes exist. [`KeyGenerator::gen_rotation_keys`]
/// produces keys consumed by [`crate::Evaluator::rotate_columns`], which
/// key-switches first and permutes afterwards, so the key for Galois
/// element `g` encrypts `s` under the inversely permuted secret.
/// [`KeyGenerator::gen_rotation_keys_for_matmul`] produces keys for the
/// matrix evaluator's collapse, which switches an already permuted secret
/// back to `s`, so there the key encrypts the permuted secret under `s`.
pub struct KeyGenerator {
    params: Parameters,
    inner: rlwe::KeyGenerator,
}

impl KeyGenerator {
    pub fn new(params: Parameters) -> Self {
        let inner = rlwe::KeyGenerator::new(params.ring_q().clone(), params.sigma());
        Self { params, inner }
    }

    pub fn gen_secret_key(&mut self) -> SecretKey {
        self.inner.gen_secret_key()
    }

    pub fn gen_public_key(&mut self, sk: &SecretKey) -> PublicKey {
        self.inner.gen_public_key(sk)
    }

    pub fn gen_key_pair(&mut self) -> (SecretKey, PublicKey) {
        self.inner.gen_key_pair()
    }

    pub fn gen_relinearization_key(&mut self, sk: &SecretKey) -> RelinearizationKey {
        self.inner.gen_relinearization_key(sk)
    }

    /// Rotation keys for the listed left rotations.
    pub fn gen_rotation_keys(&mut self, rotations: &[usize], sk: &SecretKey) -> RotationKeySet {
        let mut keys = HashMap::with_capacity(rotations.len());
        for &rot in rotations {
            let gal_el = self.params.galois_element(rot);
            keys.insert(gal_el, self.gen_rotation_key(gal_el, sk));
        }
        RotationKeySet { keys }
    }

    /// Rotation keys for every power-of-two rotation below the slot count,
    /// enough to compose any rotation.
    pub fn gen_default_rotation_keys(&mut self, sk: &SecretKey) -> RotationKeySet {
        let mut rotations = Vec::new();
        let mut rot = 1;
        while rot < self.params.slots() {
            rotations.push(rot);
            rot *= 2;
        }
        self.gen_rotation_keys(&rotations, sk)
    }

    /// Keys for the matrix multiplication of dimension `dim`: rotations
    /// `0, pack, 2*pack, ..., (dim-1)*pack` in the collapse convention.
    pub fn gen_rotation_keys_for_matmul(&mut self, sk: &SecretKey, dim: usize) -> RotationKeySet {
        let slots = self.params.slots();
        let pack = slots / dim;
        assert!(dim * pack == slots, "dim must divide the slot count");

        let ring = self.params.ring_q().clone();
        let mut keys = HashMap::with_capacity(dim);
        let mut s_rot = ring.new_poly();
        for rot in (0..slots).step_by(pack) {
            let gal_el = self.params.galois_element(rot);
            ring.permute_ntt(&sk.value, &ring.permute_ntt_index(gal_el), &mut s_rot);
            keys.insert(gal_el, self.inner.gen_switching_key(&s_rot, &sk.value));
        }
        RotationKeySet { keys }
    }

    fn gen_rotation_key(&mut self, gal_el: u64, sk: &SecretKey) -> SwitchingKey {
        let ring = self.params.ring_q().clone();
        let gal_inv = inv_mod_pow2(gal_el, 2 * self.params.n() as u64);
        let mut s_out = ring.new_poly();
        ring.permute_ntt(&sk.value, &ring.permute_ntt_index(gal_inv), &mut s_out);
        self.inner.gen_switching_key(&sk.value, &s_out)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;

    #[test]
    fn default_rotation_keys_cover_all_powers_of_two() {
        let mut ctx = testing::context();
        let mut rot = 1;
        while rot < ctx.params.slots() {
            let gal_el = ctx.params.galois_element(rot);
            assert!(ctx.rtks.get_rotation_key(gal_el).is_some());
            rot *= 2;
        }
    }

    #[test]
    fn matmul_keys_cover_packed_rotations() {
        let mut ctx = testing::context();
        let dim = 4;
        let sk = ctx.sk.clone();
        let rks = ctx.kgen.gen_rotation_keys_for_matmul(&sk, dim);
        let pack = ctx.params.slots() / dim;
        for i in 0..dim {
            let gal_el = ctx.params.galois_element(pack * i);
            assert!(rks.get_rotation_key(gal_el).is_some());
        }
    }
}
