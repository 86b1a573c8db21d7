use std::collections::HashMap;

use num_bigint_dig::BigInt;

use crate::ciphertext::Ciphertext;
use crate::evaluator::{Evaluator, ExtPoly};
use crate::matrix::MatrixCiphertext;
use crate::params::Parameters;
use crate::ring::Poly;
use crate::rlwe::{RelinearizationKey, RotationKeySet};

/// Multiplies a diagonal-packed matrix by a shifted-diagonal-packed matrix.
///
/// For each output index `i` the naive expansion
/// `C_i = sum_j A_j * rot_{pack*i}(B_{i-j mod dim})` is evaluated as one
/// hoisted multiplication: both operands are extended to the `Q*QMul`
/// NTT/Montgomery domain once, the `dim` products accumulate lazily without
/// modular reduction, and only the per-`i` tail leaves the NTT domain. The
/// three key switches of the tail collapse the rotated-key components
/// `rot(s)` and `s*rot(s)` back onto `(1, s)` through the rotation key and
/// the relinearisation key.
///
/// The rotation keys must come from
/// [`crate::KeyGenerator::gen_rotation_keys_for_matmul`] with the same
/// `dim`.
pub struct MatrixEvaluator {
    eval: Evaluator,
    dim: usize,
    rlk: RelinearizationKey,
    rks: RotationKeySet,
    b_big: BigInt,
    q_mul_big: BigInt,
    pool_a: Vec<[ExtPoly; 2]>,
    pool_b: Vec<[ExtPoly; 2]>,
    pool_rot: [ExtPoly; 2],
    pool_c_mul: [ExtPoly; 4],
    pool_c: [Poly; 4],
    pool_ks: [Ciphertext; 3],
    permute_q_idx: HashMap<u64, Vec<usize>>,
    permute_q_mul_idx: HashMap<u64, Vec<usize>>,
}

impl MatrixEvaluator {
    /// Builds an evaluator for products of dimension `dim`; all pools and
    /// permutation tables are sized here, the hot path allocates nothing.
    pub fn new(
        params: Parameters,
        dim: usize,
        rlk: RelinearizationKey,
        rks: RotationKeySet,
    ) -> Self {
        let slots = params.slots();
        assert!(dim > 0 && slots % dim == 0, "dim must divide the slot count");
        let pack = slots / dim;

        let eval = Evaluator::new(params.clone());
        let b_big = params.b().clone();
        let q_mul_big = params.ring_q_mul().modulus_big().clone();

        let pool_a = (0..dim)
            .map(|_| [ExtPoly::new(&params), ExtPoly::new(&params)])
            .collect();
        let pool_b = (0..dim)
            .map(|_| [ExtPoly::new(&params), ExtPoly::new(&params)])
            .collect();
        let pool_rot = [ExtPoly::new(&params), ExtPoly::new(&params)];
        let pool_c_mul = std::array::from_fn(|_| ExtPoly::new(&params));
        let pool_c = std::array::from_fn(|_| params.ring_q().new_poly());
        let pool_ks = std::array::from_fn(|_| Ciphertext::new(&params, 1));

        let mut permute_q_idx = HashMap::with_capacity(dim);
        let mut permute_q_mul_idx = HashMap::with_capacity(dim);
        for i in 0..dim {
            let gal_el = params.galois_element(pack * i);
            permute_q_idx.insert(gal_el, params.ring_q().permute_ntt_index(gal_el));
            permute_q_mul_idx.insert(gal_el, params.ring_q_mul().permute_ntt_index(gal_el));
        }

        Self {
            eval,
            dim,
            rlk,
            rks,
            b_big,
            q_mul_big,
            pool_a,
            pool_b,
            pool_rot,
            pool_c_mul,
            pool_c,
            pool_ks,
            permute_q_idx,
            permute_q_mul_idx,
        }
    }

    pub fn mul_new(&mut self, ct_a: &MatrixCiphertext, ct_b: &MatrixCiphertext) -> MatrixCiphertext {
        let mut ct_c =
            MatrixCiphertext::new(self.eval.params(), ct_a.dim(), true);
        self.mul(ct_a, ct_b, &mut ct_c);
        ct_c
    }

    /// `ct_c = ct_a * ct_b`. The output must not alias either input.
    pub fn mul(
        &mut self,
        ct_a: &MatrixCiphertext,
        ct_b: &MatrixCiphertext,
        ct_c: &mut MatrixCiphertext,
    ) {
        assert!(
            ct_a.is_diagonal && !ct_b.is_diagonal && ct_c.is_diagonal,
            "wrong matrix encoding"
        );
        let dim = self.dim;
        assert!(
            ct_a.dim() == dim && ct_b.dim() == dim && ct_c.dim() == dim,
            "matrix dimension mismatch"
        );
        let pack = ct_a.pack;
        assert!(
            ct_b.pack == pack && ct_c.pack == pack,
            "matrix pack mismatch"
        );
        let params = self.eval.params().clone();
        assert!(pack * dim == params.slots(), "wrong matrix encoding");
        assert!(!self.rlk.keys.is_empty(), "missing relinearization key");

        let ring_q = params.ring_q().clone();
        let ring_q_mul = params.ring_q_mul().clone();
        let d = params.slots();

        // hoist A: extended form scaled by QMul/Q
        for (ct, pools) in ct_a.value.iter().zip(self.pool_a.iter_mut()) {
            for (src, ext) in ct.value.iter().zip(pools.iter_mut()) {
                ext.q.copy_from(src);
                ring_q.mul_scalar_bigint_assign(&mut ext.q, &self.q_mul_big);
                let conv = self.eval.extender();
                conv.mod_down_q_to_p(&ext.q, &mut ext.q_mul);
                conv.mod_up_p_to_q(&ext.q_mul, &mut ext.q);
                ring_q.ntt(&mut ext.q);
                ring_q_mul.ntt(&mut ext.q_mul);
                ring_q.mform(&mut ext.q);
                ring_q_mul.mform(&mut ext.q_mul);
            }
        }
        // hoist B: plain modulus extension
        for (ct, pools) in ct_b.value.iter().zip(self.pool_b.iter_mut()) {
            for (src, ext) in ct.value.iter().zip(pools.iter_mut()) {
                ext.q.copy_from(src);
                self.eval.extender().mod_up_q_to_p(&ext.q, &mut ext.q_mul);
                ring_q.ntt(&mut ext.q);
                ring_q_mul.ntt(&mut ext.q_mul);
            }
        }

        let max_q = *ring_q.moduli().iter().max().unwrap();
        let max_q_mul = *ring_q_mul.moduli().iter().max().unwrap();
        let q_margin = (((1u128 << 64) / max_q as u128) >> 1) as usize;
        let q_mul_margin = (((1u128 << 64) / max_q_mul as u128) >> 1) as usize;

        for i in 0..dim {
            let gal_el = params.galois_element(pack * i);

            for ext in self.pool_c_mul.iter_mut() {
                ext.q.zero();
                ext.q_mul.zero();
            }
            for p in self.pool_c.iter_mut() {
                p.zero();
            }

            let idx_q = &self.permute_q_idx[&gal_el];
            let idx_q_mul = &self.permute_q_mul_idx[&gal_el];

            let mut reduce = 0usize;
            for j in 0..dim {
                let b_idx = (dim + i - j) % dim;
                ring_q.permute_ntt(&self.pool_b[b_idx][0].q, idx_q, &mut self.pool_rot[0].q);
                ring_q.permute_ntt(&self.pool_b[b_idx][1].q, idx_q, &mut self.pool_rot[1].q);
                ring_q_mul.permute_ntt(
                    &self.pool_b[b_idx][0].q_mul,
                    idx_q_mul,
                    &mut self.pool_rot[0].q_mul,
                );
                ring_q_mul.permute_ntt(
                    &self.pool_b[b_idx][1].q_mul,
                    idx_q_mul,
                    &mut self.pool_rot[1].q_mul,
                );

                // P0 += a0*b0, P1 += a1*b0, P2 += a0*b1, P3 += a1*b1
                ring_q.mul_mont_lazy_add(
                    &self.pool_a[j][0].q,
                    &self.pool_rot[0].q,
                    &mut self.pool_c_mul[0].q,
                );
                ring_q_mul.mul_mont_lazy_add(
                    &self.pool_a[j][0].q_mul,
                    &self.pool_rot[0].q_mul,
                    &mut self.pool_c_mul[0].q_mul,
                );
                ring_q.mul_mont_lazy_add(
                    &self.pool_a[j][1].q,
                    &self.pool_rot[0].q,
                    &mut self.pool_c_mul[1].q,
                );
                ring_q_mul.mul_mont_lazy_add(
                    &self.pool_a[j][1].q_mul,
                    &self.pool_rot[0].q_mul,
                    &mut self.pool_c_mul[1].q_mul,
                );
                ring_q.mul_mont_lazy_add(
                    &self.pool_a[j][0].q,
                    &self.pool_rot[1].q,
                    &mut self.pool_c_mul[2].q,
                );
                ring_q_mul.mul_mont_lazy_add(
                    &self.pool_a[j][0].q_mul,
                    &self.pool_rot[1].q_mul,
                    &mut self.pool_c_mul[2].q_mul,
                );
                ring_q.mul_mont_lazy_add(
                    &self.pool_a[j][1].q,
                    &self.pool_rot[1].q,
                    &mut self.pool_c_mul[3].q,
                );
                ring_q_mul.mul_mont_lazy_add(
                    &self.pool_a[j][1].q_mul,
                    &self.pool_rot[1].q_mul,
                    &mut self.pool_c_mul[3].q_mul,
                );

                // overflow margins: reduce each chain before 2^64 can clip
                if reduce % q_margin == q_margin - 1 {
                    for ext in self.pool_c_mul.iter_mut() {
                        ring_q.reduce(&mut ext.q);
                    }
                }
                if reduce % q_mul_margin == q_mul_margin - 1 {
                    for ext in self.pool_c_mul.iter_mut() {
                        ring_q_mul.reduce(&mut ext.q_mul);
                    }
                }
                reduce += 1;
            }
            if reduce % q_margin != 0 {
                for ext in self.pool_c_mul.iter_mut() {
                    ring_q.reduce(&mut ext.q);
                }
            }
            if reduce % q_mul_margin != 0 {
                for ext in self.pool_c_mul.iter_mut() {
                    ring_q_mul.reduce(&mut ext.q_mul);
                }
            }

            // leave the NTT domain, rescale by (X^D - B)/Q
            for jj in 0..4 {
                ring_q.intt(&mut self.pool_c_mul[jj].q);
                ring_q_mul.intt(&mut self.pool_c_mul[jj].q_mul);
                let conv = self.eval.extender();
                let ext = &mut self.pool_c_mul[jj];
                conv.mod_down_qp_to_q(&mut ext.q, &ext.q_mul);
                ring_q.mul_by_monomial(&ext.q, d, &mut self.pool_c[jj]);
                ring_q.mul_scalar_bigint_assign(&mut ext.q, &self.b_big);
                ring_q.sub_assign(&mut self.pool_c[jj], &ext.q);
            }

            ct_c.value[i].value[0].copy_from(&self.pool_c[0]);
            ct_c.value[i].value[1].copy_from(&self.pool_c[1]);

            let Some(key) = self.rks.get_rotation_key(gal_el) else {
                panic!("no rotation key for rotation by {}", pack * i);
            };
            let (ks01, ks2) = self.pool_ks.split_at_mut(2);
            let (ks0, ks1) = ks01.split_at_mut(1);
            let ksw = self.eval.key_switcher();

            // rot(s) -> (1, s)
            ksw.gadget_product_ntt(&self.pool_c[2], key, &mut ks0[0]);
            // s*rot(s) -> (s, s^2)
            ksw.gadget_product_ntt(&self.pool_c[3], key, &mut ks1[0]);
            ring_q.add_assign(&mut ks0[0].value[1], &ks1[0].value[0]);
            // s^2 -> (1, s)
            ring_q.intt(&mut ks1[0].value[1]);
            ksw.gadget_product_ntt(&ks1[0].value[1], &self.rlk.keys[0], &mut ks2[0]);
            ring_q.add_assign(&mut ks0[0].value[0], &ks2[0].value[0]);
            ring_q.add_assign(&mut ks0[0].value[1], &ks2[0].value[1]);

            ring_q.intt(&mut ks0[0].value[0]);
            ring_q.intt(&mut ks0[0].value[1]);
            ring_q.add_assign(&mut ct_c.value[i].value[0], &ks0[0].value[0]);
            ring_q.add_assign(&mut ct_c.value[i].value[1], &ks0[0].value[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint_dig::BigInt;
    use num_traits::Zero;

    use super::*;
    use crate::matrix_encoder::MatrixEncoder;
    use crate::matrix_encryptor::MatrixEncryptor;
    use crate::testing;
    use crate::utils::mod_floor;
    use crate::KeyGenerator;
    use crate::Parameters;

    fn plain_matmul(
        a: &[Vec<Vec<BigInt>>],
        b: &[Vec<Vec<BigInt>>],
        t: &BigInt,
    ) -> Vec<Vec<Vec<BigInt>>> {
        a.iter()
            .zip(b.iter())
            .map(|(ma, mb)| {
                let dim = ma.len();
                (0..dim)
                    .map(|r| {
                        (0..dim)
                            .map(|c| {
                                let mut acc = BigInt::zero();
                                for k in 0..dim {
                                    acc += &ma[r][k] * &mb[k][c];
                                }
                                mod_floor(&acc, t)
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    fn matmul_context(dim: usize) -> (Parameters, MatrixEncoder, MatrixEncryptor, MatrixEvaluator) {
        let params = Parameters::new(crate::params_list::hpn13d10t128());
        let mut kgen = KeyGenerator::new(params.clone());
        let (sk, pk) = kgen.gen_key_pair();
        let rlk = kgen.gen_relinearization_key(&sk);
        let rks = kgen.gen_rotation_keys_for_matmul(&sk, dim);
        let ecd = MatrixEncoder::new(params.clone());
        let enc = MatrixEncryptor::new(params.clone(), &pk, &sk);
        let eval = MatrixEvaluator::new(params.clone(), dim, rlk, rks);
        (params, ecd, enc, eval)
    }

    #[test]
    fn packed_two_by_two_product() {
        let dim = 2;
        let (params, mut ecd, mut enc, mut eval) = matmul_context(dim);
        let pack = params.slots() / dim;

        let as_big = |m: [[u64; 2]; 2]| -> Vec<Vec<BigInt>> {
            m.iter()
                .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
                .collect()
        };
        let m_a: Vec<_> = (0..pack).map(|_| as_big([[1, 2], [3, 4]])).collect();
        let m_b: Vec<_> = (0..pack).map(|_| as_big([[5, 6], [7, 8]])).collect();
        let want: Vec<_> = (0..pack).map(|_| as_big([[19, 22], [43, 50]])).collect();

        let pt_a = ecd.encode_matrix_new(&m_a, true);
        let pt_b = ecd.encode_matrix_new(&m_b, false);
        let ct_a = enc.encrypt_new(&pt_a);
        let ct_b = enc.encrypt_new(&pt_b);

        let ct_c = eval.mul_new(&ct_a, &ct_b);
        let pt_c = enc.decrypt_new(&ct_c);
        assert_eq!(ecd.decode_matrix_new(&pt_c), want);
    }

    #[test]
    fn random_four_by_four_product() {
        let dim = 4;
        let (params, mut ecd, mut enc, mut eval) = matmul_context(dim);
        let pack = params.slots() / dim;
        let mut rng = testing::seeded_rng(33);

        let m_a = testing::random_matrices(&params, pack, dim, &mut rng);
        let m_b = testing::random_matrices(&params, pack, dim, &mut rng);
        let want = plain_matmul(&m_a, &m_b, params.t());

        let pt_a = ecd.encode_matrix_new(&m_a, true);
        let pt_b = ecd.encode_matrix_new(&m_b, false);
        let ct_a = enc.encrypt_new(&pt_a);
        let ct_b = enc.encrypt_new(&pt_b);

        let ct_c = eval.mul_new(&ct_a, &ct_b);
        let pt_c = enc.decrypt_new(&ct_c);
        assert_eq!(ecd.decode_matrix_new(&pt_c), want);
    }

    #[test]
    #[should_panic(expected = "wrong matrix encoding")]
    fn mismatched_encodings_are_fatal() {
        let dim = 2;
        let (params, mut ecd, mut enc, mut eval) = matmul_context(dim);
        let pack = params.slots() / dim;
        let mut rng = testing::seeded_rng(34);

        let m = testing::random_matrices(&params, pack, dim, &mut rng);
        // both diagonal: rejected
        let ct_a = enc.encrypt_new(&ecd.encode_matrix_new(&m, true));
        let ct_b = enc.encrypt_new(&ecd.encode_matrix_new(&m, true));
        eval.mul_new(&ct_a, &ct_b);
    }
}
