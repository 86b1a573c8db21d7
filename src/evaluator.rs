use num_bigint_dig::BigInt;

use crate::ciphertext::Ciphertext;
use crate::params::Parameters;
use crate::ring::{BasisExtender, Poly};
use crate::rlwe::{KeySwitcher, RelinearizationKey, RotationKeySet};

/// A polynomial carried in both the `Q` and `QMul` chains, the extended
/// representation used while tensoring.
#[derive(Clone, Debug)]
pub struct ExtPoly {
    pub(crate) q: Poly,
    pub(crate) q_mul: Poly,
}

impl ExtPoly {
    pub fn new(params: &Parameters) -> Self {
        Self {
            q: params.ring_q().new_poly(),
            q_mul: params.ring_q_mul().new_poly(),
        }
    }
}

/// Homomorphic operations on scalar ciphertexts.
///
/// Multiplication tensors the operands in the `Q*QMul` ring and rescales by
/// `(X^D - B)/Q`: the left operand is pre-scaled by `QMul/Q`, the tensor is
/// brought back down by `QMul`, and the monomial step applies `X^D - B`.
/// All scratch space is allocated at construction; an evaluator must not be
/// shared across threads, but distinct evaluators may run in parallel over
/// the same parameters and keys.
pub struct Evaluator {
    params: Parameters,
    ksw: KeySwitcher,
    conv: BasisExtender,
    b_big: BigInt,
    q_mul_big: BigInt,
    pool_q: [Poly; 7],
    pool_q_mul: [Poly; 7],
    pool_ks: Ciphertext,
    pool_ct_mul: Ciphertext,
}

impl Evaluator {
    pub fn new(params: Parameters) -> Self {
        let ring_q = params.ring_q().clone();
        let ring_q_mul = params.ring_q_mul().clone();
        let ksw = KeySwitcher::new(ring_q.clone());
        let conv = BasisExtender::new(ring_q.clone(), ring_q_mul.clone());
        let b_big = params.b().clone();
        let q_mul_big = ring_q_mul.modulus_big().clone();
        let pool_q = std::array::from_fn(|_| ring_q.new_poly());
        let pool_q_mul = std::array::from_fn(|_| ring_q_mul.new_poly());
        let pool_ks = Ciphertext::new(&params, 1);
        let pool_ct_mul = Ciphertext::new(&params, 2);
        Self {
            params,
            ksw,
            conv,
            b_big,
            q_mul_big,
            pool_q,
            pool_q_mul,
            pool_ks,
            pool_ct_mul,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub(crate) fn key_switcher(&mut self) -> &mut KeySwitcher {
        &mut self.ksw
    }

    pub(crate) fn extender(&mut self) -> &mut BasisExtender {
        &mut self.conv
    }

    fn check_binary(&self, op0: &Ciphertext, op1: &Ciphertext) {
        assert!(
            op0.degree() + op1.degree() > 0,
            "operands cannot both be plaintexts"
        );
    }

    /// Componentwise sum; the higher-degree tail of the larger operand is
    /// copied through.
    pub fn add(&self, op0: &Ciphertext, op1: &Ciphertext, ct_out: &mut Ciphertext) {
        self.check_binary(op0, op1);
        let ring = self.params.ring_q();
        let (small, large) = if op0.degree() >= op1.degree() {
            (op1, op0)
        } else {
            (op0, op1)
        };
        ct_out.resize(&self.params, large.degree());
        for i in 0..=small.degree() {
            ring.add(&op0.value[i], &op1.value[i], &mut ct_out.value[i]);
        }
        for i in small.degree() + 1..=large.degree() {
            ct_out.value[i].copy_from(&large.value[i]);
        }
    }

    pub fn add_new(&self, op0: &Ciphertext, op1: &Ciphertext) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, op0.degree().max(op1.degree()));
        self.add(op0, op1, &mut ct);
        ct
    }

    /// Componentwise difference; a tail coming from `op1` is negated.
    pub fn sub(&self, op0: &Ciphertext, op1: &Ciphertext, ct_out: &mut Ciphertext) {
        self.check_binary(op0, op1);
        let ring = self.params.ring_q();
        let max_degree = op0.degree().max(op1.degree());
        let min_degree = op0.degree().min(op1.degree());
        ct_out.resize(&self.params, max_degree);
        for i in 0..=min_degree {
            ring.sub(&op0.value[i], &op1.value[i], &mut ct_out.value[i]);
        }
        for i in min_degree + 1..=max_degree {
            if op0.degree() > op1.degree() {
                ct_out.value[i].copy_from(&op0.value[i]);
            } else {
                ring.neg(&op1.value[i], &mut ct_out.value[i]);
            }
        }
    }

    pub fn sub_new(&self, op0: &Ciphertext, op1: &Ciphertext) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, op0.degree().max(op1.degree()));
        self.sub(op0, op1, &mut ct);
        ct
    }

    pub fn neg(&self, ct_in: &Ciphertext, ct_out: &mut Ciphertext) {
        let ring = self.params.ring_q();
        ct_out.resize(&self.params, ct_in.degree());
        for i in 0..=ct_in.degree() {
            ring.neg(&ct_in.value[i], &mut ct_out.value[i]);
        }
    }

    pub fn neg_new(&self, ct_in: &Ciphertext) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, ct_in.degree());
        self.neg(ct_in, &mut ct);
        ct
    }

    /// Rotates the columns of `ct0` left by `k` slots. The key set must
    /// hold the key for the corresponding Galois element.
    pub fn rotate_columns(
        &mut self,
        ct0: &Ciphertext,
        rtks: &RotationKeySet,
        k: usize,
        ct_out: &mut Ciphertext,
    ) {
        assert!(
            ct0.degree() == 1 && ct_out.degree() == 1,
            "rotation input and output must be degree 1"
        );
        if k == 0 {
            ct_out.copy_from(ct0);
            return;
        }
        let gal_el = self.params.galois_element(k);
        let Some(key) = rtks.get_rotation_key(gal_el) else {
            panic!("no rotation key for rotation by {k}");
        };
        let ring = self.params.ring_q().clone();
        self.ksw.gadget_product(&ct0.value[1], key, &mut self.pool_ks);
        ring.add_assign(&mut self.pool_ks.value[0], &ct0.value[0]);
        ring.permute(&self.pool_ks.value[0], gal_el, &mut ct_out.value[0]);
        ring.permute(&self.pool_ks.value[1], gal_el, &mut ct_out.value[1]);
    }

    pub fn rotate_columns_new(
        &mut self,
        ct0: &Ciphertext,
        rtks: &RotationKeySet,
        k: usize,
    ) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, 1);
        self.rotate_columns(ct0, rtks, k, &mut ct);
        ct
    }

    /// Multiplies and relinearises back to degree 1. The operands may be
    /// the same ciphertext.
    pub fn mul_and_relin(
        &mut self,
        op0: &Ciphertext,
        op1: &Ciphertext,
        rlk: &RelinearizationKey,
        ct_out: &mut Ciphertext,
    ) {
        self.tensor_and_rescale(op0, op1);
        self.relinearize(rlk, ct_out);
    }

    pub fn mul_and_relin_new(
        &mut self,
        op0: &Ciphertext,
        op1: &Ciphertext,
        rlk: &RelinearizationKey,
    ) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, 1);
        self.mul_and_relin(op0, op1, rlk, &mut ct);
        ct
    }

    /// Precomputes the left-operand extension `round(ct * QMul / Q)` in
    /// NTT/Montgomery form over both chains, to be reused across many
    /// [`Evaluator::mul_and_relin_hoisted`] calls.
    pub fn extend_left(&self, ct: &Ciphertext, out: &mut [ExtPoly; 2]) {
        assert!(ct.degree() == 1, "hoisting expects a degree-1 ciphertext");
        let ring_q = self.params.ring_q();
        let ring_q_mul = self.params.ring_q_mul();
        for (src, ext) in ct.value.iter().zip(out.iter_mut()) {
            ext.q.copy_from(src);
            ring_q.mul_scalar_bigint_assign(&mut ext.q, &self.q_mul_big);
            self.conv.mod_down_q_to_p(&ext.q, &mut ext.q_mul);
            self.conv.mod_up_p_to_q(&ext.q_mul, &mut ext.q);
            ring_q.ntt(&mut ext.q);
            ring_q_mul.ntt(&mut ext.q_mul);
            ring_q.mform(&mut ext.q);
            ring_q_mul.mform(&mut ext.q_mul);
        }
    }

    pub fn extend_left_new(&self, ct: &Ciphertext) -> [ExtPoly; 2] {
        let mut out = [ExtPoly::new(&self.params), ExtPoly::new(&self.params)];
        self.extend_left(ct, &mut out);
        out
    }

    /// Multiply with a pre-extended left operand.
    pub fn mul_and_relin_hoisted(
        &mut self,
        op0: &[ExtPoly; 2],
        op1: &Ciphertext,
        rlk: &RelinearizationKey,
        ct_out: &mut Ciphertext,
    ) {
        self.tensor_and_rescale_hoisted(op0, op1);
        self.relinearize(rlk, ct_out);
    }

    /// Tensors two degree-1 ciphertexts and rescales by `(X^D - B)/Q`,
    /// leaving the degree-2 result in the internal product pool.
    fn tensor_and_rescale(&mut self, ct0: &Ciphertext, ct1: &Ciphertext) {
        assert!(
            ct0.degree() == 1 && ct1.degree() == 1,
            "tensoring expects degree-1 ciphertexts"
        );
        let ring_q = self.params.ring_q().clone();
        let ring_q_mul = self.params.ring_q_mul().clone();

        for i in 0..2 {
            self.pool_q[i].copy_from(&ct0.value[i]);
            self.pool_q[2 + i].copy_from(&ct1.value[i]);
        }
        let (src, _) = self.pool_q.split_at_mut(4);
        let (src_m, _) = self.pool_q_mul.split_at_mut(4);

        // left operand: scale by QMul/Q, then NTT + Montgomery
        for i in 0..2 {
            ring_q.mul_scalar_bigint_assign(&mut src[i], &self.q_mul_big);
            self.conv.mod_down_q_to_p(&src[i], &mut src_m[i]);
            self.conv.mod_up_p_to_q(&src_m[i], &mut src[i]);
            ring_q.ntt(&mut src[i]);
            ring_q_mul.ntt(&mut src_m[i]);
            ring_q.mform(&mut src[i]);
            ring_q_mul.mform(&mut src_m[i]);
        }
        // right operand: plain mod-up, then NTT
        for i in 2..4 {
            self.conv.mod_up_q_to_p(&src[i], &mut src_m[i]);
            ring_q.ntt(&mut src[i]);
            ring_q_mul.ntt(&mut src_m[i]);
        }

        let (src, acc) = self.pool_q.split_at_mut(4);
        let (src_m, acc_m) = self.pool_q_mul.split_at_mut(4);

        // degree 0: a0*b0
        ring_q.mul_mont(&src[0], &src[2], &mut acc[0]);
        ring_q_mul.mul_mont(&src_m[0], &src_m[2], &mut acc_m[0]);
        // degree 1: a0*b1 + a1*b0
        ring_q.mul_mont(&src[0], &src[3], &mut acc[1]);
        ring_q_mul.mul_mont(&src_m[0], &src_m[3], &mut acc_m[1]);
        ring_q.mul_mont_add(&src[1], &src[2], &mut acc[1]);
        ring_q_mul.mul_mont_add(&src_m[1], &src_m[2], &mut acc_m[1]);
        // degree 2: a1*b1
        ring_q.mul_mont(&src[1], &src[3], &mut acc[2]);
        ring_q_mul.mul_mont(&src_m[1], &src_m[3], &mut acc_m[2]);

        // rescale by (X^D - B)/Q
        let d = self.params.slots();
        for i in 0..3 {
            ring_q.intt(&mut acc[i]);
            ring_q_mul.intt(&mut acc_m[i]);
            self.conv.mod_down_qp_to_q(&mut acc[i], &acc_m[i]);
            ring_q.mul_by_monomial(&acc[i], d, &mut self.pool_ct_mul.value[i]);
            ring_q.mul_scalar_bigint_assign(&mut acc[i], &self.b_big);
            ring_q.sub_assign(&mut self.pool_ct_mul.value[i], &acc[i]);
        }
    }

    /// Hoisted tensor: the left operand arrives already extended.
    fn tensor_and_rescale_hoisted(&mut self, ct0: &[ExtPoly; 2], ct1: &Ciphertext) {
        assert!(ct1.degree() == 1, "tensoring expects degree-1 ciphertexts");
        let ring_q = self.params.ring_q().clone();
        let ring_q_mul = self.params.ring_q_mul().clone();

        for i in 0..2 {
            self.pool_q[2 + i].copy_from(&ct1.value[i]);
        }
        let (src, acc) = self.pool_q.split_at_mut(4);
        let (src_m, acc_m) = self.pool_q_mul.split_at_mut(4);
        for i in 2..4 {
            self.conv.mod_up_q_to_p(&src[i], &mut src_m[i]);
            ring_q.ntt(&mut src[i]);
            ring_q_mul.ntt(&mut src_m[i]);
        }

        ring_q.mul_mont(&ct0[0].q, &src[2], &mut acc[0]);
        ring_q_mul.mul_mont(&ct0[0].q_mul, &src_m[2], &mut acc_m[0]);
        ring_q.mul_mont(&ct0[0].q, &src[3], &mut acc[1]);
        ring_q_mul.mul_mont(&ct0[0].q_mul, &src_m[3], &mut acc_m[1]);
        ring_q.mul_mont_add(&ct0[1].q, &src[2], &mut acc[1]);
        ring_q_mul.mul_mont_add(&ct0[1].q_mul, &src_m[2], &mut acc_m[1]);
        ring_q.mul_mont(&ct0[1].q, &src[3], &mut acc[2]);
        ring_q_mul.mul_mont(&ct0[1].q_mul, &src_m[3], &mut acc_m[2]);

        let d = self.params.slots();
        for i in 0..3 {
            ring_q.intt(&mut acc[i]);
            ring_q_mul.intt(&mut acc_m[i]);
            self.conv.mod_down_qp_to_q(&mut acc[i], &acc_m[i]);
            ring_q.mul_by_monomial(&acc[i], d, &mut self.pool_ct_mul.value[i]);
            ring_q.mul_scalar_bigint_assign(&mut acc[i], &self.b_big);
            ring_q.sub_assign(&mut self.pool_ct_mul.value[i], &acc[i]);
        }
    }

    /// Folds the degree-2 term of the product pool back onto `(1, s)`
    /// through the relinearisation key.
    fn relinearize(&mut self, rlk: &RelinearizationKey, ct_out: &mut Ciphertext) {
        assert!(!rlk.keys.is_empty(), "missing relinearization key");
        let ring = self.params.ring_q().clone();
        let deg = self.pool_ct_mul.degree();
        ct_out.resize(&self.params, 1);
        ct_out.value[0].copy_from(&self.pool_ct_mul.value[0]);
        ct_out.value[1].copy_from(&self.pool_ct_mul.value[1]);
        for d in (2..=deg).rev() {
            self.ksw
                .gadget_product(&self.pool_ct_mul.value[d], &rlk.keys[d - 2], &mut self.pool_ks);
            ring.add_assign(&mut ct_out.value[0], &self.pool_ks.value[0]);
            ring.add_assign(&mut ct_out.value[1], &self.pool_ks.value[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint_dig::BigInt;

    use crate::testing::{self, TestContext};
    use crate::utils::mod_floor;

    fn slotwise(
        ctx: &TestContext,
        f: impl Fn(&BigInt, &BigInt) -> BigInt,
        m0: &crate::Message,
        m1: &crate::Message,
    ) -> Vec<BigInt> {
        let t = ctx.params.t().clone();
        m0.value
            .iter()
            .zip(m1.value.iter())
            .map(|(a, b)| mod_floor(&f(a, b), &t))
            .collect()
    }

    #[test]
    fn additive_homomorphism() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(20);
        let m0 = testing::random_message(&ctx.params, &mut rng);
        let m1 = testing::random_message(&ctx.params, &mut rng);
        let want = slotwise(&ctx, |a, b| a + b, &m0, &m1);

        let ct0 = ctx.encryptor.encrypt_msg_new(&m0);
        let ct1 = ctx.encryptor.encrypt_msg_new(&m1);
        let ct = ctx.evaluator.add_new(&ct0, &ct1);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&ct).value, want);
    }

    #[test]
    fn subtractive_homomorphism() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(21);
        let m0 = testing::random_message(&ctx.params, &mut rng);
        let m1 = testing::random_message(&ctx.params, &mut rng);
        let want = slotwise(&ctx, |a, b| a - b, &m0, &m1);

        let ct0 = ctx.encryptor.encrypt_msg_new(&m0);
        let ct1 = ctx.encryptor.encrypt_msg_new(&m1);
        let ct = ctx.evaluator.sub_new(&ct0, &ct1);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&ct).value, want);
    }

    #[test]
    fn negation() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(22);
        let m = testing::random_message(&ctx.params, &mut rng);
        let t = ctx.params.t().clone();
        let want: Vec<BigInt> = m.value.iter().map(|a| mod_floor(&(-a), &t)).collect();

        let ct = ctx.encryptor.encrypt_msg_new(&m);
        let out = ctx.evaluator.neg_new(&ct);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&out).value, want);
    }

    #[test]
    fn multiplicative_homomorphism() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(23);
        let m0 = testing::random_message(&ctx.params, &mut rng);
        let m1 = testing::random_message(&ctx.params, &mut rng);
        let want = slotwise(&ctx, |a, b| a * b, &m0, &m1);

        let ct0 = ctx.encryptor.encrypt_msg_new(&m0);
        let ct1 = ctx.encryptor.encrypt_msg_new(&m1);
        let rlk = ctx.rlk.clone();
        let ct = ctx.evaluator.mul_and_relin_new(&ct0, &ct1, &rlk);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&ct).value, want);
    }

    #[test]
    fn squaring_with_aliased_operands() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(24);
        let m = testing::random_message(&ctx.params, &mut rng);
        let want = slotwise(&ctx, |a, b| a * b, &m, &m);

        let ct = ctx.encryptor.encrypt_msg_new(&m);
        let rlk = ctx.rlk.clone();
        let sq = ctx.evaluator.mul_and_relin_new(&ct, &ct, &rlk);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&sq).value, want);
    }

    #[test]
    fn hoisted_multiply_matches_plain_multiply() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(25);
        let m0 = testing::random_message(&ctx.params, &mut rng);
        let m1 = testing::random_message(&ctx.params, &mut rng);

        let ct0 = ctx.encryptor.encrypt_msg_new(&m0);
        let ct1 = ctx.encryptor.encrypt_msg_new(&m1);
        let rlk = ctx.rlk.clone();
        let plain = ctx.evaluator.mul_and_relin_new(&ct0, &ct1, &rlk);

        let ext = ctx.evaluator.extend_left_new(&ct0);
        let mut hoisted = crate::Ciphertext::new(&ctx.params, 1);
        ctx.evaluator
            .mul_and_relin_hoisted(&ext, &ct1, &rlk, &mut hoisted);

        assert_eq!(
            ctx.decryptor.decrypt_to_msg_new(&hoisted).value,
            ctx.decryptor.decrypt_to_msg_new(&plain).value
        );
    }

    #[test]
    fn rotations_by_powers_of_two() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(26);
        let m = testing::random_message(&ctx.params, &mut rng);
        let slots = ctx.params.slots();

        let ct = ctx.encryptor.encrypt_msg_new(&m);
        let rtks = ctx.rtks.clone();
        let mut rot = 1;
        while rot < slots {
            let out = ctx.evaluator.rotate_columns_new(&ct, &rtks, rot);
            let got = ctx.decryptor.decrypt_to_msg_new(&out);
            for i in 0..slots {
                assert_eq!(got.value[i], m.value[(i + rot) % slots], "rotation {rot}");
            }
            rot *= 2;
        }
    }

    #[test]
    fn rotation_by_zero_copies() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(27);
        let m = testing::random_message(&ctx.params, &mut rng);
        let ct = ctx.encryptor.encrypt_msg_new(&m);
        let rtks = ctx.rtks.clone();
        let out = ctx.evaluator.rotate_columns_new(&ct, &rtks, 0);
        assert_eq!(out, ct);
    }

    #[test]
    #[should_panic(expected = "no rotation key")]
    fn missing_rotation_key_is_fatal() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(28);
        let m = testing::random_message(&ctx.params, &mut rng);
        let ct = ctx.encryptor.encrypt_msg_new(&m);
        let empty = crate::rlwe::RotationKeySet::default();
        ctx.evaluator.rotate_columns_new(&ct, &empty, 3);
    }

    #[test]
    fn output_buffer_reuse_is_stable() {
        let mut ctx = testing::context();
        let mut rng = testing::seeded_rng(29);
        let m0 = testing::random_message(&ctx.params, &mut rng);
        let m1 = testing::random_message(&ctx.params, &mut rng);
        let want = slotwise(&ctx, |a, b| a + b, &m0, &m1);

        let ct0 = ctx.encryptor.encrypt_msg_new(&m0);
        let ct1 = ctx.encryptor.encrypt_msg_new(&m1);
        // an output buffer that already holds operand data
        let mut out = ct0.clone();
        ctx.evaluator.add(&ct0, &ct1, &mut out);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&out).value, want);
        // and reused again for an unrelated op
        ctx.evaluator.sub(&ct0, &ct1, &mut out);
        let want_sub = slotwise(&ctx, |a, b| a - b, &m0, &m1);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&out).value, want_sub);
    }
}
