//! Fast RNS base conversion between two modulus chains.
//!
//! The extensions are the standard approximate conversions: the lifted
//! value may carry a small multiple of the source modulus, which the
//! scheme's rescaling steps absorb as noise.

use std::sync::Arc;

use itertools::izip;
use num_bigint_dig::BigInt;
use num_traits::ToPrimitive;

use super::{Poly, Ring};
use crate::utils::mod_exp;

/// Precomputed conversion tables between a source chain `Q` and a target
/// chain `P` of the same ring degree.
pub struct BasisExtender {
    ring_q: Arc<Ring>,
    ring_p: Arc<Ring>,
    /// `(Q/q_i)^{-1} mod q_i`.
    qhat_inv_mod_q: Vec<u64>,
    /// `(Q/q_i) mod p_j`, indexed `[i][j]`.
    qhat_mod_p: Vec<Vec<u64>>,
    phat_inv_mod_p: Vec<u64>,
    phat_mod_q: Vec<Vec<u64>>,
    /// `P^{-1} mod q_i`.
    p_inv_mod_q: Vec<u64>,
    /// `Q^{-1} mod p_j`.
    q_inv_mod_p: Vec<u64>,
    scratch_q: Poly,
}

fn hat_tables(src: &Ring, dst: &Ring) -> (Vec<u64>, Vec<Vec<u64>>) {
    let mut hat_inv = Vec::with_capacity(src.level_count());
    let mut hat_mod_dst = Vec::with_capacity(src.level_count());
    for &q in src.moduli() {
        let hat = src.modulus_big() / BigInt::from(q);
        let hat_mod_q = (&hat % BigInt::from(q)).to_u64().unwrap();
        hat_inv.push(mod_exp(hat_mod_q, q - 2, q));
        hat_mod_dst.push(
            dst.moduli()
                .iter()
                .map(|&p| (&hat % BigInt::from(p)).to_u64().unwrap())
                .collect(),
        );
    }
    (hat_inv, hat_mod_dst)
}

fn inv_mod_each(modulus: &BigInt, dst: &Ring) -> Vec<u64> {
    dst.moduli()
        .iter()
        .map(|&p| {
            let m = (modulus % BigInt::from(p)).to_u64().unwrap();
            mod_exp(m, p - 2, p)
        })
        .collect()
}

impl BasisExtender {
    pub fn new(ring_q: Arc<Ring>, ring_p: Arc<Ring>) -> Self {
        assert_eq!(ring_q.n(), ring_p.n(), "mismatched ring degrees");
        let (qhat_inv_mod_q, qhat_mod_p) = hat_tables(&ring_q, &ring_p);
        let (phat_inv_mod_p, phat_mod_q) = hat_tables(&ring_p, &ring_q);
        let p_inv_mod_q = inv_mod_each(ring_p.modulus_big(), &ring_q);
        let q_inv_mod_p = inv_mod_each(ring_q.modulus_big(), &ring_p);
        let scratch_q = ring_q.new_poly();
        Self {
            ring_q,
            ring_p,
            qhat_inv_mod_q,
            qhat_mod_p,
            phat_inv_mod_p,
            phat_mod_q,
            p_inv_mod_q,
            q_inv_mod_p,
            scratch_q,
        }
    }

    /// Extends `a` from the `Q` chain to the `P` chain.
    pub fn mod_up_q_to_p(&self, a_q: &Poly, out_p: &mut Poly) {
        Self::extend_impl(
            &self.ring_q,
            &self.ring_p,
            &self.qhat_inv_mod_q,
            &self.qhat_mod_p,
            a_q,
            out_p,
        );
    }

    /// Extends `a` from the `P` chain to the `Q` chain.
    pub fn mod_up_p_to_q(&self, a_p: &Poly, out_q: &mut Poly) {
        Self::extend_impl(
            &self.ring_p,
            &self.ring_q,
            &self.phat_inv_mod_p,
            &self.phat_mod_q,
            a_p,
            out_q,
        );
    }

    fn extend_impl(
        src: &Ring,
        dst: &Ring,
        hat_inv: &[u64],
        hat_mod_dst: &[Vec<u64>],
        a: &Poly,
        out: &mut Poly,
    ) {
        let n = src.n();
        let mut digits = vec![0u64; src.level_count()];
        for idx in 0..n {
            for (d, &q, &inv, row) in izip!(&mut digits, src.moduli(), hat_inv, &a.coeffs) {
                *d = (row[idx] as u128 * inv as u128 % q as u128) as u64;
            }
            for (j, (&p, out_row)) in izip!(dst.moduli(), &mut out.coeffs).enumerate() {
                let mut acc: u128 = 0;
                for (i, &d) in digits.iter().enumerate() {
                    acc += d as u128 * hat_mod_dst[i][j] as u128;
                    // keep the accumulator clear of the 128-bit boundary on
                    // long chains
                    if i & 7 == 7 {
                        acc %= p as u128;
                    }
                }
                out_row[idx] = (acc % p as u128) as u64;
            }
        }
    }

    /// Divides a `(Q, P)` representation by `P`, writing the result over
    /// `a_q` in place: `a_q <- (a_q - lift(a_p)) * P^{-1} mod Q`.
    pub fn mod_down_qp_to_q(&mut self, a_q: &mut Poly, a_p: &Poly) {
        Self::extend_impl(
            &self.ring_p,
            &self.ring_q,
            &self.phat_inv_mod_p,
            &self.phat_mod_q,
            a_p,
            &mut self.scratch_q,
        );
        for (o, &inv, ra, rl) in izip!(
            self.ring_q.prime_ops(),
            &self.p_inv_mod_q,
            &mut a_q.coeffs,
            &self.scratch_q.coeffs
        ) {
            let q = o.q;
            for (x, l) in izip!(ra, rl) {
                let diff = o.sub(*x, *l);
                *x = (diff as u128 * inv as u128 % q as u128) as u64;
            }
        }
    }

    /// Division by `Q` of a value whose `P` component is zero:
    /// `out_p = (0 - lift(a_q)) * Q^{-1} mod P`. This is the half of the
    /// hoisted extension that produces the `P` part of
    /// `round(a * P / Q)`.
    pub fn mod_down_q_to_p(&self, a_q: &Poly, out_p: &mut Poly) {
        Self::extend_impl(
            &self.ring_q,
            &self.ring_p,
            &self.qhat_inv_mod_q,
            &self.qhat_mod_p,
            a_q,
            out_p,
        );
        for (o, &inv, row) in izip!(self.ring_p.prime_ops(), &self.q_inv_mod_p, &mut out_p.coeffs)
        {
            let p = o.q;
            for v in row.iter_mut() {
                *v = (o.neg(*v) as u128 * inv as u128 % p as u128) as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint_dig::RandBigInt;
    use num_traits::Zero;
    use rand::{rngs::StdRng, SeedableRng};

    const Q_MODULI: [u64; 2] = [0x100021, 0x100141];
    const P_MODULI: [u64; 3] = [0x1001e1, 0x200041, 0x2000a1];

    #[test]
    fn mod_up_lifts_with_small_overshoot() {
        let ring_q = Ring::new(16, &Q_MODULI);
        let ring_p = Ring::new(16, &P_MODULI);
        let conv = BasisExtender::new(ring_q.clone(), ring_p.clone());
        let mut rng = StdRng::seed_from_u64(10);

        let vals: Vec<BigInt> = (0..16)
            .map(|_| rng.gen_bigint_range(&BigInt::zero(), ring_q.modulus_big()))
            .collect();
        let mut a = ring_q.new_poly();
        ring_q.from_bigint(&vals, &mut a);
        let mut lifted = ring_p.new_poly();
        conv.mod_up_q_to_p(&a, &mut lifted);

        // P > levels*Q here, so the lifted value is exactly x + alpha*Q with
        // alpha < level count.
        let mut out = vec![BigInt::zero(); 16];
        ring_p.to_bigint(&lifted, 1, &mut out);
        for (v, l) in vals.iter().zip(out.iter()) {
            let overshoot = l - v;
            let alpha = &overshoot / ring_q.modulus_big();
            assert_eq!(&alpha * ring_q.modulus_big(), overshoot);
            assert!(alpha >= BigInt::zero() && alpha < BigInt::from(Q_MODULI.len() as u64));
        }
    }

    #[test]
    fn mod_down_divides_by_p() {
        let ring_q = Ring::new(16, &Q_MODULI);
        let ring_p = Ring::new(16, &P_MODULI);
        let mut conv = BasisExtender::new(ring_q.clone(), ring_p.clone());
        let mut rng = StdRng::seed_from_u64(11);

        // z = y*P + r with y well below Q and clear of zero so the small
        // downward conversion error cannot wrap.
        let bound = ring_q.modulus_big() / BigInt::from(16u64);
        let ys: Vec<BigInt> = (0..16)
            .map(|_| rng.gen_bigint_range(&BigInt::from(16u64), &bound))
            .collect();
        let zs: Vec<BigInt> = ys
            .iter()
            .map(|y| {
                y * ring_p.modulus_big()
                    + rng.gen_bigint_range(&BigInt::zero(), ring_p.modulus_big())
            })
            .collect();
        let mut a_q = ring_q.new_poly();
        ring_q.from_bigint(&zs, &mut a_q);
        let mut a_p = ring_p.new_poly();
        ring_p.from_bigint(&zs, &mut a_p);

        conv.mod_down_qp_to_q(&mut a_q, &a_p);
        let mut got = vec![BigInt::zero(); 16];
        ring_q.to_bigint(&a_q, 1, &mut got);
        let slack = BigInt::from(P_MODULI.len() as u64 + 1);
        for (y, g) in ys.iter().zip(got.iter()) {
            let err = g - y;
            assert!(
                err >= -&slack && err <= slack,
                "error {err} too large for quotient {y}"
            );
        }
    }
}
