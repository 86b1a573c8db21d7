//! RNS negacyclic polynomial ring `Z_Q[X]/(X^N + 1)`.
//!
//! A [`Poly`] stores one residue row per prime of the chain; all arithmetic
//! is elementwise over the rows. The NTT keeps values in plain form and its
//! twiddle factors in Montgomery form, so a polynomial is only mapped with
//! [`Ring::mform`] when it is about to be the left operand of a Montgomery
//! pointwise product.

use std::sync::Arc;

use itertools::izip;
use num_bigint_dig::BigInt;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::utils::{bit_reverse, mod_floor};

mod basis;
mod ntt;

pub use basis::BasisExtender;
pub use ntt::PrimeOps;
use ntt::NttTables;

/// Polynomial in RNS representation: `coeffs[i][j]` is the `j`-th
/// coefficient modulo the `i`-th prime of the ring's chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poly {
    pub(crate) coeffs: Vec<Vec<u64>>,
}

impl Poly {
    pub fn zero(&mut self) {
        for row in self.coeffs.iter_mut() {
            row.fill(0);
        }
    }

    pub fn copy_from(&mut self, other: &Poly) {
        debug_assert_eq!(self.coeffs.len(), other.coeffs.len());
        for (dst, src) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
            dst.copy_from_slice(src);
        }
    }
}

/// Ring operations over a fixed RNS chain.
#[derive(Debug)]
pub struct Ring {
    n: usize,
    log_n: u32,
    moduli: Vec<u64>,
    ops: Vec<PrimeOps>,
    tables: Vec<NttTables>,
    modulus_big: BigInt,
    /// CRT reconstruction constants `(Q/q_i) * ((Q/q_i)^{-1} mod q_i)`.
    crt: Vec<BigInt>,
}

impl Ring {
    /// Builds the ring; panics if `n` is not a power of two or any modulus
    /// is not NTT-friendly for degree `n`.
    pub fn new(n: usize, moduli: &[u64]) -> Arc<Ring> {
        assert!(n.is_power_of_two() && n >= 8, "invalid ring degree {n}");
        assert!(!moduli.is_empty(), "empty modulus chain");
        let log_n = n.trailing_zeros();
        let ops: Vec<PrimeOps> = moduli.iter().map(|&q| PrimeOps::new(q)).collect();
        let tables: Vec<NttTables> = ops.iter().map(|o| NttTables::new(o, n, log_n)).collect();
        let mut modulus_big = BigInt::from(1u64);
        for &q in moduli {
            modulus_big *= BigInt::from(q);
        }
        let crt: Vec<BigInt> = moduli
            .iter()
            .map(|&q| {
                let qhat = &modulus_big / BigInt::from(q);
                let qhat_inv = crate::utils::mod_exp(
                    (&qhat % BigInt::from(q)).to_u64().unwrap(),
                    q - 2,
                    q,
                );
                qhat * BigInt::from(qhat_inv) % &modulus_big
            })
            .collect();
        Arc::new(Ring {
            n,
            log_n,
            moduli: moduli.to_vec(),
            ops,
            tables,
            modulus_big,
            crt,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    pub fn level_count(&self) -> usize {
        self.moduli.len()
    }

    pub(crate) fn prime_ops(&self) -> &[PrimeOps] {
        &self.ops
    }

    /// The full modulus `Q` as a big integer.
    pub fn modulus_big(&self) -> &BigInt {
        &self.modulus_big
    }

    pub fn new_poly(&self) -> Poly {
        Poly {
            coeffs: vec![vec![0u64; self.n]; self.moduli.len()],
        }
    }

    pub fn add(&self, a: &Poly, b: &Poly, c: &mut Poly) {
        for (o, ra, rb, rc) in izip!(&self.ops, &a.coeffs, &b.coeffs, &mut c.coeffs) {
            for (x, y, z) in izip!(ra, rb, rc) {
                *z = o.add(*x, *y);
            }
        }
    }

    pub fn add_assign(&self, a: &mut Poly, b: &Poly) {
        for (o, ra, rb) in izip!(&self.ops, &mut a.coeffs, &b.coeffs) {
            for (x, y) in izip!(ra, rb) {
                *x = o.add(*x, *y);
            }
        }
    }

    pub fn sub(&self, a: &Poly, b: &Poly, c: &mut Poly) {
        for (o, ra, rb, rc) in izip!(&self.ops, &a.coeffs, &b.coeffs, &mut c.coeffs) {
            for (x, y, z) in izip!(ra, rb, rc) {
                *z = o.sub(*x, *y);
            }
        }
    }

    pub fn sub_assign(&self, a: &mut Poly, b: &Poly) {
        for (o, ra, rb) in izip!(&self.ops, &mut a.coeffs, &b.coeffs) {
            for (x, y) in izip!(ra, rb) {
                *x = o.sub(*x, *y);
            }
        }
    }

    pub fn neg(&self, a: &Poly, c: &mut Poly) {
        for (o, ra, rc) in izip!(&self.ops, &a.coeffs, &mut c.coeffs) {
            for (x, z) in izip!(ra, rc) {
                *z = o.neg(*x);
            }
        }
    }

    pub fn ntt(&self, a: &mut Poly) {
        for (o, t, row) in izip!(&self.ops, &self.tables, &mut a.coeffs) {
            t.forward(o, row);
        }
    }

    pub fn intt(&self, a: &mut Poly) {
        for (o, t, row) in izip!(&self.ops, &self.tables, &mut a.coeffs) {
            t.backward(o, row);
        }
    }

    /// Maps every residue into Montgomery form.
    pub fn mform(&self, a: &mut Poly) {
        for (o, row) in izip!(&self.ops, &mut a.coeffs) {
            for v in row.iter_mut() {
                *v = o.mform(*v);
            }
        }
    }

    /// Pointwise Montgomery product; with `a` in Montgomery form and `b`
    /// plain, the result is plain.
    pub fn mul_mont(&self, a: &Poly, b: &Poly, c: &mut Poly) {
        for (o, ra, rb, rc) in izip!(&self.ops, &a.coeffs, &b.coeffs, &mut c.coeffs) {
            for (x, y, z) in izip!(ra, rb, rc) {
                *z = o.mul_mont(*x, *y);
            }
        }
    }

    /// In-place pointwise Montgomery product, `a <- a * b / 2^64`.
    pub fn mul_mont_assign(&self, a: &mut Poly, b: &Poly) {
        for (o, ra, rb) in izip!(&self.ops, &mut a.coeffs, &b.coeffs) {
            for (x, y) in izip!(ra, rb) {
                *x = o.mul_mont(*x, *y);
            }
        }
    }

    /// Pointwise Montgomery multiply-accumulate with full reduction.
    pub fn mul_mont_add(&self, a: &Poly, b: &Poly, acc: &mut Poly) {
        for (o, ra, rb, rc) in izip!(&self.ops, &a.coeffs, &b.coeffs, &mut acc.coeffs) {
            for (x, y, z) in izip!(ra, rb, rc) {
                *z = o.add(*z, o.mul_mont(*x, *y));
            }
        }
    }

    /// Lazy multiply-accumulate: adds products in `[0, 2q)` without any
    /// reduction of the accumulator. The caller owns the overflow margin and
    /// must interleave [`Ring::reduce`] calls accordingly.
    pub fn mul_mont_lazy_add(&self, a: &Poly, b: &Poly, acc: &mut Poly) {
        for (o, ra, rb, rc) in izip!(&self.ops, &a.coeffs, &b.coeffs, &mut acc.coeffs) {
            for (x, y, z) in izip!(ra, rb, rc) {
                *z = z.wrapping_add(o.mred_lazy(*x as u128 * *y as u128));
            }
        }
    }

    /// Reduces every residue of a lazy accumulator back into `[0, q)`.
    pub fn reduce(&self, a: &mut Poly) {
        for (o, row) in izip!(&self.ops, &mut a.coeffs) {
            for v in row.iter_mut() {
                *v = o.reduce(*v);
            }
        }
    }

    /// Multiplies by a big-integer scalar, reduced per prime.
    pub fn mul_scalar_bigint(&self, a: &Poly, s: &BigInt, c: &mut Poly) {
        for (o, &q, ra, rc) in izip!(&self.ops, &self.moduli, &a.coeffs, &mut c.coeffs) {
            let sm = o.mform(mod_floor(s, &BigInt::from(q)).to_u64().unwrap());
            for (x, z) in izip!(ra, rc) {
                *z = o.mul_mont(*x, sm);
            }
        }
    }

    pub fn mul_scalar_bigint_assign(&self, a: &mut Poly, s: &BigInt) {
        for (o, &q, ra) in izip!(&self.ops, &self.moduli, &mut a.coeffs) {
            let sm = o.mform(mod_floor(s, &BigInt::from(q)).to_u64().unwrap());
            for x in ra.iter_mut() {
                *x = o.mul_mont(*x, sm);
            }
        }
    }

    /// Multiplies by the monomial `X^k` in the negacyclic ring.
    pub fn mul_by_monomial(&self, a: &Poly, k: usize, c: &mut Poly) {
        debug_assert!(k < self.n);
        for (o, ra, rc) in izip!(&self.ops, &a.coeffs, &mut c.coeffs) {
            for i in 0..self.n {
                let j = i + k;
                if j < self.n {
                    rc[j] = ra[i];
                } else {
                    rc[j - self.n] = o.neg(ra[i]);
                }
            }
        }
    }

    /// Applies the Galois automorphism `X -> X^g` in the coefficient
    /// domain; `g` must be odd.
    pub fn permute(&self, a: &Poly, gal_el: u64, c: &mut Poly) {
        debug_assert!(gal_el & 1 == 1);
        let two_n = 2 * self.n as u64;
        for (o, ra, rc) in izip!(&self.ops, &a.coeffs, &mut c.coeffs) {
            for i in 0..self.n {
                let j = (i as u64 * gal_el % two_n) as usize;
                if j < self.n {
                    rc[j] = ra[i];
                } else {
                    rc[j - self.n] = o.neg(ra[i]);
                }
            }
        }
    }

    /// Index table realising the same automorphism on NTT-domain
    /// polynomials: `out[j] = in[index[j]]`.
    pub fn permute_ntt_index(&self, gal_el: u64) -> Vec<usize> {
        debug_assert!(gal_el & 1 == 1);
        let mask = self.n - 1;
        (0..self.n)
            .map(|j| {
                let jr = bit_reverse(j, self.log_n);
                bit_reverse((((2 * jr + 1) * gal_el as usize) >> 1) & mask, self.log_n)
            })
            .collect()
    }

    pub fn permute_ntt(&self, a: &Poly, index: &[usize], c: &mut Poly) {
        for (ra, rc) in izip!(&a.coeffs, &mut c.coeffs) {
            for (j, z) in rc.iter_mut().enumerate() {
                *z = ra[index[j]];
            }
        }
    }

    /// CRT-reconstructs coefficients `0, gap, 2*gap, ...` into big integers
    /// in `[0, Q)`.
    pub fn to_bigint(&self, a: &Poly, gap: usize, out: &mut [BigInt]) {
        for (i, v) in out.iter_mut().enumerate() {
            let mut acc = BigInt::zero();
            for (row, c) in izip!(&a.coeffs, &self.crt) {
                acc += BigInt::from(row[i * gap]) * c;
            }
            *v = acc % &self.modulus_big;
        }
    }

    /// Reduces (possibly negative) big-integer coefficients into every RNS
    /// row.
    pub fn from_bigint(&self, vals: &[BigInt], c: &mut Poly) {
        debug_assert_eq!(vals.len(), self.n);
        for (&q, rc) in izip!(&self.moduli, &mut c.coeffs) {
            let qb = BigInt::from(q);
            for (v, z) in izip!(vals, rc) {
                *z = mod_floor(v, &qb).to_u64().unwrap();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint_dig::RandBigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MODULI: [u64; 2] = [0x100021, 0x100141];

    fn random_poly(ring: &Ring, rng: &mut StdRng) -> Poly {
        let mut p = ring.new_poly();
        crate::random::fill_uniform(ring, rng, &mut p);
        p
    }

    #[test]
    fn bigint_roundtrip_including_negatives() {
        let ring = Ring::new(16, &MODULI);
        let mut rng = StdRng::seed_from_u64(5);
        let vals: Vec<BigInt> = (0..16)
            .map(|_| rng.gen_bigint_range(&BigInt::from(-1000), &BigInt::from(1000)))
            .collect();
        let mut p = ring.new_poly();
        ring.from_bigint(&vals, &mut p);
        let mut lifted = vec![BigInt::zero(); 16];
        ring.to_bigint(&p, 1, &mut lifted);
        for (v, l) in vals.iter().zip(lifted.iter()) {
            assert_eq!(mod_floor(v, ring.modulus_big()), *l);
        }
    }

    #[test]
    fn ntt_permute_matches_coefficient_permute() {
        let ring = Ring::new(16, &MODULI);
        let mut rng = StdRng::seed_from_u64(6);
        let a = random_poly(&ring, &mut rng);
        for gal_el in [3u64, 5, 9, 31] {
            let mut want = ring.new_poly();
            ring.permute(&a, gal_el, &mut want);
            ring.ntt(&mut want);

            let mut got = a.clone();
            ring.ntt(&mut got);
            let mut out = ring.new_poly();
            ring.permute_ntt(&got, &ring.permute_ntt_index(gal_el), &mut out);
            assert_eq!(out, want, "galois element {gal_el}");
        }
    }

    #[test]
    fn monomial_multiplication_wraps_negacyclically() {
        let ring = Ring::new(16, &MODULI);
        let mut rng = StdRng::seed_from_u64(7);
        let a = random_poly(&ring, &mut rng);
        let mut out = ring.new_poly();
        ring.mul_by_monomial(&a, 3, &mut out);
        for (o, ra, ro) in izip!(ring.prime_ops(), &a.coeffs, &out.coeffs) {
            for i in 0..16 {
                let expect = if i + 3 < 16 { ra[i] } else { o.neg(ra[i]) };
                assert_eq!(ro[(i + 3) % 16], expect);
            }
        }
    }

    #[test]
    fn lazy_accumulation_matches_reduced_accumulation() {
        let ring = Ring::new(16, &MODULI);
        let mut rng = StdRng::seed_from_u64(8);
        let mut acc_lazy = ring.new_poly();
        let mut acc = ring.new_poly();
        for _ in 0..7 {
            let mut a = random_poly(&ring, &mut rng);
            let b = random_poly(&ring, &mut rng);
            ring.mform(&mut a);
            ring.mul_mont_lazy_add(&a, &b, &mut acc_lazy);
            ring.mul_mont_add(&a, &b, &mut acc);
        }
        ring.reduce(&mut acc_lazy);
        assert_eq!(acc_lazy, acc);
    }

    #[test]
    fn scalar_bigint_multiplication() {
        let ring = Ring::new(16, &MODULI);
        let mut rng = StdRng::seed_from_u64(9);
        let a = random_poly(&ring, &mut rng);
        let s = BigInt::from(123456789u64);
        let mut out = ring.new_poly();
        ring.mul_scalar_bigint(&a, &s, &mut out);
        for (&q, ra, ro) in izip!(ring.moduli(), &a.coeffs, &out.coeffs) {
            let sq = 123456789u64 % q;
            for (x, z) in izip!(ra, ro) {
                assert_eq!(*z, (*x as u128 * sq as u128 % q as u128) as u64);
            }
        }
    }
}
