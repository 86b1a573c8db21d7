use crate::utils::{bit_reverse, mod_exp};

/// Montgomery arithmetic for one RNS prime, radix `2^64`.
#[derive(Clone, Debug)]
pub struct PrimeOps {
    pub(crate) q: u64,
    /// `-q^{-1} mod 2^64`.
    q_neg_inv: u64,
    /// `2^128 mod q`, for mapping into Montgomery form.
    r2: u64,
}

impl PrimeOps {
    pub fn new(q: u64) -> Self {
        assert!(q & 1 == 1 && q > 1 && q < 1 << 62, "unsupported modulus {q}");
        let mut inv = q;
        for _ in 0..6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(q.wrapping_mul(inv)));
        }
        let r = ((1u128 << 64) % q as u128) as u64;
        let r2 = ((r as u128 * r as u128) % q as u128) as u64;
        Self {
            q,
            q_neg_inv: inv.wrapping_neg(),
            r2,
        }
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        let s = a + b;
        if s >= self.q {
            s - self.q
        } else {
            s
        }
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            a + self.q - b
        }
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        if a == 0 {
            0
        } else {
            self.q - a
        }
    }

    /// Montgomery reduction of a double-width product, result in `[0, q)`.
    #[inline]
    pub fn mred(&self, t: u128) -> u64 {
        let m = (t as u64).wrapping_mul(self.q_neg_inv);
        let u = ((t + m as u128 * self.q as u128) >> 64) as u64;
        if u >= self.q {
            u - self.q
        } else {
            u
        }
    }

    /// Montgomery reduction without the final conditional subtraction,
    /// result in `[0, 2q)`. Feeds the no-reduction accumulator loops.
    #[inline]
    pub fn mred_lazy(&self, t: u128) -> u64 {
        let m = (t as u64).wrapping_mul(self.q_neg_inv);
        ((t + m as u128 * self.q as u128) >> 64) as u64
    }

    /// `a * b / 2^64 mod q`; with one operand in Montgomery form this is the
    /// plain product.
    #[inline]
    pub fn mul_mont(&self, a: u64, b: u64) -> u64 {
        self.mred(a as u128 * b as u128)
    }

    /// Maps `a` into Montgomery form, `a * 2^64 mod q`.
    #[inline]
    pub fn mform(&self, a: u64) -> u64 {
        self.mul_mont(a, self.r2)
    }

    #[inline]
    pub fn reduce(&self, a: u64) -> u64 {
        a % self.q
    }
}

/// Negacyclic NTT tables for one prime: powers of a `2n`-th root of unity in
/// bit-reversed order, Montgomery form.
#[derive(Clone, Debug)]
pub(crate) struct NttTables {
    psi_rev: Vec<u64>,
    psi_inv_rev: Vec<u64>,
    /// `n^{-1}` in Montgomery form, folded into the inverse transform.
    n_inv: u64,
}

impl NttTables {
    pub fn new(ops: &PrimeOps, n: usize, log_n: u32) -> Self {
        let q = ops.q;
        assert!(
            (q - 1) % (2 * n as u64) == 0,
            "modulus {q} is not NTT-friendly for degree {n}"
        );
        // Search for psi: x^((q-1)/2n) is a primitive 2n-th root of unity
        // exactly when x is a quadratic non-residue.
        let mut psi = 0;
        for x in 2u64.. {
            let c = mod_exp(x, (q - 1) / (2 * n as u64), q);
            if mod_exp(c, n as u64, q) == q - 1 {
                psi = c;
                break;
            }
        }
        let psi_inv = mod_exp(psi, q - 2, q);
        let mut psi_rev = vec![0u64; n];
        let mut psi_inv_rev = vec![0u64; n];
        for i in 0..n {
            let r = bit_reverse(i, log_n);
            psi_rev[i] = ops.mform(mod_exp(psi, r as u64, q));
            psi_inv_rev[i] = ops.mform(mod_exp(psi_inv, r as u64, q));
        }
        let n_inv = ops.mform(mod_exp(n as u64, q - 2, q));
        Self {
            psi_rev,
            psi_inv_rev,
            n_inv,
        }
    }

    /// In-place forward negacyclic NTT, Cooley-Tukey butterflies.
    pub fn forward(&self, ops: &PrimeOps, a: &mut [u64]) {
        let n = a.len();
        let mut t = n;
        let mut m = 1;
        while m < n {
            t >>= 1;
            for i in 0..m {
                let j1 = 2 * i * t;
                let s = self.psi_rev[m + i];
                for j in j1..j1 + t {
                    let u = a[j];
                    let v = ops.mul_mont(a[j + t], s);
                    a[j] = ops.add(u, v);
                    a[j + t] = ops.sub(u, v);
                }
            }
            m <<= 1;
        }
    }

    /// In-place inverse negacyclic NTT, Gentleman-Sande butterflies.
    pub fn backward(&self, ops: &PrimeOps, a: &mut [u64]) {
        let n = a.len();
        let mut t = 1;
        let mut m = n;
        while m > 1 {
            let h = m >> 1;
            let mut j1 = 0;
            for i in 0..h {
                let s = self.psi_inv_rev[h + i];
                for j in j1..j1 + t {
                    let u = a[j];
                    let v = a[j + t];
                    a[j] = ops.add(u, v);
                    a[j + t] = ops.mul_mont(ops.sub(u, v), s);
                }
                j1 += 2 * t;
            }
            t <<= 1;
            m = h;
        }
        for v in a.iter_mut() {
            *v = ops.mul_mont(*v, self.n_inv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    const Q: u64 = 0x100021;

    #[test]
    fn montgomery_matches_plain_arithmetic() {
        let ops = PrimeOps::new(Q);
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let a = rng.gen_range(0..Q);
            let b = rng.gen_range(0..Q);
            let am = ops.mform(a);
            assert_eq!(ops.mul_mont(am, b), (a as u128 * b as u128 % Q as u128) as u64);
            let lazy = ops.mred_lazy(am as u128 * b as u128);
            assert!(lazy < 2 * Q);
            assert_eq!(ops.reduce(lazy), (a as u128 * b as u128 % Q as u128) as u64);
        }
    }

    #[test]
    fn ntt_roundtrip() {
        let ops = PrimeOps::new(Q);
        let tables = NttTables::new(&ops, 16, 4);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let orig: Vec<u64> = (0..16).map(|_| rng.gen_range(0..Q)).collect();
        let mut a = orig.clone();
        tables.forward(&ops, &mut a);
        assert_ne!(a, orig);
        tables.backward(&ops, &mut a);
        assert_eq!(a, orig);
    }

    #[test]
    fn pointwise_product_is_negacyclic_convolution() {
        let n = 16;
        let ops = PrimeOps::new(Q);
        let tables = NttTables::new(&ops, n, 4);
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let a: Vec<u64> = (0..n).map(|_| rng.gen_range(0..Q)).collect();
        let b: Vec<u64> = (0..n).map(|_| rng.gen_range(0..Q)).collect();

        let mut want = vec![0i128; n];
        for i in 0..n {
            for j in 0..n {
                let p = a[i] as i128 * b[j] as i128;
                if i + j < n {
                    want[i + j] += p;
                } else {
                    want[i + j - n] -= p;
                }
            }
        }
        let want: Vec<u64> = want.iter().map(|v| v.rem_euclid(Q as i128) as u64).collect();

        let mut fa = a.clone();
        let mut fb = b.clone();
        tables.forward(&ops, &mut fa);
        tables.forward(&ops, &mut fb);
        let mut fc: Vec<u64> = fa
            .iter()
            .zip(fb.iter())
            .map(|(&x, &y)| ops.mul_mont(ops.mform(x), y))
            .collect();
        tables.backward(&ops, &mut fc);
        assert_eq!(fc, want);
    }
}
