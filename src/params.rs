use std::sync::Arc;

use num_bigint_dig::{prime::probably_prime, BigInt};
use num_traits::{One, Zero};

use crate::ring::Ring;
use crate::utils::mod_exp;

/// Standard deviation of the error distribution.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Raw description of a parameter set. See [`crate::params_list`] for the
/// shipped sets.
#[derive(Clone, Debug)]
pub struct ParametersLiteral {
    /// Log2 of the ring degree.
    pub log_n: usize,
    /// Ciphertext RNS chain.
    pub q: Vec<u64>,
    /// Auxiliary chain for the tensoring step.
    pub q_mul: Vec<u64>,
    /// Error standard deviation.
    pub sigma: f64,
    /// Plaintext base; the plaintext modulus is `B^K + 1`.
    pub b: BigInt,
    /// Slot count, a power of two dividing the ring degree.
    pub d: usize,
    /// Generator of `Z_T^*` with `G^((T-1)/(2K)) = B`.
    pub g: BigInt,
}

impl ParametersLiteral {
    /// Plaintext modulus `T = B^K + 1` of this literal.
    pub fn t(&self) -> BigInt {
        let n = 1usize << self.log_n;
        num_traits::pow(self.b.clone(), n / self.d) + BigInt::one()
    }

    /// Checks every arithmetic invariant the scheme relies on; panics on
    /// the first violation. Ring construction failures are reported by
    /// [`Parameters::new`] instead.
    pub fn validate(&self) {
        let n = 1usize << self.log_n;
        assert!(
            self.d.is_power_of_two() && self.d <= n,
            "slot count must be a power of two dividing the ring degree"
        );
        let k = n / self.d;
        assert!(k * self.d == n, "slot count must divide the ring degree");

        let two_n = BigInt::from(2 * n as u64);
        assert!(
            self.b.modpow(&BigInt::from(k as u64), &two_n).is_zero(),
            "2N must divide B^K"
        );

        let t = self.t();
        assert!(
            probably_prime(&t.to_biguint().expect("T is positive"), 20),
            "plaintext modulus B^K + 1 must be prime"
        );

        // The slot transforms assume the generator reaches B: the 2N-th
        // root derived from G must satisfy Root^D = B.
        let exp = (&t - BigInt::one()) / BigInt::from(2 * n as u64);
        let root = self.g.modpow(&exp, &t);
        assert!(
            root.modpow(&BigInt::from(self.d as u64), &t) == self.b,
            "G^((T-1)/(2K)) must equal B"
        );

        for &q in self.q.iter().chain(self.q_mul.iter()) {
            assert!(
                (q - 1) % (2 * n as u64) == 0,
                "modulus {q} is not NTT-friendly for degree {n}"
            );
        }
        for (i, &q) in self.q.iter().enumerate() {
            assert!(
                !self.q[..i].contains(&q) && !self.q_mul.contains(&q),
                "RNS chains must be pairwise disjoint"
            );
        }
    }
}

/// Validated scheme parameters. Cheap to clone and safe to share across
/// threads; everything inside is read-only after construction.
#[derive(Clone)]
pub struct Parameters {
    ring_q: Arc<Ring>,
    ring_q_mul: Arc<Ring>,
    log_n: usize,
    sigma: f64,
    b: BigInt,
    d: usize,
    g: BigInt,
    t: BigInt,
}

impl Parameters {
    /// Materialises a literal; panics on any invalid parameter.
    pub fn new(literal: ParametersLiteral) -> Self {
        literal.validate();
        let n = 1usize << literal.log_n;
        let t = literal.t();
        let ring_q = Ring::new(n, &literal.q);
        let ring_q_mul = Ring::new(n, &literal.q_mul);
        Self {
            ring_q,
            ring_q_mul,
            log_n: literal.log_n,
            sigma: literal.sigma,
            b: literal.b,
            d: literal.d,
            g: literal.g,
            t,
        }
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// Number of plaintext slots `D`.
    pub fn slots(&self) -> usize {
        self.d
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn ring_q(&self) -> &Arc<Ring> {
        &self.ring_q
    }

    pub fn ring_q_mul(&self) -> &Arc<Ring> {
        &self.ring_q_mul
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }

    pub fn g(&self) -> &BigInt {
        &self.g
    }

    /// Plaintext modulus `T = B^K + 1`.
    pub fn t(&self) -> &BigInt {
        &self.t
    }

    /// The full ciphertext modulus as a big integer.
    pub fn q_big(&self) -> &BigInt {
        self.ring_q.modulus_big()
    }

    /// Primitive `2N`-th root of unity of `Z_T`, `G^((T-1)/(2N))`.
    pub fn root(&self) -> BigInt {
        let exp = (&self.t - BigInt::one()) / BigInt::from(2 * self.n() as u64);
        self.g.modpow(&exp, &self.t)
    }

    /// Galois element realising a left column rotation by `rot` slots:
    /// `5^(rot*K/2) mod 2N`.
    pub fn galois_element(&self, rot: usize) -> u64 {
        let k = self.n() / self.slots();
        mod_exp(5, (rot * (k / 2)) as u64, 2 * self.n() as u64)
    }
}

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameters")
            .field("log_n", &self.log_n)
            .field("slots", &self.d)
            .field("log_t", &self.t.bits())
            .field("q_levels", &self.ring_q.level_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params_list::*;

    #[test]
    fn all_shipped_literals_are_valid() {
        for lit in [
            hpn14d13t128(),
            hpn14d12t256(),
            hpn14d11t512(),
            hpn14d10t1024(),
            hpn14d9t2048(),
            hpn14d8t4096(),
            hpn13d10t128(),
            hpn13d9t256(),
            hpn13d8t512(),
            hpn13d7t1024(),
            hpn13d6t2048(),
            hpn13d5t4096(),
            pn15t128(),
            pn16t256(),
            pn17t512(),
            pn18t1024(),
        ] {
            lit.validate();
        }
    }

    #[test]
    fn derived_quantities() {
        let params = Parameters::new(hpn13d10t128());
        assert_eq!(params.n(), 8192);
        assert_eq!(params.slots(), 1024);
        // T = B^8 + 1 for this set
        let b = params.b().clone();
        assert_eq!(params.t(), &(num_traits::pow(b, 8) + BigInt::one()));
        // root is a primitive 2N-th root: root^N = -1 mod T
        let root = params.root();
        assert_eq!(
            root.modpow(&BigInt::from(params.n() as u64), params.t()),
            params.t() - BigInt::one()
        );
        // rotation by 0 is the identity element
        assert_eq!(params.galois_element(0), 1);
        assert_eq!(
            params.galois_element(1),
            crate::utils::mod_exp(5, 4, 2 * 8192)
        );
    }
}
