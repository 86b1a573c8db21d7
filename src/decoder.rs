use num_bigint_dig::BigInt;
use num_traits::Zero;

use crate::message::Message;
use crate::params::Parameters;
use crate::plaintext::Plaintext;
use crate::utils::{div_floor, mod_exp, mod_floor};

/// Maps ring plaintexts back to slot vectors.
///
/// Decoding multiplies the lifted coefficients by `(X^D - B)` in the
/// negacyclic ring, rounds away the `Q` scaling, folds the high
/// coefficients down with `X^D = B`, and finishes with the forward
/// length-`D` NTT over `Z_T`.
pub struct Decoder {
    params: Parameters,
    /// `Root^(5^(iK/2) mod 2N)`, the forward twiddle bases.
    ntt_roots: Vec<BigInt>,
    coeff_pool1: Vec<BigInt>,
    coeff_pool2: Vec<BigInt>,
    q_half: BigInt,
}

impl Decoder {
    pub fn new(params: Parameters) -> Self {
        let slots = params.slots();
        let n = params.n();
        let k = n / slots;
        let t = params.t().clone();
        let root = params.root();

        let ntt_roots = (0..slots)
            .map(|i| {
                let e = mod_exp(5, ((k / 2) * i) as u64, 2 * n as u64);
                root.modpow(&BigInt::from(e), &t)
            })
            .collect();
        let coeff_pool1 = vec![BigInt::zero(); n];
        let coeff_pool2 = vec![BigInt::zero(); n];
        let q_half = params.q_big() / BigInt::from(2u64);
        Self {
            params,
            ntt_roots,
            coeff_pool1,
            coeff_pool2,
            q_half,
        }
    }

    /// Forward slot NTT, in place over `msg`: bit-reverse then
    /// Cooley-Tukey; no permutation and no scaling.
    fn ntt(&self, msg: &mut Message) {
        let slots = self.params.slots();
        let t = self.params.t();
        let pool = &mut msg.value;

        let mut j = 0;
        for i in 1..slots {
            let mut bit = slots >> 1;
            while j >= bit {
                j -= bit;
                bit >>= 1;
            }
            j += bit;
            if i < j {
                pool.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= slots {
            let step = slots / len;
            for k in 0..len / 2 {
                let w = self.ntt_roots[k].modpow(&BigInt::from(step as u64), t);
                for j in (0..slots).step_by(len) {
                    let u = pool[j + k].clone();
                    let v = &w * &pool[j + k + len / 2] % t;
                    pool[j + k] = (&u + &v) % t;
                    pool[j + k + len / 2] = mod_floor(&(&u - &v), t);
                }
            }
            len <<= 1;
        }
    }

    pub fn decode(&mut self, pt: &Plaintext, msg: &mut Message) {
        let params = self.params.clone();
        let n = params.n();
        let d = params.slots();
        let b = params.b();
        let t = params.t();

        params.ring_q().to_bigint(&pt.value, 1, &mut self.coeff_pool1);

        // multiply by (X^D - B) in the negacyclic ring
        for c in self.coeff_pool2.iter_mut() {
            *c = BigInt::zero();
        }
        for i in 0..n {
            let a = &self.coeff_pool1[i];
            self.coeff_pool2[i] -= b * a;
            if i + d < n {
                let hi = a.clone();
                self.coeff_pool2[i + d] += hi;
            } else {
                let hi = a.clone();
                self.coeff_pool2[i + d - n] -= hi;
            }
        }

        // round away the Q scaling
        let q = params.q_big();
        for c in self.coeff_pool2.iter_mut() {
            *c = div_floor(&(&*c + &self.q_half), q);
        }

        // fold high coefficients down with X^D = B
        for i in (d..n).rev() {
            let acc = &self.coeff_pool2[i] * b + &self.coeff_pool2[i - d];
            self.coeff_pool2[i - d] = mod_floor(&acc, t);
        }

        for (dst, src) in msg.value.iter_mut().zip(self.coeff_pool2[..d].iter()) {
            dst.clone_from(src);
        }
        self.ntt(msg);
    }

    pub fn decode_new(&mut self, pt: &Plaintext) -> Message {
        let mut msg = Message::new(&self.params);
        self.decode(pt, &mut msg);
        msg
    }
}
