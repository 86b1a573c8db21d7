use num_bigint_dig::BigInt;
use num_traits::Zero;

use crate::message::Message;
use crate::params::Parameters;
use crate::plaintext::Plaintext;
use crate::utils::{div_floor, mod_exp, mod_floor};

/// Maps slot vectors to ring plaintexts.
///
/// Encoding runs the inverse length-`D` NTT over `Z_T`, embeds the result
/// into the degree-`N` polynomial through the base-`B` expansion
/// `-sum_i sum_j m'[j] * B^(K-i-1) * X^(i*D+j)`, and scales every
/// coefficient by `Q/T` with rounding. The slot permutation applied first
/// accounts for the NTT ordering induced by the Galois action on
/// `(X^D - B)`.
pub struct Encoder {
    params: Parameters,
    /// `Root^(2N - 2Ki)`, the inverse-transform twiddle bases.
    ntt_roots: Vec<BigInt>,
    /// `Root^(2N - i)`, the post-transform coefficient twist.
    root_pows: Vec<BigInt>,
    b_pows: Vec<BigInt>,
    d_inv: BigInt,
    index_map: Vec<usize>,
    msg_pool: Message,
    coeff_pool: Vec<BigInt>,
    t_half: BigInt,
}

impl Encoder {
    pub fn new(params: Parameters) -> Self {
        let slots = params.slots();
        let n = params.n();
        let k = n / slots;
        let t = params.t().clone();
        let root = params.root();

        let ntt_roots = (0..slots)
            .map(|i| root.modpow(&BigInt::from((2 * n - 2 * k * i) as u64), &t))
            .collect();
        let root_pows = (0..slots)
            .map(|i| root.modpow(&BigInt::from((2 * n - i) as u64), &t))
            .collect();
        let b_pows = (0..k)
            .map(|i| num_traits::pow(params.b().clone(), k - i - 1))
            .collect();
        let d_inv = BigInt::from(slots as u64).modpow(&(&t - BigInt::from(2u64)), &t);

        // index_map[5^(iK/2) mod 2N / 2K] = i
        let mut index_map = vec![0usize; slots];
        for i in 0..slots {
            let idx = mod_exp(5, (i * k / 2) as u64, 2 * n as u64) / (2 * k as u64);
            index_map[idx as usize] = i;
        }

        let msg_pool = Message::new(&params);
        let coeff_pool = vec![BigInt::zero(); n];
        let t_half = &t / BigInt::from(2u64);
        Self {
            params,
            ntt_roots,
            root_pows,
            b_pows,
            d_inv,
            index_map,
            msg_pool,
            coeff_pool,
            t_half,
        }
    }

    /// Inverse slot NTT of `msg` into the internal pool: permute,
    /// bit-reverse, Cooley-Tukey, then twist by `root_pows` and `D^{-1}`.
    fn inv_ntt(&mut self, msg: &Message) {
        let slots = self.params.slots();
        let t = self.params.t();
        let pool = &mut self.msg_pool.value;

        for i in 0..slots {
            pool[i] = msg.value[self.index_map[i]].clone();
        }

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

        for (x, pow) in pool.iter_mut().zip(self.root_pows.iter()) {
            *x = &*x * pow % t * &self.d_inv % t;
        }
    }

    pub fn encode(&mut self, msg: &Message, pt: &mut Plaintext) {
        self.inv_ntt(msg);
        let slots = self.params.slots();
        let n = self.params.n();
        let k = n / slots;

        for i in 0..k {
            let b_pow = &self.b_pows[i];
            for j in 0..slots {
                self.coeff_pool[i * slots + j] = -(&self.msg_pool.value[j] * b_pow);
            }
        }

        // scale by Q/T with rounding
        let q = self.params.q_big();
        let t = self.params.t();
        for c in self.coeff_pool.iter_mut() {
            *c = div_floor(&(&*c * q + &self.t_half), t);
        }

        self.params.ring_q().from_bigint(&self.coeff_pool, &mut pt.value);
    }

    pub fn encode_new(&mut self, msg: &Message) -> Plaintext {
        let mut pt = Plaintext::new(&self.params);
        self.encode(msg, &mut pt);
        pt
    }
}
