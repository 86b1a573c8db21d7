//! RLWE key material, base encryption and the gadget-decomposition key
//! switch.
//!
//! Switching keys use the RNS gadget with one digit per prime of the `Q`
//! chain: digit `i` of a polynomial is its residue row modulo `q_i`,
//! broadcast across the whole chain, and the matching gadget constant
//! `(Q/q_i) * ((Q/q_i)^{-1} mod q_i)` reduces to `1` modulo `q_i` and `0`
//! elsewhere. The shipped parameter sets carry no auxiliary key-switch
//! chain, so there is no special-prime plumbing here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ring::Poly;

mod encryption;
mod keygen;
mod keyswitch;

pub use encryption::{Decryptor, Encryptor};
pub use keygen::KeyGenerator;
pub use keyswitch::KeySwitcher;

/// Ternary RLWE secret, stored in the NTT domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretKey {
    pub(crate) value: Poly,
}

/// Public encryption key `(e - a*s, a)`, NTT and Montgomery form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKey {
    pub(crate) value: [Poly; 2],
}

/// Gadget encryption of a source secret under a target secret: one
/// `(b_i, a_i)` pair per prime, NTT and Montgomery form, with
/// `b_i = e_i - a_i*s_out + delta_i*s_in`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchingKey {
    pub(crate) value: Vec<[Poly; 2]>,
}

/// Relinearisation key; `keys[d-2]` maps degree-`d` terms `s^d -> (1, s)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelinearizationKey {
    pub(crate) keys: Vec<SwitchingKey>,
}

/// Rotation keys indexed by Galois element.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RotationKeySet {
    pub(crate) keys: HashMap<u64, SwitchingKey>,
}

impl RotationKeySet {
    pub fn get_rotation_key(&self, gal_el: u64) -> Option<&SwitchingKey> {
        self.keys.get(&gal_el)
    }

    pub fn galois_elements(&self) -> impl Iterator<Item = u64> + '_ {
        self.keys.keys().copied()
    }
}
