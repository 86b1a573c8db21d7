use serde::{Deserialize, Serialize};

use crate::params::Parameters;
use crate::ring::Poly;

/// Ring plaintext: one polynomial over `Z_Q` holding an encoded message
/// scaled by `Q/T`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plaintext {
    pub value: Poly,
}

impl Plaintext {
    pub fn new(params: &Parameters) -> Self {
        Self {
            value: params.ring_q().new_poly(),
        }
    }
}
