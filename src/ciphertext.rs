use serde::{Deserialize, Serialize};

use crate::params::Parameters;
use crate::ring::Poly;

/// RLWE ciphertext: `degree + 1` polynomials over `Z_Q`, coefficient
/// domain. A fresh encryption has degree 1; the tensor product before
/// relinearisation has degree 2.
///
/// Serialises as the plain sequence of its polynomials, no extra framing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub value: Vec<Poly>,
}

impl Ciphertext {
    pub fn new(params: &Parameters, degree: usize) -> Self {
        let ring = params.ring_q();
        Self {
            value: (0..=degree).map(|_| ring.new_poly()).collect(),
        }
    }

    pub fn degree(&self) -> usize {
        self.value.len() - 1
    }

    /// Grows or shrinks to the given degree; new polynomials are zero.
    pub fn resize(&mut self, params: &Parameters, degree: usize) {
        let ring = params.ring_q();
        while self.degree() < degree {
            self.value.push(ring.new_poly());
        }
        self.value.truncate(degree + 1);
    }

    pub fn copy_from(&mut self, other: &Ciphertext) {
        self.value.truncate(other.value.len());
        for (dst, src) in self.value.iter_mut().zip(other.value.iter()) {
            dst.copy_from(src);
        }
        for src in other.value.iter().skip(self.value.len()) {
            self.value.push(src.clone());
        }
    }
}
