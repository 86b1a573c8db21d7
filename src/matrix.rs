use serde::{Deserialize, Serialize};

use crate::ciphertext::Ciphertext;
use crate::message::Message;
use crate::params::Parameters;
use crate::plaintext::Plaintext;

/// `pack` square matrices of dimension `dim` interleaved into `dim` slot
/// vectors: entry `i` holds the `i`-th (possibly shifted) diagonal of each
/// packed matrix.
///
/// `is_diagonal` distinguishes the two packings: the matrix evaluator
/// multiplies a diagonal left operand by a shifted-diagonal right operand
/// and produces a diagonal result.
#[derive(Clone, Debug)]
pub struct MatrixMessage {
    pub value: Vec<Message>,
    pub pack: usize,
    pub is_diagonal: bool,
}

fn check_dim(params: &Parameters, dim: usize) -> usize {
    assert!(
        dim > 0 && params.slots() % dim == 0,
        "dim must divide the slot count"
    );
    params.slots() / dim
}

impl MatrixMessage {
    pub fn new(params: &Parameters, dim: usize, is_diagonal: bool) -> Self {
        let pack = check_dim(params, dim);
        Self {
            value: (0..dim).map(|_| Message::new(params)).collect(),
            pack,
            is_diagonal,
        }
    }

    pub fn dim(&self) -> usize {
        self.value.len()
    }
}

/// Encoded form of a [`MatrixMessage`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatrixPlaintext {
    pub value: Vec<Plaintext>,
    pub pack: usize,
    pub is_diagonal: bool,
}

impl MatrixPlaintext {
    pub fn new(params: &Parameters, dim: usize, is_diagonal: bool) -> Self {
        let pack = check_dim(params, dim);
        Self {
            value: (0..dim).map(|_| Plaintext::new(params)).collect(),
            pack,
            is_diagonal,
        }
    }

    pub fn dim(&self) -> usize {
        self.value.len()
    }
}

/// Encrypted form of a [`MatrixMessage`]; one degree-1 ciphertext per
/// packed diagonal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatrixCiphertext {
    pub value: Vec<Ciphertext>,
    pub pack: usize,
    pub is_diagonal: bool,
}

impl MatrixCiphertext {
    pub fn new(params: &Parameters, dim: usize, is_diagonal: bool) -> Self {
        let pack = check_dim(params, dim);
        Self {
            value: (0..dim).map(|_| Ciphertext::new(params, 1)).collect(),
            pack,
            is_diagonal,
        }
    }

    pub fn dim(&self) -> usize {
        self.value.len()
    }
}
