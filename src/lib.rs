//! High-precision BFV homomorphic encryption.
//!
//! Ordinary BFV packs a vector of integers modulo a word-sized prime `t`
//! into a ring plaintext. Here the plaintext modulus is `T = B^K + 1` for a
//! chosen base `B` and `K = N/D`, with `D` a power of two dividing the ring
//! degree `N`, so `T` can reach hundreds or thousands of bits while each
//! ciphertext still carries `D` SIMD slots.
//!
//! The crate is organised in two layers. The [`ring`] and [`rlwe`] modules
//! hold the lattice plumbing: RNS negacyclic polynomial arithmetic, NTTs in
//! Montgomery form, base extension between the `Q` and `QMul` chains, key
//! material and the gadget-decomposition key switch. On top of that sit the
//! scheme operators: [`Encoder`]/[`Decoder`] map slot vectors to ring
//! plaintexts through a length-`D` NTT over `Z_T` and the factor
//! `(X^D - B)`, [`Evaluator`] implements the homomorphic operations with the
//! tensor-and-rescale by `(X^D - B)/Q`, and [`MatrixEvaluator`] multiplies
//! diagonally packed matrices with a fused three-step key-switch collapse.
//!
//! Misuse is fatal by design: invalid parameter literals, missing keys and
//! operand shape mismatches panic. The scheme has no recoverable error
//! paths; its correctness rests on exact arithmetic over pre-validated
//! parameters and pre-generated keys.

mod ciphertext;
mod decoder;
mod decryptor;
mod encoder;
mod encryptor;
mod evaluator;
mod keygen;
mod matrix;
mod matrix_encoder;
mod matrix_encryptor;
mod matrix_evaluator;
mod message;
mod params;
mod params_list;
mod plaintext;
mod random;
pub mod ring;
pub mod rlwe;
mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use ciphertext::Ciphertext;
pub use decoder::Decoder;
pub use decryptor::Decryptor;
pub use encoder::Encoder;
pub use encryptor::Encryptor;
pub use evaluator::{Evaluator, ExtPoly};
pub use keygen::KeyGenerator;
pub use matrix::{MatrixCiphertext, MatrixMessage, MatrixPlaintext};
pub use matrix_encoder::MatrixEncoder;
pub use matrix_encryptor::MatrixEncryptor;
pub use matrix_evaluator::MatrixEvaluator;
pub use message::Message;
pub use params::{Parameters, ParametersLiteral, DEFAULT_SIGMA};
pub use params_list::*;
pub use plaintext::Plaintext;
