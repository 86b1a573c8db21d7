use num_bigint_dig::BigInt;
use num_traits::Zero;

use crate::params::Parameters;

/// Slot vector: `D` big integers in `[0, T)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub value: Vec<BigInt>,
}

impl Message {
    pub fn new(params: &Parameters) -> Self {
        Self {
            value: vec![BigInt::zero(); params.slots()],
        }
    }
}
