use num_bigint_dig::BigInt;
use num_traits::Zero;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::matrix::{MatrixMessage, MatrixPlaintext};
use crate::params::Parameters;

/// Packs batches of square matrices into matrix messages and plaintexts.
///
/// A batch is `matrices[l][row][col]` with `pack` matrices of dimension
/// `dim`, `pack * dim` equal to the slot count. Diagonal packing stores
/// `matrices[l][j][(j+i) % dim]` at slot `j*pack + l` of message `i`;
/// shifted-diagonal packing stores `matrices[l][(dim+j-i) % dim][j]` there.
pub struct MatrixEncoder {
    params: Parameters,
    ecd: Encoder,
    dcd: Decoder,
}

impl MatrixEncoder {
    pub fn new(params: Parameters) -> Self {
        let ecd = Encoder::new(params.clone());
        let dcd = Decoder::new(params.clone());
        Self { params, ecd, dcd }
    }

    fn check_shape(&self, matrices: &[Vec<Vec<BigInt>>]) -> (usize, usize) {
        let pack = matrices.len();
        assert!(pack > 0, "empty matrix batch");
        let dim = matrices[0].len();
        assert!(
            matrices
                .iter()
                .all(|m| m.len() == dim && m.iter().all(|row| row.len() == dim)),
            "matrices must be square and uniformly sized"
        );
        assert!(
            pack * dim == self.params.slots(),
            "pack * dim must equal the slot count"
        );
        (pack, dim)
    }

    pub fn encode_matrix_message(
        &self,
        matrices: &[Vec<Vec<BigInt>>],
        is_diagonal: bool,
        em: &mut MatrixMessage,
    ) {
        let (pack, dim) = self.check_shape(matrices);
        em.pack = pack;
        em.is_diagonal = is_diagonal;
        for (l, mat) in matrices.iter().enumerate() {
            for i in 0..dim {
                for j in 0..dim {
                    em.value[i].value[j * pack + l] = if is_diagonal {
                        mat[j][(j + i) % dim].clone()
                    } else {
                        mat[(dim + j - i) % dim][j].clone()
                    };
                }
            }
        }
    }

    pub fn encode_matrix_message_new(
        &self,
        matrices: &[Vec<Vec<BigInt>>],
        is_diagonal: bool,
    ) -> MatrixMessage {
        let mut em = MatrixMessage::new(&self.params, matrices[0].len(), is_diagonal);
        self.encode_matrix_message(matrices, is_diagonal, &mut em);
        em
    }

    pub fn encode_matrix(
        &mut self,
        matrices: &[Vec<Vec<BigInt>>],
        is_diagonal: bool,
        pt: &mut MatrixPlaintext,
    ) {
        let em = self.encode_matrix_message_new(matrices, is_diagonal);
        pt.pack = em.pack;
        pt.is_diagonal = em.is_diagonal;
        for (msg, p) in em.value.iter().zip(pt.value.iter_mut()) {
            self.ecd.encode(msg, p);
        }
    }

    pub fn encode_matrix_new(
        &mut self,
        matrices: &[Vec<Vec<BigInt>>],
        is_diagonal: bool,
    ) -> MatrixPlaintext {
        let mut pt = MatrixPlaintext::new(&self.params, matrices[0].len(), is_diagonal);
        self.encode_matrix(matrices, is_diagonal, &mut pt);
        pt
    }

    pub fn decode_matrix_message(&self, em: &MatrixMessage, matrices: &mut [Vec<Vec<BigInt>>]) {
        let pack = em.pack;
        let dim = em.dim();
        for (l, mat) in matrices.iter_mut().enumerate() {
            for i in 0..dim {
                for j in 0..dim {
                    let v = em.value[i].value[j * pack + l].clone();
                    if em.is_diagonal {
                        mat[j][(j + i) % dim] = v;
                    } else {
                        mat[(dim + j - i) % dim][j] = v;
                    }
                }
            }
        }
    }

    pub fn decode_matrix_message_new(&self, em: &MatrixMessage) -> Vec<Vec<Vec<BigInt>>> {
        let dim = em.dim();
        let mut matrices = vec![vec![vec![BigInt::zero(); dim]; dim]; em.pack];
        self.decode_matrix_message(em, &mut matrices);
        matrices
    }

    pub fn decode_matrix(&mut self, pt: &MatrixPlaintext, matrices: &mut [Vec<Vec<BigInt>>]) {
        let mut em = MatrixMessage::new(&self.params, pt.dim(), pt.is_diagonal);
        em.pack = pt.pack;
        for (p, msg) in pt.value.iter().zip(em.value.iter_mut()) {
            self.dcd.decode(p, msg);
        }
        self.decode_matrix_message(&em, matrices);
    }

    pub fn decode_matrix_new(&mut self, pt: &MatrixPlaintext) -> Vec<Vec<Vec<BigInt>>> {
        let dim = pt.dim();
        let mut matrices = vec![vec![vec![BigInt::zero(); dim]; dim]; pt.pack];
        self.decode_matrix(pt, &mut matrices);
        matrices
    }
}
