use crate::decryptor::Decryptor;
use crate::encryptor::Encryptor;
use crate::matrix::{MatrixCiphertext, MatrixPlaintext};
use crate::params::Parameters;
use crate::rlwe::{PublicKey, SecretKey};

/// Componentwise encryption and decryption of packed matrices.
pub struct MatrixEncryptor {
    params: Parameters,
    enc: Encryptor,
    dec: Decryptor,
}

impl MatrixEncryptor {
    pub fn new(params: Parameters, pk: &PublicKey, sk: &SecretKey) -> Self {
        let enc = Encryptor::new(params.clone(), pk);
        let dec = Decryptor::new(params.clone(), sk);
        Self { params, enc, dec }
    }

    pub fn encrypt(&mut self, pt: &MatrixPlaintext, ct: &mut MatrixCiphertext) {
        assert_eq!(pt.dim(), ct.dim(), "matrix dimension mismatch");
        ct.pack = pt.pack;
        ct.is_diagonal = pt.is_diagonal;
        for (p, c) in pt.value.iter().zip(ct.value.iter_mut()) {
            self.enc.encrypt(p, c);
        }
    }

    pub fn encrypt_new(&mut self, pt: &MatrixPlaintext) -> MatrixCiphertext {
        let mut ct = MatrixCiphertext::new(&self.params, pt.dim(), pt.is_diagonal);
        self.encrypt(pt, &mut ct);
        ct
    }

    pub fn decrypt(&mut self, ct: &MatrixCiphertext, pt: &mut MatrixPlaintext) {
        assert_eq!(ct.dim(), pt.dim(), "matrix dimension mismatch");
        pt.pack = ct.pack;
        pt.is_diagonal = ct.is_diagonal;
        for (c, p) in ct.value.iter().zip(pt.value.iter_mut()) {
            self.dec.decrypt(c, p);
        }
    }

    pub fn decrypt_new(&mut self, ct: &MatrixCiphertext) -> MatrixPlaintext {
        let mut pt = MatrixPlaintext::new(&self.params, ct.dim(), ct.is_diagonal);
        self.decrypt(ct, &mut pt);
        pt
    }
}
