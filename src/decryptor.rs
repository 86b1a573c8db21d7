use crate::ciphertext::Ciphertext;
use crate::decoder::Decoder;
use crate::message::Message;
use crate::params::Parameters;
use crate::plaintext::Plaintext;
use crate::rlwe;

/// Decrypts ciphertexts back to plaintexts and messages.
pub struct Decryptor {
    params: Parameters,
    dec: rlwe::Decryptor,
    dcd: Decoder,
    pt_pool: Plaintext,
}

impl Decryptor {
    pub fn new(params: Parameters, sk: &rlwe::SecretKey) -> Self {
        let dec = rlwe::Decryptor::new(params.ring_q().clone(), sk);
        let dcd = Decoder::new(params.clone());
        let pt_pool = Plaintext::new(&params);
        Self {
            params,
            dec,
            dcd,
            pt_pool,
        }
    }

    pub fn decrypt(&mut self, ct: &Ciphertext, pt: &mut Plaintext) {
        self.dec.decrypt(ct, &mut pt.value);
    }

    pub fn decrypt_new(&mut self, ct: &Ciphertext) -> Plaintext {
        let mut pt = Plaintext::new(&self.params);
        self.decrypt(ct, &mut pt);
        pt
    }

    /// Decrypts and decodes in one step.
    pub fn decrypt_to_msg(&mut self, ct: &Ciphertext, msg: &mut Message) {
        self.dec.decrypt(ct, &mut self.pt_pool.value);
        self.dcd.decode(&self.pt_pool, msg);
    }

    pub fn decrypt_to_msg_new(&mut self, ct: &Ciphertext) -> Message {
        let mut msg = Message::new(&self.params);
        self.decrypt_to_msg(ct, &mut msg);
        msg
    }
}
