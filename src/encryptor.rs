use crate::ciphertext::Ciphertext;
use crate::encoder::Encoder;
use crate::message::Message;
use crate::params::Parameters;
use crate::plaintext::Plaintext;
use crate::rlwe;

/// Encrypts plaintexts and messages under a public key.
pub struct Encryptor {
    params: Parameters,
    enc: rlwe::Encryptor,
    ecd: Encoder,
    pt_pool: Plaintext,
}

impl Encryptor {
    pub fn new(params: Parameters, pk: &rlwe::PublicKey) -> Self {
        let enc = rlwe::Encryptor::new(params.ring_q().clone(), params.sigma(), pk);
        let ecd = Encoder::new(params.clone());
        let pt_pool = Plaintext::new(&params);
        Self {
            params,
            enc,
            ecd,
            pt_pool,
        }
    }

    pub fn encrypt(&mut self, pt: &Plaintext, ct: &mut Ciphertext) {
        self.enc.encrypt(&pt.value, ct);
    }

    pub fn encrypt_new(&mut self, pt: &Plaintext) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, 1);
        self.encrypt(pt, &mut ct);
        ct
    }

    /// Encodes and encrypts in one step.
    pub fn encrypt_msg(&mut self, msg: &Message, ct: &mut Ciphertext) {
        self.ecd.encode(msg, &mut self.pt_pool);
        self.enc.encrypt(&self.pt_pool.value, ct);
    }

    pub fn encrypt_msg_new(&mut self, msg: &Message) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.params, 1);
        self.encrypt_msg(msg, &mut ct);
        ct
    }
}
