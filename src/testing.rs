//! Shared fixtures for the scheme-level tests.

use num_bigint_dig::{BigInt, RandBigInt};
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::decryptor::Decryptor;
use crate::encryptor::Encryptor;
use crate::evaluator::Evaluator;
use crate::keygen::KeyGenerator;
use crate::message::Message;
use crate::params::Parameters;
use crate::params_list::hpn13d10t128;
use crate::rlwe::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey};

pub(crate) struct TestContext {
    pub params: Parameters,
    pub kgen: KeyGenerator,
    pub sk: SecretKey,
    pub pk: PublicKey,
    pub rlk: RelinearizationKey,
    pub rtks: RotationKeySet,
    pub encryptor: Encryptor,
    pub decryptor: Decryptor,
    pub evaluator: Evaluator,
}

/// Full scheme context over the smallest shipped parameter set.
pub(crate) fn context() -> TestContext {
    let params = Parameters::new(hpn13d10t128());
    let mut kgen = KeyGenerator::new(params.clone());
    let (sk, pk) = kgen.gen_key_pair();
    let rlk = kgen.gen_relinearization_key(&sk);
    let rtks = kgen.gen_default_rotation_keys(&sk);
    let encryptor = Encryptor::new(params.clone(), &pk);
    let decryptor = Decryptor::new(params.clone(), &sk);
    let evaluator = Evaluator::new(params.clone());
    TestContext {
        params,
        kgen,
        sk,
        pk,
        rlk,
        rtks,
        encryptor,
        decryptor,
        evaluator,
    }
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform slot vector over `Z_T`.
pub(crate) fn random_message(params: &Parameters, rng: &mut StdRng) -> Message {
    let mut msg = Message::new(params);
    for v in msg.value.iter_mut() {
        *v = rng.gen_bigint_range(&BigInt::zero(), params.t());
    }
    msg
}

/// A batch of `pack` uniform `dim x dim` matrices over `Z_T`.
pub(crate) fn random_matrices(
    params: &Parameters,
    pack: usize,
    dim: usize,
    rng: &mut StdRng,
) -> Vec<Vec<Vec<BigInt>>> {
    (0..pack)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    (0..dim)
                        .map(|_| rng.gen_bigint_range(&BigInt::zero(), params.t()))
                        .collect()
                })
                .collect()
        })
        .collect()
}

mod roundtrip {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut ctx = context();
        let mut rng = seeded_rng(40);
        let msg = random_message(&ctx.params, &mut rng);
        let ct = ctx.encryptor.encrypt_msg_new(&msg);
        assert_eq!(ctx.decryptor.decrypt_to_msg_new(&ct).value, msg.value);
    }
}
