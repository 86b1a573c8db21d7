use criterion::{criterion_group, criterion_main, Criterion};
use hpbfv::{
    hpn13d10t128, hpn14d13t128, Ciphertext, Encryptor, Evaluator, KeyGenerator, Message,
    Parameters, ParametersLiteral,
};

fn bench_set(c: &mut Criterion, name: &str, literal: ParametersLiteral) {
    let params = Parameters::new(literal);
    let mut kgen = KeyGenerator::new(params.clone());
    let (sk, pk) = kgen.gen_key_pair();
    let rlk = kgen.gen_relinearization_key(&sk);

    let mut encryptor = Encryptor::new(params.clone(), &pk);
    let mut evaluator = Evaluator::new(params.clone());

    let msg = Message::new(&params);
    let ct0 = encryptor.encrypt_msg_new(&msg);
    let ct1 = encryptor.encrypt_msg_new(&msg);
    let mut out = Ciphertext::new(&params, 1);

    c.bench_function(&format!("mul_and_relin/{name}"), |b| {
        b.iter(|| evaluator.mul_and_relin(&ct0, &ct1, &rlk, &mut out))
    });

    let ext = evaluator.extend_left_new(&ct0);
    c.bench_function(&format!("mul_and_relin_hoisted/{name}"), |b| {
        b.iter(|| evaluator.mul_and_relin_hoisted(&ext, &ct1, &rlk, &mut out))
    });
}

fn bench_mul(c: &mut Criterion) {
    bench_set(c, "HPN13D10T128", hpn13d10t128());
    bench_set(c, "HPN14D13T128", hpn14d13t128());
}

criterion_group!(benches, bench_mul);
criterion_main!(benches);
