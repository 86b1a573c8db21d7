use criterion::{criterion_group, criterion_main, Criterion};
use hpbfv::{
    hpn13d10t128, KeyGenerator, MatrixCiphertext, MatrixEvaluator, Parameters,
};

fn bench_matmul(c: &mut Criterion) {
    let params = Parameters::new(hpn13d10t128());
    let mut kgen = KeyGenerator::new(params.clone());
    let sk = kgen.gen_secret_key();
    let rlk = kgen.gen_relinearization_key(&sk);

    for dim in [16usize, 32] {
        let rks = kgen.gen_rotation_keys_for_matmul(&sk, dim);
        let mut eval = MatrixEvaluator::new(params.clone(), dim, rlk.clone(), rks);

        let ct_a = MatrixCiphertext::new(&params, dim, true);
        let ct_b = MatrixCiphertext::new(&params, dim, false);
        let mut ct_c = MatrixCiphertext::new(&params, dim, true);

        c.bench_function(&format!("matrix_mul/dim={dim}"), |b| {
            b.iter(|| eval.mul(&ct_a, &ct_b, &mut ct_c))
        });
    }
}

criterion_group!(benches, bench_matmul);
criterion_main!(benches);
