//! Shipped parameter sets.
//!
//! `HPNxDyTz` sets trade slots for plaintext precision at ring degree
//! `2^x`: `D = 2^y` slots, `log2 T ~ z`. `PNxTy` sets put every coefficient
//! in one giant slot (`D = N`, `K = 1`) and exist for raw multiplication of
//! full-width values.

use num_bigint_dig::BigInt;

use crate::params::{ParametersLiteral, DEFAULT_SIGMA};

fn big(dec: &str) -> BigInt {
    BigInt::parse_bytes(dec.as_bytes(), 10).expect("invalid decimal literal")
}

const Q14: [u64; 7] = [
    0x1fffffffffe10001,
    0x1fffffffffe00001,
    0x1fffffffffdd0001,
    0x1fffffffffd08001,
    0x1fffffffffcf8001,
    0x1fffffffffc80001,
    0x1fffffffffb40001,
]; // 61 * 7 = 427

const QMUL14: [u64; 7] = [
    0x1fffffffffab0001,
    0x1fffffffffa10001,
    0x1fffffffff998001,
    0x1fffffffff978001,
    0x1fffffffff8a8001,
    0x1fffffffff7c8001,
    0x1fffffffff608001,
];

const Q13: [u64; 4] = [
    0x1fffffffffe10001,
    0x1fffffffffe00001,
    0x1fffffffffdd0001,
    0x1fffffffffd08001,
]; // 61 * 4 = 244

const QMUL13: [u64; 4] = [
    0x1fffffffffab0001,
    0x1fffffffffa10001,
    0x1fffffffff998001,
    0x1fffffffff978001,
];

pub fn hpn14d13t128() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709548544"), // 2^64 - 3072
        d: 1 << 13,
        g: BigInt::from(27u64), // 3^3
    }
}

pub fn hpn14d12t256() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709551552"), // 2^64 - 64
        d: 1 << 12,
        g: BigInt::from(48828125u64), // 5^11
    }
}

pub fn hpn14d11t512() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709551188"), // 2^64 - 428
        d: 1 << 11,
        g: BigInt::from(27u64), // 3^3
    }
}

pub fn hpn14d10t1024() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709551608"), // 2^64 - 8
        d: 1 << 10,
        g: BigInt::from(7625597484987u64), // 3^27
    }
}

pub fn hpn14d9t2048() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709551594"), // 2^64 - 22
        d: 1 << 9,
        g: BigInt::from(5u64),
    }
}

pub fn hpn14d8t4096() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 14,
        q: Q14.to_vec(),
        q_mul: QMUL14.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: big("18446744073709551560"), // 2^64 - 56
        d: 1 << 8,
        g: big("328256967394537077627"), // 3^43
    }
}

pub fn hpn13d10t128() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65340u64), // 2^16 - 196
        d: 1 << 10,
        g: BigInt::from(823543u64), // 7^7
    }
}

pub fn hpn13d9t256() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65514u64), // 2^16 - 22
        d: 1 << 9,
        g: BigInt::from(762939453125u64), // 5^17
    }
}

pub fn hpn13d8t512() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65464u64), // 2^16 - 72
        d: 1 << 8,
        g: BigInt::from(5u64),
    }
}

pub fn hpn13d7t1024() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65508u64), // 2^16 - 28
        d: 1 << 7,
        g: BigInt::from(5u64),
    }
}

pub fn hpn13d6t2048() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65346u64), // 2^16 - 190
        d: 1 << 6,
        // 5^161
        g: big(
            "3421138828918010427059886677953896804883452006534462333391279989965310260463526859098\
             2377645559608936309814453125",
        ),
    }
}

pub fn hpn13d5t4096() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 13,
        q: Q13.to_vec(),
        q_mul: QMUL13.to_vec(),
        sigma: DEFAULT_SIGMA,
        b: BigInt::from(65248u64), // 2^16 - 288
        d: 1 << 5,
        // 3^235
        g: big(
            "1328907826336853501035071949182453462840482737459712697538869371101828487939695777221\
             0874852435860862184279107707",
        ),
    }
}

pub fn pn15t128() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 15,
        q: vec![
            0x1fffffffffe10001,
            0x1fffffffffe00001,
            0x1fffffffffdd0001,
            0x1fffffffffc80001,
            0x1fffffffffb40001,
            0x1fffffffffab0001,
            0x1fffffffffa10001,
            0x1fffffffff500001,
            0x1fffffffff420001,
            0x1fffffffff380001,
            0x1fffffffff090001,
            0x1fffffffff000001,
        ], // 61 * 12 = 732
        q_mul: vec![
            0x1ffffffffef00001,
            0x1ffffffffeed0001,
            0x1ffffffffee80001,
            0x1ffffffffeb40001,
            0x1ffffffffe7f0001,
            0x1ffffffffe780001,
            0x1ffffffffe6f0001,
            0x1ffffffffe600001,
            0x1ffffffffe4c0001,
            0x1ffffffffdfd0001,
            0x1ffffffffdf40001,
            0x1ffffffffdef0001,
        ],
        sigma: DEFAULT_SIGMA,
        b: big("340282366920938463463374607431759953920"), // 2^128 - 8257536
        d: 1 << 15,
        g: BigInt::from(3u64),
    }
}

pub fn pn16t256() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 16,
        q: vec![
            0x1fffffffffe00001,
            0x1fffffffffc80001,
            0x1fffffffffb40001,
            0x1fffffffff500001,
            0x1fffffffff420001,
            0x1fffffffff380001,
            0x1fffffffff000001,
            0x1ffffffffef00001,
            0x1ffffffffee80001,
            0x1ffffffffeb40001,
            0x1ffffffffe780001,
            0x1ffffffffe600001,
            0x1ffffffffe4c0001,
            0x1ffffffffdf40001,
            0x1ffffffffdce0001,
            0x1ffffffffdb20001,
            0x1ffffffffdac0001,
            0x1ffffffffda40001,
            0x1ffffffffd7a0001,
            0x1ffffffffc680001,
        ], // 61 * 20 = 1220
        q_mul: vec![
            0x1ffffffffc000001,
            0x1ffffffffb880001,
            0x1ffffffffb7c0001,
            0x1ffffffffb300001,
            0x1ffffffffb1e0001,
            0x1ffffffffb1c0001,
            0x1ffffffffb0a0001,
            0x1ffffffffaf20001,
            0x1ffffffffadc0001,
            0x1ffffffffa6a0001,
            0x1ffffffffa560001,
            0x1ffffffffa400001,
            0x1ffffffffa140001,
            0x1ffffffff9de0001,
            0x1ffffffff9d80001,
            0x1ffffffff9d20001,
            0x1ffffffff9ce0001,
            0x1ffffffff9140001,
            0x1ffffffff8ac0001,
            0x1ffffffff8a80001,
        ],
        sigma: DEFAULT_SIGMA,
        // 2^256 - 8519680
        b: big("115792089237316195423570985008687907853269984665640564039457584007913121120256"),
        d: 1 << 16,
        g: BigInt::from(5u64),
    }
}

pub fn pn17t512() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 17,
        q: vec![
            0x1fffffffffe00001,
            0x1fffffffffc80001,
            0x1fffffffffb40001,
            0x1fffffffff500001,
            0x1fffffffff380001,
            0x1fffffffff000001,
            0x1ffffffffef00001,
            0x1ffffffffee80001,
            0x1ffffffffeb40001,
            0x1ffffffffe780001,
            0x1ffffffffe600001,
            0x1ffffffffe4c0001,
            0x1ffffffffdf40001,
            0x1ffffffffdac0001,
            0x1ffffffffda40001,
            0x1ffffffffc680001,
            0x1ffffffffc000001,
            0x1ffffffffb880001,
            0x1ffffffffb7c0001,
            0x1ffffffffb300001,
            0x1ffffffffb1c0001,
            0x1ffffffffadc0001,
            0x1ffffffffa400001,
            0x1ffffffffa140001,
            0x1ffffffff9d80001,
            0x1ffffffff9140001,
            0x1ffffffff8ac0001,
            0x1ffffffff8a80001,
            0x1ffffffff81c0001,
            0x1ffffffff7800001,
            0x1ffffffff7680001,
            0x1ffffffff7080001,
            0x1ffffffff6c80001,
            0x1ffffffff6140001,
            0x1ffffffff5f40001,
            0x1ffffffff5700001,
            0x1ffffffff4bc0001,
        ], // 61 * 37 = 2257
        q_mul: vec![
            0x1ffffffff4380001,
            0x1ffffffff3240001,
            0x1ffffffff2dc0001,
            0x1ffffffff1a40001,
            0x1ffffffff11c0001,
            0x1ffffffff0fc0001,
            0x1ffffffff0d80001,
            0x1ffffffff0c80001,
            0x1ffffffff08c0001,
            0x1fffffffefd00001,
            0x1fffffffef9c0001,
            0x1fffffffef600001,
            0x1fffffffeef40001,
            0x1fffffffeed40001,
            0x1fffffffeed00001,
            0x1fffffffeebc0001,
            0x1fffffffed540001,
            0x1fffffffed440001,
            0x1fffffffed2c0001,
            0x1fffffffed200001,
            0x1fffffffec940001,
            0x1fffffffec6c0001,
            0x1fffffffebe80001,
            0x1fffffffebac0001,
            0x1fffffffeba40001,
            0x1fffffffeb4c0001,
            0x1fffffffeb280001,
            0x1fffffffea780001,
            0x1fffffffea440001,
            0x1fffffffe9f40001,
            0x1fffffffe97c0001,
            0x1fffffffe9300001,
            0x1fffffffe8d00001,
            0x1fffffffe8400001,
            0x1fffffffe7cc0001,
            0x1fffffffe7bc0001,
            0x1fffffffe7a80001,
        ],
        sigma: DEFAULT_SIGMA,
        // 2^512 - 18874368
        b: big(
            "1340780792994259709957402499820584612747936582059239337772356144372176403007354697680\
             1874298166903427690031858186486050853753882811946569946433648987209728",
        ),
        d: 1 << 17,
        g: BigInt::from(3u64),
    }
}

pub fn pn18t1024() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 18,
        q: vec![
            0x1fffffffffe00001,
            0x1fffffffffc80001,
            0x1fffffffff500001,
            0x1fffffffff380001,
            0x1fffffffff000001,
            0x1ffffffffef00001,
            0x1ffffffffee80001,
            0x1ffffffffe780001,
            0x1ffffffffe600001,
            0x1ffffffffc680001,
            0x1ffffffffc000001,
            0x1ffffffffb880001,
            0x1ffffffffb300001,
            0x1ffffffffa400001,
            0x1ffffffff9d80001,
            0x1ffffffff8a80001,
            0x1ffffffff7800001,
            0x1ffffffff7680001,
            0x1ffffffff7080001,
            0x1ffffffff6c80001,
            0x1ffffffff5700001,
            0x1ffffffff4380001,
            0x1ffffffff0d80001,
            0x1ffffffff0c80001,
            0x1fffffffefd00001,
            0x1fffffffef600001,
            0x1fffffffeed00001,
            0x1fffffffed200001,
            0x1fffffffebe80001,
            0x1fffffffeb280001,
            0x1fffffffea780001,
            0x1fffffffe9300001,
            0x1fffffffe8d00001,
            0x1fffffffe8400001,
            0x1fffffffe7a80001,
            0x1fffffffe7600001,
            0x1fffffffe7500001,
            0x1fffffffe6d80001,
            0x1fffffffe6000001,
            0x1fffffffe5a00001,
            0x1fffffffe2b00001,
            0x1fffffffe2680001,
            0x1fffffffe0480001,
            0x1fffffffdfd00001,
            0x1fffffffdf700001,
            0x1fffffffdef80001,
            0x1fffffffdea80001,
            0x1fffffffde680001,
            0x1fffffffde000001,
            0x1fffffffddd80001,
            0x1fffffffddd00001,
            0x1fffffffdd780001,
            0x1fffffffdcb80001,
            0x1fffffffdc380001,
            0x1fffffffdba80001,
            0x1fffffffdb380001,
            0x1fffffffda600001,
            0x1fffffffda180001,
            0x1fffffffd9700001,
            0x1fffffffd9680001,
            0x1fffffffd9080001,
            0x1fffffffd8c80001,
            0x1fffffffd8800001,
            0x1fffffffd7b80001,
            0x1fffffffd6f80001,
            0x1fffffffd5900001,
            0x1fffffffd5480001,
            0x1fffffffd5380001,
            0x1fffffffd3800001,
            0x1fffffffd3100001,
            0x1fffffffd2980001,
        ], // 61 * 71 = 4331
        q_mul: vec![
            0x1fffffffd2780001,
            0x1fffffffd1a00001,
            0x1fffffffd1700001,
            0x1fffffffd1580001,
            0x1fffffffd0f80001,
            0x1fffffffcfa80001,
            0x1fffffffce400001,
            0x1fffffffcdb80001,
            0x1fffffffcbc00001,
            0x1fffffffca280001,
            0x1fffffffc9e00001,
            0x1fffffffc8c00001,
            0x1fffffffc7f80001,
            0x1fffffffc6380001,
            0x1fffffffc5a00001,
            0x1fffffffc5900001,
            0x1fffffffc4100001,
            0x1fffffffc4080001,
            0x1fffffffc2f00001,
            0x1fffffffc2c00001,
            0x1fffffffc2580001,
            0x1fffffffc1e80001,
            0x1fffffffbe880001,
            0x1fffffffbe200001,
            0x1fffffffbd980001,
            0x1fffffffbd800001,
            0x1fffffffbca80001,
            0x1fffffffbc880001,
            0x1fffffffbbe00001,
            0x1fffffffbb700001,
            0x1fffffffbb200001,
            0x1fffffffbaa80001,
            0x1fffffffba300001,
            0x1fffffffb9e80001,
            0x1fffffffb7c00001,
            0x1fffffffb6c00001,
            0x1fffffffb5b80001,
            0x1fffffffb5a00001,
            0x1fffffffb5280001,
            0x1fffffffb4c00001,
            0x1fffffffb4780001,
            0x1fffffffb2800001,
            0x1fffffffb2580001,
            0x1fffffffb2380001,
            0x1fffffffb1e00001,
            0x1fffffffb1000001,
            0x1fffffffb0f00001,
            0x1fffffffb0580001,
            0x1fffffffafe00001,
            0x1fffffffad700001,
            0x1ffffffface00001,
            0x1fffffffacd00001,
            0x1fffffffac500001,
            0x1fffffffac200001,
            0x1fffffffaba80001,
            0x1fffffffa9a00001,
            0x1fffffffa9200001,
            0x1fffffffa7f00001,
            0x1fffffffa7b80001,
            0x1fffffffa7300001,
            0x1fffffffa7180001,
            0x1fffffffa5200001,
            0x1fffffffa4780001,
            0x1fffffffa4280001,
            0x1fffffffa3d00001,
            0x1fffffffa3200001,
            0x1fffffffa3100001,
            0x1fffffffa2c80001,
            0x1fffffffa2980001,
            0x1fffffffa2300001,
            0x1fffffffa1d00001,
        ],
        sigma: DEFAULT_SIGMA,
        // 2^1024 - 111673344
        b: big(
            "1797693134862315907729305190789024733617976978942306572734300811577326758055009631327\
             0847732240753602112011387987139335765878976881441662249284743063947412437776789342486\
             5485276302219601246094119453082952085005768838150682342462881473913110540827237163350\
             510684586298239947245938479716304835356329624112463872",
        ),
        d: 1 << 18,
        g: BigInt::from(3u64),
    }
}
