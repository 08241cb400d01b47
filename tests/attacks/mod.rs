use cryptolab::attack::equivalent::{self, Transform, TEA_TRANSFORMS};
use cryptolab::attack::{
    avalanche, brute_force, differential, recovery, related, side_channel, structure, timing,
};
use cryptolab::attack::Error;
use cryptolab::{stats, Algorithm, CipherEngine, Config, Key, Ntsa, Tea};

use crate::common::{random_bytes, random_key, test_key, TEST_PLAINTEXT};

#[test]
fn tea_equivalence_classes() {
    for _ in 0..32 {
        let key = random_key();
        let msg = random_bytes(24);
        let base = Tea::new(&key).encrypt(&msg).unwrap();

        for equivalent in equivalent::tea_equivalent_keys(&key).unwrap().iter() {
            assert_ne!(*equivalent, key);
            assert_eq!(Tea::new(equivalent).encrypt(&msg).unwrap(), base);
        }

        for transform in TEA_TRANSFORMS.iter().filter(|t| !t.is_tea_equivalence()) {
            let other = transform.apply(&key).unwrap();
            assert_ne!(Tea::new(&other).encrypt(&msg).unwrap(), base, "{:?}", transform);
        }
    }
}

#[test]
fn ntsa_has_no_tea_equivalents() {
    let key = test_key();
    let base = Ntsa::new(&key).encrypt(TEST_PLAINTEXT).unwrap();

    for equivalent in equivalent::tea_equivalent_keys(&key).unwrap().iter() {
        assert_ne!(Ntsa::new(equivalent).encrypt(TEST_PLAINTEXT).unwrap(), base);
    }

    for idx in 0..16 {
        let perturbed = Transform::ByteIncrement(idx).apply(&key).unwrap();
        let ciphertext = Ntsa::new(&perturbed).encrypt(TEST_PLAINTEXT).unwrap();
        assert_ne!(ciphertext, base, "key byte {}", idx);
    }
}

#[test]
fn equivalent_key_report() {
    let report = equivalent::run(&test_key(), TEST_PLAINTEXT).unwrap();

    assert_eq!(report.tea_matches, 3);
    assert_eq!(report.ntsa_collisions, 0);
    assert_eq!(report.base_key, "000102030405060708090a0b0c0d0e0f");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tea"][0]["transform"], "TopBitWords01");
    assert_eq!(json["tea"][0]["matches_base"], true);
    assert_eq!(json["ntsa"][0]["transform"]["ByteIncrement"], 0);
}

#[test]
fn related_keys_diverge() {
    let report = related::run(&random_key(), TEST_PLAINTEXT).unwrap();

    // 32 ciphertext bytes compared per TEA trial
    for t in report.tea.iter() {
        assert_eq!(t.normalized, t.correlation as f64 / 256.0);
    }
    assert!(report.tea_mean_normalized > 0.0);
    assert!(report.ntsa_mean_normalized > 0.0);
}

#[test]
fn avalanche_through_aes() {
    let aes = cryptolab::Aes128Cbc::new(&test_key());
    let profile = avalanche::measure(&aes, TEST_PLAINTEXT).unwrap();

    assert_eq!(profile.algorithm, Algorithm::Aes128Cbc);
    assert_eq!(profile.flips.len(), avalanche::MAX_FLIPPED_BITS);
    assert!(profile.mean_percentage > 0.0);
}

#[test]
fn timing_and_brute_force() {
    let config = Config::quick();

    let timing = timing::run(&test_key(), TEST_PLAINTEXT, &config).unwrap();
    assert_eq!(timing.plaintext_len, 28);
    assert_eq!(timing.profiles.len(), 3);

    let brute = brute_force::run(&test_key(), &config).unwrap();
    let algorithms: Vec<Algorithm> = brute.estimates.iter().map(|e| e.algorithm).collect();
    assert_eq!(algorithms, [Algorithm::Tea, Algorithm::Ntsa, Algorithm::Aes128Cbc]);

    let json = serde_json::to_value(&brute).unwrap();
    assert_eq!(json["estimates"][2]["algorithm"], "AES-128-CBC");
    assert_eq!(json["estimates"][0]["key_space_bits"], 128);
}

#[test]
fn differential_is_reproducible() {
    let config = Config::quick().seed(42).differential_samples(100).differential_top(5);

    let first = differential::run(&random_key(), &config).unwrap();
    assert_eq!(first[0].seed, 42);
    assert_eq!(first[0].algorithm, Algorithm::Tea);
    assert_eq!(first[1].algorithm, Algorithm::Ntsa);

    for report in first.iter() {
        assert!(report.top_characteristics.len() <= 5);
        assert_eq!(report.random_baseline, 1.0 / 18_446_744_073_709_551_616.0);
        assert!(report.max_probability <= 1.0);
    }
}

#[test]
fn side_channel_report() {
    let config = Config::quick().side_channel_repeats(2, 1).side_channel_top(8);
    let reports = side_channel::run(&random_key(), &config).unwrap();

    for report in reports.iter() {
        assert_eq!(report.bits.len(), 128);
        assert_eq!(report.top_bits.len(), 8);
        assert_eq!(report.vulnerability, side_channel::classify(report.significant_bits));
    }

    let json = serde_json::to_value(&reports[0]).unwrap();
    let vulnerability = json["vulnerability"].as_str().unwrap();
    assert!(["HIGH", "MODERATE", "LOW"].contains(&vulnerability));
}

#[test]
fn key_recovery() {
    let secret = random_key();
    let reports = recovery::run(&secret, TEST_PLAINTEXT, &Config::default()).unwrap();

    for report in reports.iter() {
        assert_eq!(report.candidates_tested, 65_536);
        assert!(report.recovered);
        assert!(!report.matches.is_empty());
    }

    assert!(matches!(
        recovery::run(&secret, b"1234567", &Config::default()),
        Err(Error::InsufficientPlaintext(7))
    ));
}

#[test]
fn invalid_key_hex() {
    assert!(matches!(Key::from_hex("0011").map_err(Error::Key), Err(Error::Key(_))));
}

#[test]
fn structural_profiles() {
    let json = serde_json::to_value(&structure::run()).unwrap();

    assert_eq!(json[0]["algorithm"], "TEA");
    assert_eq!(json[1]["algorithm"], "NTSA");
    assert_eq!(json[2]["block_size_bits"], 128);
}

#[test]
fn confidence_interval() {
    let samples = [9.0, 10.0, 11.0, 10.0];
    let summary = stats::summarize(&samples, 0.95);

    let expected = 1.96 * stats::std_dev(&samples) / 2.0;
    assert!((summary.interval.margin_of_error - expected).abs() < 1e-12);
    assert!((summary.interval.lower - (10.0 - expected)).abs() < 1e-12);
    assert!((summary.interval.upper - (10.0 + expected)).abs() < 1e-12);
}
