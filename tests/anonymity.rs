//! Signer indistinguishability and unlinkability.

use chipmunk_ring::{KeyPair, ParameterSet, VerifyingKey, digest, keygen, sign_ring, verify_ring};
use std::collections::HashSet;
use std::time::{Duration, Instant};

const RING_SIZE: usize = 4;
const TRIALS: usize = 200;

fn ring() -> (Vec<KeyPair>, Vec<VerifyingKey>) {
    let keys: Vec<KeyPair> = (0..RING_SIZE)
        .map(|_| keygen(ParameterSet::FAST, None).expect("keygen failed"))
        .collect();
    let ring = keys.iter().map(|k| k.verifying_key().clone()).collect();
    (keys, ring)
}

#[test]
fn positions_are_indistinguishable() {
    let mut rng = rand::rng();
    let (keys, ring) = ring();
    let msg = digest(b"anonymity");

    let mut seen = HashSet::with_capacity(TRIALS);
    let mut lengths = HashSet::new();
    let mut timings: Vec<Vec<Duration>> = vec![Vec::with_capacity(TRIALS / RING_SIZE); RING_SIZE];
    for trial in 0..TRIALS {
        let position = trial % RING_SIZE;
        let start = Instant::now();
        let sig = sign_ring(&[(position, keys[position].signing_key())], &msg, &ring, 1, &mut rng)
            .expect("signing failed");
        timings[position].push(start.elapsed());

        let bytes = sig.to_bytes();
        lengths.insert(bytes.len());
        assert!(seen.insert(bytes), "two signatures collided");
    }
    assert_eq!(lengths.len(), 1);

    let medians: Vec<f64> = timings
        .iter_mut()
        .map(|samples| {
            samples.sort_unstable();
            samples[samples.len() / 2].as_secs_f64()
        })
        .collect();
    let fastest = medians.iter().copied().fold(f64::INFINITY, f64::min);
    let slowest = medians.iter().copied().fold(0.0, f64::max);
    assert!(
        slowest < fastest * 2.0,
        "signing time depends on position: medians {medians:?}"
    );
}

#[test]
fn same_signer_signatures_are_unlinkable() {
    let mut rng = rand::rng();
    let (keys, ring) = ring();
    let msg = digest(b"unlinkable");

    let first = sign_ring(&[(1, keys[1].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    let second = sign_ring(&[(1, keys[1].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    assert_ne!(first, second);
    assert_ne!(first.binding_tag(), second.binding_tag());
    verify_ring(&first, &msg, &ring).expect("verification failed");
    verify_ring(&second, &msg, &ring).expect("verification failed");
}
