//! Threshold and ring-size boundaries.

use chipmunk_ring::{Error, KeyPair, ParameterSet, VerifyingKey, digest, keygen, sign_ring, verify_ring};

fn ring_of(size: usize) -> (Vec<KeyPair>, Vec<VerifyingKey>) {
    let keys: Vec<KeyPair> = (0..size)
        .map(|i| keygen(ParameterSet::FAST, Some(&[i as u8 + 1; 32])).expect("keygen failed"))
        .collect();
    let ring = keys.iter().map(|k| k.verifying_key().clone()).collect();
    (keys, ring)
}

#[test]
fn one_of_n() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(4);
    let msg = digest(b"one of four");
    let sig = sign_ring(&[(3, keys[3].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    assert_eq!(sig.required_signers(), 1);
    verify_ring(&sig, &msg, &ring).expect("verification failed");
}

#[test]
fn n_of_n() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(4);
    let msg = digest(b"four of four");
    let signers: Vec<_> = keys.iter().enumerate().map(|(i, k)| (i, k.signing_key())).collect();
    let sig = sign_ring(&signers, &msg, &ring, 4, &mut rng).expect("signing failed");
    verify_ring(&sig, &msg, &ring).expect("verification failed");
}

#[test]
fn middle_thresholds() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(5);
    let msg = digest(b"some of five");
    for positions in [vec![0, 4], vec![1, 2, 3], vec![4, 0, 2, 1]] {
        let signers: Vec<_> = positions.iter().map(|&i| (i, keys[i].signing_key())).collect();
        let t = signers.len() as u32;
        let sig = sign_ring(&signers, &msg, &ring, t, &mut rng).expect("signing failed");
        verify_ring(&sig, &msg, &ring).expect("verification failed");
    }
}

#[test]
fn size_is_independent_of_threshold() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(3);
    let msg = digest(b"sizes");
    let one = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    let signers: Vec<_> = keys.iter().enumerate().map(|(i, k)| (i, k.signing_key())).collect();
    let all = sign_ring(&signers, &msg, &ring, 3, &mut rng).expect("signing failed");
    assert_eq!(one.to_bytes().len(), all.to_bytes().len());
}

#[test]
fn threshold_out_of_range() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(3);
    let msg = digest(b"range");
    assert_eq!(
        sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 0, &mut rng),
        Err(Error::ThresholdOutOfRange {
            required: 0,
            ring_size: 3
        })
    );
    let signers: Vec<_> = keys.iter().enumerate().map(|(i, k)| (i, k.signing_key())).collect();
    assert_eq!(
        sign_ring(&signers, &msg, &ring, 4, &mut rng),
        Err(Error::ThresholdOutOfRange {
            required: 4,
            ring_size: 3
        })
    );
}

#[test]
fn ring_too_small() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(1);
    let msg = digest(b"small");
    assert_eq!(
        sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng),
        Err(Error::RingTooSmall { size: 1 })
    );
    assert_eq!(
        sign_ring(&[(0, keys[0].signing_key())], &msg, &[], 1, &mut rng),
        Err(Error::RingTooSmall { size: 0 })
    );
}

#[test]
fn signer_list_errors() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(3);
    let msg = digest(b"signers");

    assert_eq!(
        sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 2, &mut rng),
        Err(Error::InsufficientSigners {
            required: 2,
            provided: 1
        })
    );
    assert_eq!(
        sign_ring(
            &[(0, keys[0].signing_key()), (1, keys[1].signing_key())],
            &msg,
            &ring,
            1,
            &mut rng
        ),
        Err(Error::ExcessSigners {
            required: 1,
            provided: 2
        })
    );
    assert_eq!(
        sign_ring(&[(5, keys[0].signing_key())], &msg, &ring, 1, &mut rng),
        Err(Error::SignerNotInRing { index: 5 })
    );
    assert_eq!(
        sign_ring(&[(1, keys[0].signing_key())], &msg, &ring, 1, &mut rng),
        Err(Error::SignerNotInRing { index: 1 })
    );
    assert_eq!(
        sign_ring(
            &[(2, keys[2].signing_key()), (2, keys[2].signing_key())],
            &msg,
            &ring,
            2,
            &mut rng
        ),
        Err(Error::DuplicateSigner { index: 2 })
    );

    let foreign = keygen(ParameterSet::BALANCED, Some(&[9u8; 32])).expect("keygen failed");
    assert_eq!(
        sign_ring(&[(0, foreign.signing_key())], &msg, &ring, 1, &mut rng),
        Err(Error::KeyTypeMismatch {
            expected: "FAST",
            got: "BALANCED"
        })
    );
}

#[test]
fn duplicate_ring_members() {
    let mut rng = rand::rng();
    let (keys, mut ring) = ring_of(3);
    ring[2] = ring[0].clone();
    assert_eq!(
        sign_ring(&[(0, keys[0].signing_key())], &digest(b"dup"), &ring, 1, &mut rng),
        Err(Error::DuplicateRingMember { first: 0, second: 2 })
    );
}

#[test]
fn threshold_is_bound() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(3);
    let msg = digest(b"bound");
    let sig = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");

    // Raise the threshold field in the header.
    let mut bytes = sig.to_bytes();
    bytes[11] = 2;
    let raised = chipmunk_ring::RingSignature::from_bytes(&bytes).expect("well formed");
    assert_eq!(raised.required_signers(), 2);
    assert_eq!(verify_ring(&raised, &msg, &ring), Err(Error::InvalidSignature));
}
