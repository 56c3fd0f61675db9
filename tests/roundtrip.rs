//! Ring sign/verify roundtrip tests.

use chipmunk_ring::{
    Error, KeyPair, ParameterSet, Ring, RingSigner, RingVerifier, SigningKey, VerifyingKey, digest,
    keygen, sign_ring, verify_batch, verify_ring,
};
use signature::{Signer, Verifier};

fn ring_of(params: ParameterSet, size: usize) -> (Vec<KeyPair>, Vec<VerifyingKey>) {
    let keys: Vec<KeyPair> = (0..size)
        .map(|_| keygen(params, None).expect("keygen failed"))
        .collect();
    let ring = keys.iter().map(|k| k.verifying_key().clone()).collect();
    (keys, ring)
}

fn roundtrip(params: ParameterSet) {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(params, 3);
    let msg = digest(b"test message for ChipmunkRing");

    let sig = sign_ring(&[(1, keys[1].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    assert_eq!(sig.to_bytes().len(), chipmunk_ring::signature_size(3, &params));
    verify_ring(&sig, &msg, &ring).expect("verification failed");
}

#[test]
fn roundtrip_fast() {
    roundtrip(ParameterSet::FAST);
}

#[test]
fn roundtrip_balanced() {
    roundtrip(ParameterSet::BALANCED);
}

#[test]
fn roundtrip_maximum() {
    roundtrip(ParameterSet::MAXIMUM);
}

#[test]
fn roundtrip_paranoid() {
    roundtrip(ParameterSet::PARANOID);
}

#[test]
fn hello_scenario_balanced() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::BALANCED, 4);
    let hello = digest(b"hello");

    let sig = sign_ring(&[(2, keys[2].signing_key())], &hello, &ring, 1, &mut rng).expect("signing failed");
    verify_ring(&sig, &hello, &ring).expect("verification failed");

    let bytes = sig.to_bytes();
    let decoded = chipmunk_ring::RingSignature::from_bytes(&bytes).expect("decode");
    assert_eq!(
        verify_ring(&decoded, &digest(b"hellp"), &ring),
        Err(Error::InvalidSignature)
    );
}

#[test]
fn every_signer_position_verifies() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::FAST, 5);
    let msg = digest(b"positions");
    for (position, key) in keys.iter().enumerate() {
        let sig = sign_ring(&[(position, key.signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
        verify_ring(&sig, &msg, &ring).expect("verification failed");
    }
}

#[test]
fn flipped_digest_bytes_fail() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::FAST, 3);
    let msg = digest(b"tamper");
    let sig = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    for i in [0, 7, 16, 31] {
        let mut tampered = msg;
        tampered[i] ^= 0x01;
        assert_eq!(verify_ring(&sig, &tampered, &ring), Err(Error::InvalidSignature));
    }
}

#[test]
fn substituted_member_fails() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::FAST, 3);
    let msg = digest(b"substitute");
    let sig = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");

    let outsider = keygen(ParameterSet::FAST, None).expect("keygen failed");
    for position in 0..ring.len() {
        let mut substituted = ring.clone();
        substituted[position] = outsider.verifying_key().clone();
        assert_eq!(verify_ring(&sig, &msg, &substituted), Err(Error::InvalidSignature));
    }

    let mut reordered = ring.clone();
    reordered.swap(1, 2);
    assert_eq!(verify_ring(&sig, &msg, &reordered), Err(Error::InvalidSignature));
}

#[test]
fn tampered_bytes_fail() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::FAST, 2);
    let msg = digest(b"bytes");
    let sig = sign_ring(&[(1, keys[1].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    let bytes = sig.to_bytes();

    // First ring-LWE response byte, a middle byte, last Chipmunk response byte.
    for offset in [16, bytes.len() / 2, bytes.len() - 1] {
        let mut tampered = bytes.clone();
        tampered[offset] ^= 0x04;
        match chipmunk_ring::RingSignature::from_bytes(&tampered) {
            Ok(decoded) => assert!(verify_ring(&decoded, &msg, &ring).is_err()),
            Err(err) => assert!(matches!(err, Error::CorruptSignature { .. })),
        }
    }
}

#[test]
fn signer_and_verifier_traits() {
    let (keys, ring) = ring_of(ParameterSet::FAST, 3);
    let ring = Ring::new(ring).expect("ring");
    let signers: Vec<(usize, SigningKey)> = vec![(0, keys[0].signing_key().clone()), (2, keys[2].signing_key().clone())];
    let signer = RingSigner::new(ring.clone(), signers, 2);
    let verifier = RingVerifier::new(ring);

    let sig = signer.try_sign(b"trait message").expect("signing failed");
    assert_eq!(sig.required_signers(), 2);
    verifier.verify(b"trait message", &sig).expect("verification failed");
    assert!(verifier.verify(b"other message", &sig).is_err());
}

#[test]
fn message_size_limit() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(ParameterSet::FAST, 2);
    let big = vec![0u8; chipmunk_ring::MAX_MESSAGE_SIZE + 1];
    assert_eq!(
        chipmunk_ring::sign_message(&[(0, keys[0].signing_key())], &big, &ring, 1, &mut rng),
        Err(Error::MessageTooLarge {
            size: big.len(),
            max: chipmunk_ring::MAX_MESSAGE_SIZE
        })
    );
    let sig = chipmunk_ring::sign_message(&[(0, keys[0].signing_key())], b"small", &ring, 1, &mut rng)
        .expect("signing failed");
    chipmunk_ring::verify_message(&sig, b"small", &ring).expect("verification failed");
}

#[test]
fn batch_verification() {
    let mut rng = rand::rng();
    let (keys, members) = ring_of(ParameterSet::FAST, 3);
    let ring = Ring::new(members.clone()).expect("ring");
    let a = digest(b"first");
    let b = digest(b"second");
    let sig_a = sign_ring(&[(0, keys[0].signing_key())], &a, &members, 1, &mut rng).expect("signing failed");
    let sig_b = sign_ring(&[(1, keys[1].signing_key())], &b, &members, 1, &mut rng).expect("signing failed");

    let results = verify_batch(&[(&sig_a, &a, &ring), (&sig_b, &b, &ring), (&sig_a, &b, &ring)]);
    assert_eq!(results, vec![Ok(()), Ok(()), Err(Error::InvalidSignature)]);
}

#[test]
fn vk_from_sk() {
    let keypair = keygen(ParameterSet::FAST, None).expect("keygen failed");
    let derived = VerifyingKey::try_from(keypair.signing_key()).expect("derive");
    assert_eq!(&derived, keypair.verifying_key());

    let sig = keypair.signing_key().try_sign(b"derivation").expect("signing failed");
    derived.verify(b"derivation", &sig).expect("verification failed");
}
