//! Ring signature wire format.

use chipmunk_ring::{
    Error, KeyPair, ParameterSet, RingSignature, VerifyingKey, digest, keygen, sign_ring, signature_size,
    verify_ring,
};

fn ring_of(size: usize) -> (Vec<KeyPair>, Vec<VerifyingKey>) {
    let keys: Vec<KeyPair> = (0..size)
        .map(|_| keygen(ParameterSet::FAST, None).expect("keygen failed"))
        .collect();
    let ring = keys.iter().map(|k| k.verifying_key().clone()).collect();
    (keys, ring)
}

#[test]
fn decode_encode_ring_sizes() {
    let mut rng = rand::rng();
    let msg = digest(b"codec");
    for size in [2usize, 4, 16, 64] {
        let (keys, ring) = ring_of(size);
        let signer = size / 2;
        let sig = sign_ring(&[(signer, keys[signer].signing_key())], &msg, &ring, 1, &mut rng)
            .expect("signing failed");

        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), signature_size(size as u32, &ParameterSet::FAST));
        assert_eq!(bytes.len(), sig.encoded_len());
        assert_eq!(&bytes[..2], &[0x01, 0x08]);

        let decoded = RingSignature::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded, sig);
        assert_eq!(decoded.ring_size(), size);
        verify_ring(&decoded, &msg, &ring).expect("verification failed");
    }
}

#[test]
fn size_is_monotone_in_ring_size() {
    for params in [
        ParameterSet::FAST,
        ParameterSet::BALANCED,
        ParameterSet::MAXIMUM,
        ParameterSet::PARANOID,
    ] {
        let sizes: Vec<usize> = (2..=64).map(|n| signature_size(n, &params)).collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn malformed_input_is_corrupt() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(2);
    let msg = digest(b"malformed");
    let sig = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    let bytes = sig.to_bytes();

    let corrupt = |bytes: &[u8]| matches!(RingSignature::from_bytes(bytes), Err(Error::CorruptSignature { .. }));

    assert!(corrupt(&[]));
    assert!(corrupt(&bytes[..3]));
    assert!(corrupt(&bytes[..bytes.len() - 1]));

    let mut longer = bytes.clone();
    longer.push(0);
    assert!(corrupt(&longer));

    // Ring size 1 and a ring size larger than the buffer.
    let mut small = bytes.clone();
    small[4..8].copy_from_slice(&1u32.to_be_bytes());
    assert!(corrupt(&small));
    let mut large = bytes.clone();
    large[4..8].copy_from_slice(&3u32.to_be_bytes());
    assert!(corrupt(&large));
    let mut huge = bytes.clone();
    huge[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
    assert!(corrupt(&huge));

    // Threshold 0 and above the ring size.
    let mut zero = bytes.clone();
    zero[8..12].copy_from_slice(&0u32.to_be_bytes());
    assert!(corrupt(&zero));
    let mut above = bytes.clone();
    above[8..12].copy_from_slice(&3u32.to_be_bytes());
    assert!(corrupt(&above));

    // First section length.
    let mut section = bytes.clone();
    section[15] ^= 0x01;
    assert!(corrupt(&section));

    // A Chipmunk signature tag is not a ring signature.
    let mut tag = bytes;
    tag[1] = 0x07;
    assert!(corrupt(&tag));
}

#[test]
fn unknown_parameter_set() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(2);
    let sig = sign_ring(&[(1, keys[1].signing_key())], &digest(b"id"), &ring, 1, &mut rng).expect("signing failed");
    let mut bytes = sig.to_bytes();
    bytes[2..4].copy_from_slice(&0x0042u16.to_be_bytes());
    assert_eq!(RingSignature::from_bytes(&bytes), Err(Error::UnknownParameterSet(0x0042)));
}

#[test]
fn custom_parameter_set_end_to_end() {
    let mut rng = rand::rng();
    let custom = ParameterSet::custom(0x8001, *ParameterSet::FAST.values()).expect("custom set");
    let keys: Vec<KeyPair> = (0..2)
        .map(|_| keygen(custom, None).expect("keygen failed"))
        .collect();
    let ring: Vec<VerifyingKey> = keys.iter().map(|k| k.verifying_key().clone()).collect();
    let msg = digest(b"custom");

    let sig = sign_ring(&[(1, keys[1].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");
    let bytes = sig.to_bytes();
    assert_eq!(bytes.len(), signature_size(2, &custom));
    assert_eq!(&bytes[2..4], &0x8001u16.to_be_bytes());

    assert_eq!(RingSignature::from_bytes(&bytes), Err(Error::UnknownParameterSet(0x8001)));
    assert!(matches!(
        RingSignature::from_bytes_with_params(ParameterSet::FAST, &bytes),
        Err(Error::CorruptSignature { .. })
    ));

    let decoded = RingSignature::from_bytes_with_params(custom, &bytes).expect("decode");
    assert_eq!(decoded, sig);
    verify_ring(&decoded, &msg, &ring).expect("verification failed");
    assert_eq!(verify_ring(&decoded, &digest(b"other"), &ring), Err(Error::InvalidSignature));
}

#[test]
fn parameter_set_mismatch_is_invalid() {
    let mut rng = rand::rng();
    let (keys, ring) = ring_of(2);
    let msg = digest(b"mismatch");
    let sig = sign_ring(&[(0, keys[0].signing_key())], &msg, &ring, 1, &mut rng).expect("signing failed");

    let other: Vec<VerifyingKey> = (0..2)
        .map(|_| keygen(ParameterSet::BALANCED, None).expect("keygen failed").verifying_key().clone())
        .collect();
    assert_eq!(verify_ring(&sig, &msg, &other), Err(Error::InvalidSignature));
    let (_, bigger) = ring_of(3);
    assert_eq!(verify_ring(&sig, &msg, &bigger), Err(Error::InvalidSignature));
}
