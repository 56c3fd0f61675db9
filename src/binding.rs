// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding tag over every position's closure.
//!
//! A Merkle tree over `(c, L_i, c_i)` leaves, finalised with the challenge,
//! the ring id and the threshold. Any component moved in from another
//! session changes a leaf, the challenge or both.

use crate::hash::{DOMAIN_BIND_LEAF, DOMAIN_BIND_NODE, DOMAIN_BIND_ROOT, hash32};
use crate::threshold::Share;
use subtle::ConstantTimeEq;

/// Binding tag of a signing session.
pub(crate) fn bind(
    challenge: &Share,
    ring_id: &[u8; 32],
    threshold: u32,
    leaves: &[[u8; 32]],
    shares: &[Share],
) -> [u8; 32] {
    let mut level: Vec<[u8; 32]> = leaves
        .iter()
        .zip(shares)
        .map(|(leaf, share)| {
            hash32(
                DOMAIN_BIND_LEAF,
                &[challenge.as_slice(), leaf.as_slice(), share.as_slice()],
            )
        })
        .collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash32(
                    DOMAIN_BIND_NODE,
                    &[challenge.as_slice(), left.as_slice(), right.as_slice()],
                ),
                _ => pair[0],
            })
            .collect();
    }
    let root = level.first().copied().unwrap_or_default();
    hash32(
        DOMAIN_BIND_ROOT,
        &[
            challenge.as_slice(),
            ring_id.as_slice(),
            threshold.to_be_bytes().as_slice(),
            root.as_slice(),
        ],
    )
}

/// Constant-time comparison of a received tag with the recomputed one.
pub(crate) fn check(
    tag: &[u8; 32],
    challenge: &Share,
    ring_id: &[u8; 32],
    threshold: u32,
    leaves: &[[u8; 32]],
    shares: &[Share],
) -> bool {
    let expected = bind(challenge, ring_id, threshold, leaves, shares);
    expected.as_slice().ct_eq(tag.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_input_is_bound() {
        let leaves = [[1u8; 32], [2u8; 32], [3u8; 32]];
        let shares = [[4u8; 32], [5u8; 32], [6u8; 32]];
        let c = [7u8; 32];
        let id = [8u8; 32];
        let tag = bind(&c, &id, 1, &leaves, &shares);
        assert!(check(&tag, &c, &id, 1, &leaves, &shares));

        assert!(!check(&tag, &c, &id, 2, &leaves, &shares));
        assert!(!check(&tag, &[0u8; 32], &id, 1, &leaves, &shares));
        assert!(!check(&tag, &c, &[0u8; 32], 1, &leaves, &shares));
        let mut swapped = leaves;
        swapped.swap(0, 1);
        assert!(!check(&tag, &c, &id, 1, &swapped, &shares));
        let mut mixed = shares;
        mixed[2] = [9u8; 32];
        assert!(!check(&tag, &c, &id, 1, &leaves, &mixed));
    }
}
