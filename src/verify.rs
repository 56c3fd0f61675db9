// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold ring verification.

use crate::Digest;
use crate::binding;
use crate::error::{Error, Result};
use crate::layers::Algebra;
use crate::ring::Ring;
use crate::ring_signature::RingSignature;
use crate::sign::{map_positions, ring_challenge};
use crate::threshold;

fn reject(check: &'static str) -> Error {
    tracing::debug!(check, "ring signature verification failed");
    Error::InvalidSignature
}

/// Check a ring signature over `digest` against `ring`.
///
/// Every failure collapses to [`Error::InvalidSignature`]; the failing check
/// is only reported through the log.
pub(crate) fn verify(signature: &RingSignature, digest: &Digest, ring: &Ring) -> Result<()> {
    if signature.params() != ring.params() {
        return Err(reject("parameter set"));
    }
    let ring_size = ring.len();
    if signature.ring_size() != ring_size {
        return Err(reject("ring size"));
    }
    let threshold = usize::try_from(signature.required_signers())
        .ok()
        .filter(|t| (1..=ring_size).contains(t))
        .ok_or_else(|| reject("threshold"))?;

    let algebra = Algebra::new(*ring.params())?;
    let members = ring
        .members()
        .iter()
        .map(|member| member.material(&algebra))
        .collect::<Result<Vec<_>>>()?;
    let shares = signature.shares();
    let leaves = map_positions(ring_size, |i| {
        let statements = algebra.statements(&members[i], digest);
        algebra
            .recompute_position(&statements, signature.responses(i), &shares[i])
            .map(|commitments| algebra.leaf(i, &commitments))
    })
    .into_iter()
    .collect::<Option<Vec<[u8; 32]>>>()
    .ok_or_else(|| reject("response norm"))?;

    let challenge = ring_challenge(
        ring.params(),
        ring.id(),
        digest,
        signature.required_signers(),
        &leaves,
    );
    if !threshold::consistent(&challenge, shares, threshold) {
        return Err(reject("share polynomial"));
    }
    if !binding::check(
        signature.binding_tag(),
        &challenge,
        ring.id(),
        signature.required_signers(),
        &leaves,
        shares,
    ) {
        return Err(reject("binding tag"));
    }
    tracing::debug!(
        parameter_set = ring.params().name(),
        ring_size,
        "ring signature verified"
    );
    Ok(())
}

/// Verify several `(signature, digest, ring)` triples, in parallel when enabled.
///
/// Returns one result per item, in input order.
#[cfg(feature = "parallel")]
pub(crate) fn verify_batch(items: &[(&RingSignature, &Digest, &Ring)]) -> Vec<Result<()>> {
    use rayon::prelude::*;
    items
        .par_iter()
        .map(|(signature, digest, ring)| verify(signature, digest, ring))
        .collect()
}

/// Verify several `(signature, digest, ring)` triples (serial version when parallel feature is disabled).
#[cfg(not(feature = "parallel"))]
pub(crate) fn verify_batch(items: &[(&RingSignature, &Digest, &Ring)]) -> Vec<Result<()>> {
    items
        .iter()
        .map(|(signature, digest, ring)| verify(signature, digest, ring))
        .collect()
}
