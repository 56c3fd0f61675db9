// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold ring signing.
//!
//! Non-signing positions are simulated once per session: a share and
//! responses are drawn first and the commitments solved for. Genuine
//! positions commit to fresh masks, the Fiat-Shamir challenge is hashed over
//! every position's commitments, the signer shares are interpolated from the
//! challenge and the simulated shares, and the signers answer. A rejected
//! response restarts every genuine mask; simulated positions are kept.

use crate::Digest;
use crate::binding;
use crate::error::{Error, Result};
use crate::hash::{DOMAIN_CHALLENGE, DOMAIN_MASK, DOMAIN_SIMULATE, XofStream, hash32};
use crate::layers::{Algebra, Opening, Response, Statement, Witness};
use crate::params::{MAX_SIGNING_ATTEMPTS, ParameterSet};
use crate::ring::Ring;
use crate::ring_signature::RingSignature;
use crate::signing_key::SigningKey;
use crate::threshold::{self, Share};
use rand::CryptoRng;
use zeroize::Zeroizing;

/// Run `f` for every position, in parallel when enabled.
#[cfg(feature = "parallel")]
pub(crate) fn map_positions<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Run `f` for every position (serial version when parallel feature is disabled).
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_positions<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).map(f).collect()
}

/// The Fiat-Shamir challenge over every position's leaf.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn ring_challenge(
    params: &ParameterSet,
    ring_id: &[u8; 32],
    digest: &Digest,
    required_signers: u32,
    leaves: &[[u8; 32]],
) -> Share {
    let id = params.id().to_be_bytes();
    let ring_size = (leaves.len() as u32).to_be_bytes();
    let threshold = required_signers.to_be_bytes();
    let mut inputs: Vec<&[u8]> = vec![
        id.as_slice(),
        ring_id.as_slice(),
        digest.as_slice(),
        ring_size.as_slice(),
        threshold.as_slice(),
    ];
    inputs.extend(leaves.iter().map(|leaf| leaf.as_slice()));
    hash32(DOMAIN_CHALLENGE, &inputs)
}

/// Check the threshold and the signer list against the ring.
fn validate_signers(signers: &[(usize, &SigningKey)], ring: &Ring, required_signers: u32) -> Result<usize> {
    let ring_size = ring.len();
    let threshold = usize::try_from(required_signers)
        .ok()
        .filter(|t| (1..=ring_size).contains(t))
        .ok_or(Error::ThresholdOutOfRange {
            required: required_signers,
            ring_size,
        })?;
    if signers.len() < threshold {
        return Err(Error::InsufficientSigners {
            required: threshold,
            provided: signers.len(),
        });
    }
    if signers.len() > threshold {
        return Err(Error::ExcessSigners {
            required: threshold,
            provided: signers.len(),
        });
    }
    let mut taken = vec![false; ring_size];
    for &(index, key) in signers {
        if index >= ring_size {
            return Err(Error::SignerNotInRing { index });
        }
        if taken[index] {
            return Err(Error::DuplicateSigner { index });
        }
        taken[index] = true;
        if key.params() != ring.params() {
            return Err(Error::KeyTypeMismatch {
                expected: ring.params().name(),
                got: key.params().name(),
            });
        }
    }
    Ok(threshold)
}

/// A contributing signer with its expanded witnesses.
struct Genuine<'a> {
    position: usize,
    seed: &'a [u8],
    witnesses: Vec<Witness>,
}

#[allow(clippy::cast_possible_truncation)]
fn position_bytes(position: usize) -> [u8; 4] {
    (position as u32).to_be_bytes()
}

/// Produce a `required_signers`-of-`ring.len()` signature over `digest`.
pub(crate) fn sign(
    signers: &[(usize, &SigningKey)],
    digest: &Digest,
    ring: &Ring,
    required_signers: u32,
    rng: &mut impl CryptoRng,
) -> Result<RingSignature> {
    validate_signers(signers, ring, required_signers)?;
    let params = *ring.params();
    let ring_size = ring.len();
    tracing::debug!(
        parameter_set = params.name(),
        ring_size,
        required_signers,
        "ring signing started"
    );

    let algebra = Algebra::new(params)?;
    let members = ring
        .members()
        .iter()
        .map(|member| member.material(&algebra))
        .collect::<Result<Vec<_>>>()?;
    let statements: Vec<Vec<Statement>> =
        map_positions(ring_size, |i| algebra.statements(&members[i], digest));

    let mut genuine = Vec::with_capacity(signers.len());
    let mut slot = vec![None; ring_size];
    for (k, &(position, key)) in signers.iter().enumerate() {
        let (public, secret) = key.expand(&algebra);
        if public != members[position] {
            return Err(Error::SignerNotInRing { index: position });
        }
        slot[position] = Some(k);
        genuine.push(Genuine {
            position,
            seed: key.seed(),
            witnesses: secret.witnesses(&algebra, digest),
        });
    }
    let open: Vec<usize> = genuine.iter().map(|g| g.position).collect();

    let mut session = Zeroizing::new(vec![0u8; params.randomness_size()]);
    rng.fill_bytes(&mut session[..]);

    let simulated = map_positions(ring_size, |i| {
        slot[i].is_none().then(|| {
            let mut stream = XofStream::new(
                DOMAIN_SIMULATE,
                &[session.as_slice(), digest.as_slice(), position_bytes(i).as_slice()],
            );
            let sim = algebra.simulate_position(&statements[i], &mut stream);
            let leaf = algebra.leaf(i, &sim.commitments);
            (sim, leaf)
        })
    });
    let fixed: Vec<(usize, Share)> = simulated
        .iter()
        .enumerate()
        .filter_map(|(i, sim)| sim.as_ref().map(|(sim, _)| (i, sim.share)))
        .collect();

    // Rejection sampling: each attempt draws fresh masks so an accepted response
    // is independent of the witness. Exhausting attempts is the only failure.
    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let openings: Vec<Opening> = map_positions(genuine.len(), |k| {
            let signer = &genuine[k];
            let mut stream = XofStream::new(
                DOMAIN_MASK,
                &[
                    session.as_slice(),
                    signer.seed,
                    digest.as_slice(),
                    position_bytes(signer.position).as_slice(),
                    attempt.to_be_bytes().as_slice(),
                ],
            );
            algebra.commit_position(&statements[signer.position], &mut stream)
        });
        let leaves: Vec<[u8; 32]> = (0..ring_size)
            .map(|i| match (&simulated[i], slot[i]) {
                (Some((_, leaf)), _) => *leaf,
                (None, Some(k)) => algebra.leaf(i, openings[k].commitments()),
                (None, None) => [0u8; 32],
            })
            .collect();

        let challenge = ring_challenge(&params, ring.id(), digest, required_signers, &leaves);
        let signer_shares = threshold::close(&challenge, &fixed, &open);
        let answers: Vec<Option<Vec<Response>>> = map_positions(genuine.len(), |k| {
            algebra.respond_position(&genuine[k].witnesses, &openings[k], &signer_shares[k])
        });
        if answers.iter().any(Option::is_none) {
            tracing::trace!(attempt, "genuine response rejected, restarting");
            continue;
        }

        let mut answers = answers.into_iter().flatten();
        let mut signer_shares = signer_shares.into_iter();
        let mut shares = Vec::with_capacity(ring_size);
        let mut responses = Vec::with_capacity(ring_size);
        for sim in simulated {
            match sim {
                Some((sim, _)) => {
                    shares.push(sim.share);
                    responses.push(sim.responses);
                }
                None => {
                    shares.push(signer_shares.next().unwrap_or_default());
                    responses.push(answers.next().unwrap_or_default());
                }
            }
        }
        let binding_tag = binding::bind(&challenge, ring.id(), required_signers, &leaves, &shares);
        tracing::debug!(attempts = attempt + 1, "ring signature created");
        return Ok(RingSignature::new(
            params,
            required_signers,
            shares,
            responses,
            binding_tag,
        ));
    }
    Err(Error::RejectionSamplingExhausted {
        attempts: MAX_SIGNING_ATTEMPTS,
    })
}
