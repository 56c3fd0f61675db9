// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four proof layers and the Sigma protocol they share.
//!
//! Each layer states a linear relation `<row, x> = target` over its own ring,
//! where `x` is a short secret. A position in the ring proves all four
//! relations under one challenge share: a genuine signer commits to a mask
//! `y`, answers `z = y + c x` and restarts when `z` leaves the accepted box;
//! a simulated position draws `z` uniformly from that same box and solves
//! the relation for the commitment.

pub(crate) mod chipmunk;
pub(crate) mod code;
pub(crate) mod ntru;
pub(crate) mod ring_lwe;

use crate::Digest;
use crate::codec::{pack_poly, pack_signed, packed_len, unpack_signed};
use crate::error::Result;
use crate::hash::{DOMAIN_LEAF, XofStream, hash32};
use crate::keygen::PublicMaterial;
use crate::params::{ParameterSet, REJECTION_SLACK};
use crate::poly::{PolyRing, SparseTernary, within_bound};
use crate::sample;
use crate::threshold::Share;
use zeroize::Zeroizing;

/// Short secret vector of a layer relation.
pub(crate) type Witness = Zeroizing<Vec<Vec<i32>>>;
/// A layer response `z`.
pub(crate) type Response = Vec<Vec<i32>>;

/// Move sampled secret polynomials into one [`Witness`].
pub(crate) fn into_witness<I>(parts: I) -> Witness
where
    I: IntoIterator<Item = Zeroizing<Vec<i32>>>,
{
    Zeroizing::new(
        parts
            .into_iter()
            .map(|mut part| core::mem::take(&mut *part))
            .collect(),
    )
}

/// Identifies one proof layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum LayerKind {
    RingLwe,
    Ntru,
    Code,
    Chipmunk,
}

impl LayerKind {
    /// Every layer, in wire order.
    pub(crate) const ALL: [LayerKind; 4] = [
        LayerKind::RingLwe,
        LayerKind::Ntru,
        LayerKind::Code,
        LayerKind::Chipmunk,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            LayerKind::RingLwe => 0,
            LayerKind::Ntru => 1,
            LayerKind::Code => 2,
            LayerKind::Chipmunk => 3,
        }
    }

    pub(crate) const fn label(self) -> &'static [u8] {
        match self {
            LayerKind::RingLwe => b"ring-lwe",
            LayerKind::Ntru => b"ntru",
            LayerKind::Code => b"code",
            LayerKind::Chipmunk => b"chipmunk",
        }
    }
}

/// Dimensions and bounds of one layer.
///
/// The mask bound `B` is the smallest power of two at least
/// `REJECTION_SLACK * width * n * beta`, so a genuine response survives the
/// norm check with probability about `exp(-1 / REJECTION_SLACK)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LayerShape {
    n: usize,
    q: u32,
    width: usize,
    beta: u32,
    mask_log2: u32,
}

impl LayerShape {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn new(n: usize, q: u32, width: usize, beta: u64) -> Self {
        let spread = REJECTION_SLACK * width as u64 * n as u64 * beta;
        Self {
            n,
            q,
            width,
            beta: beta as u32,
            mask_log2: spread.next_power_of_two().trailing_zeros(),
        }
    }

    pub(crate) fn n(&self) -> usize {
        self.n
    }

    pub(crate) fn bound(&self) -> u32 {
        1 << self.mask_log2
    }

    /// Largest accepted response coefficient.
    pub(crate) fn response_limit(&self) -> u32 {
        self.bound() - self.beta - 1
    }

    pub(crate) fn response_bits(&self) -> u32 {
        self.mask_log2 + 1
    }

    pub(crate) fn response_bytes(&self) -> usize {
        self.width * packed_len(self.n, self.response_bits())
    }

    pub(crate) fn commitment_bits(&self) -> u32 {
        32 - (self.q - 1).leading_zeros()
    }

    /// `beta < B < q / 2`: challenges are hidden and responses never wrap.
    pub(crate) fn is_sound(&self) -> bool {
        let bound = 1u64 << self.mask_log2;
        u64::from(self.beta) < bound && bound < u64::from(self.q / 2)
    }

    pub(crate) fn encode_response(&self, z: &[Vec<i32>], out: &mut Vec<u8>) {
        let bits = self.response_bits();
        for z_j in z {
            pack_signed(z_j, bits, out);
        }
    }

    /// `bytes` must be exactly [`LayerShape::response_bytes`] long.
    pub(crate) fn decode_response(&self, bytes: &[u8]) -> Response {
        let bits = self.response_bits();
        bytes
            .chunks_exact(packed_len(self.n, bits))
            .map(|chunk| unpack_signed(chunk, self.n, bits))
            .collect()
    }
}

/// A public layer relation in the transform domain.
#[derive(Clone, Debug)]
pub(crate) struct Statement {
    row: Vec<Vec<u32>>,
    target: Vec<u32>,
}

impl Statement {
    pub(crate) fn new(row: Vec<Vec<u32>>, target: Vec<u32>) -> Self {
        Self { row, target }
    }
}

/// Masks and commitments of a genuine position, per layer.
#[derive(Debug)]
pub(crate) struct Opening {
    masks: Vec<Witness>,
    commitments: Vec<Vec<u32>>,
}

impl Opening {
    pub(crate) fn commitments(&self) -> &[Vec<u32>] {
        &self.commitments
    }
}

/// A simulated position: its share, responses and commitments.
#[derive(Debug)]
pub(crate) struct Simulation {
    pub(crate) share: Share,
    pub(crate) responses: Vec<Response>,
    pub(crate) commitments: Vec<Vec<u32>>,
}

/// Rings and shapes of every layer of one parameter set.
#[derive(Clone, Debug)]
pub(crate) struct Algebra {
    params: ParameterSet,
    rings: Vec<PolyRing>,
    shapes: Vec<LayerShape>,
}

impl Algebra {
    pub(crate) fn new(params: ParameterSet) -> Result<Self> {
        let shapes: Vec<LayerShape> = LayerKind::ALL
            .iter()
            .map(|&kind| params.layer_shape(kind))
            .collect();
        let rings = shapes
            .iter()
            .map(|shape| PolyRing::new(shape.n, shape.q))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            params,
            rings,
            shapes,
        })
    }

    pub(crate) fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub(crate) fn ring(&self, kind: LayerKind) -> &PolyRing {
        &self.rings[kind.index()]
    }

    pub(crate) fn shape(&self, kind: LayerKind) -> &LayerShape {
        &self.shapes[kind.index()]
    }

    /// Challenge polynomial of one layer under a challenge share.
    pub(crate) fn challenge(&self, kind: LayerKind, share: &Share) -> SparseTernary {
        sample::layer_challenge(share, kind.label(), self.shape(kind).n)
    }

    pub(crate) fn mask(&self, kind: LayerKind, stream: &mut XofStream) -> Witness {
        let shape = self.shape(kind);
        into_witness((0..shape.width).map(|_| sample::mask(stream, shape.n, shape.mask_log2)))
    }

    /// `w = <row, y>`.
    pub(crate) fn commit(&self, kind: LayerKind, statement: &Statement, y: &[Vec<i32>]) -> Vec<u32> {
        let ring = self.ring(kind);
        let mut acc = vec![0u32; ring.n()];
        for (a_hat, y_j) in statement.row.iter().zip(y) {
            ring.mul_acc(&mut acc, a_hat, &ring.signed_to_ntt(y_j));
        }
        ring.from_ntt(acc)
    }

    /// `z = y + c x`, or `None` when any coefficient leaves the accepted box.
    pub(crate) fn respond(
        &self,
        kind: LayerKind,
        challenge: &SparseTernary,
        y: &[Vec<i32>],
        x: &[Vec<i32>],
    ) -> Option<Response> {
        let limit = self.shape(kind).response_limit();
        let mut accepted = true;
        let z: Response = y
            .iter()
            .zip(x)
            .map(|(y_j, x_j)| {
                let cx = challenge.mul_small(x_j);
                let z_j: Vec<i32> = y_j.iter().zip(cx.iter()).map(|(&a, &b)| a + b).collect();
                accepted &= within_bound(&z_j, limit);
                z_j
            })
            .collect();
        accepted.then_some(z)
    }

    /// `<row, z> - c * target`, without any norm check.
    fn solve(&self, kind: LayerKind, statement: &Statement, z: &[Vec<i32>], challenge: &SparseTernary) -> Vec<u32> {
        let ring = self.ring(kind);
        let mut acc = vec![0u32; ring.n()];
        for (a_hat, z_j) in statement.row.iter().zip(z) {
            ring.mul_acc(&mut acc, a_hat, &ring.to_ntt(&ring.from_signed(z_j)));
        }
        let c_hat = ring.to_ntt(&challenge.to_poly(ring));
        ring.mul_sub(&mut acc, &c_hat, &statement.target);
        ring.from_ntt(acc)
    }

    /// The commitment a response opens to, if the response is well formed.
    pub(crate) fn recompute(
        &self,
        kind: LayerKind,
        statement: &Statement,
        z: &[Vec<i32>],
        challenge: &SparseTernary,
    ) -> Option<Vec<u32>> {
        let shape = self.shape(kind);
        let limit = shape.response_limit();
        let well_formed = z.len() == shape.width
            && z.iter().all(|z_j| z_j.len() == shape.n && within_bound(z_j, limit));
        well_formed.then(|| self.solve(kind, statement, z, challenge))
    }

    /// A response drawn from the accepted box and the commitment it opens to.
    pub(crate) fn simulate(
        &self,
        kind: LayerKind,
        statement: &Statement,
        challenge: &SparseTernary,
        stream: &mut XofStream,
    ) -> (Response, Vec<u32>) {
        let shape = self.shape(kind);
        let z: Response = (0..shape.width)
            .map(|_| sample::uniform_response(stream, shape.n, shape.mask_log2, shape.response_limit()))
            .collect();
        let w = self.solve(kind, statement, &z, challenge);
        (z, w)
    }

    pub(crate) fn encode_commitment(&self, kind: LayerKind, w: &[u32]) -> Vec<u8> {
        pack_poly(w, self.shape(kind).commitment_bits())
    }

    /// The four relations of one ring member, bound to a message digest.
    pub(crate) fn statements(&self, member: &PublicMaterial, digest: &Digest) -> Vec<Statement> {
        vec![
            ring_lwe::statement(self.ring(LayerKind::RingLwe), &member.rho, &member.ring_lwe_b),
            ntru::statement(self.ring(LayerKind::Ntru), &member.ntru_h),
            code::statement(self.ring(LayerKind::Code), &member.rho, &member.syndrome),
            self.hots_statement(member, digest),
        ]
    }

    pub(crate) fn hots_statement(&self, member: &PublicMaterial, digest: &Digest) -> Statement {
        chipmunk::statement(
            self.ring(LayerKind::Chipmunk),
            &member.rho,
            self.params.values().chipmunk_gamma,
            &member.hots_v0,
            &member.hots_v1,
            digest,
        )
    }

    pub(crate) fn commit_position(&self, statements: &[Statement], stream: &mut XofStream) -> Opening {
        let mut masks = Vec::with_capacity(LayerKind::ALL.len());
        let mut commitments = Vec::with_capacity(LayerKind::ALL.len());
        for kind in LayerKind::ALL {
            let y = self.mask(kind, stream);
            commitments.push(self.commit(kind, &statements[kind.index()], &y));
            masks.push(y);
        }
        Opening { masks, commitments }
    }

    /// Answer every layer, or `None` if any layer rejects.
    pub(crate) fn respond_position(
        &self,
        witnesses: &[Witness],
        opening: &Opening,
        share: &Share,
    ) -> Option<Vec<Response>> {
        let mut responses = Vec::with_capacity(LayerKind::ALL.len());
        for kind in LayerKind::ALL {
            let c = self.challenge(kind, share);
            let i = kind.index();
            responses.push(self.respond(kind, &c, &opening.masks[i], &witnesses[i])?);
        }
        Some(responses)
    }

    pub(crate) fn simulate_position(&self, statements: &[Statement], stream: &mut XofStream) -> Simulation {
        let share: Share = stream.array();
        let mut responses = Vec::with_capacity(LayerKind::ALL.len());
        let mut commitments = Vec::with_capacity(LayerKind::ALL.len());
        for kind in LayerKind::ALL {
            let c = self.challenge(kind, &share);
            let (z, w) = self.simulate(kind, &statements[kind.index()], &c, stream);
            responses.push(z);
            commitments.push(w);
        }
        Simulation {
            share,
            responses,
            commitments,
        }
    }

    pub(crate) fn recompute_position(
        &self,
        statements: &[Statement],
        responses: &[Response],
        share: &Share,
    ) -> Option<Vec<Vec<u32>>> {
        LayerKind::ALL
            .iter()
            .map(|&kind| {
                let c = self.challenge(kind, share);
                let i = kind.index();
                self.recompute(kind, &statements[i], &responses[i], &c)
            })
            .collect()
    }

    /// Hash of a position's commitments.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn leaf(&self, index: usize, commitments: &[Vec<u32>]) -> [u8; 32] {
        let encoded: Vec<Vec<u8>> = LayerKind::ALL
            .iter()
            .map(|&kind| self.encode_commitment(kind, &commitments[kind.index()]))
            .collect();
        let position = (index as u32).to_be_bytes();
        let mut inputs: Vec<&[u8]> = vec![position.as_slice()];
        inputs.extend(encoded.iter().map(Vec::as_slice));
        hash32(DOMAIN_LEAF, &inputs)
    }
}
