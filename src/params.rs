// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing parameter sets.
//!
//! A [`ParameterSet`] fixes the ring dimension and modulus of every layer.
//! The catalogue sets [`ParameterSet::FAST`], [`ParameterSet::BALANCED`],
//! [`ParameterSet::MAXIMUM`] and [`ParameterSet::PARANOID`] are selected by
//! [`ParameterSetId`]; non-catalogue sets are built with
//! [`ParameterSet::custom`], which validates every algebraic constraint.

use crate::arith::is_prime;
use crate::codec::packed_len;
use crate::error::{Error, Result};
use crate::layers::{LayerKind, LayerShape};
use core::fmt;
use core::str::FromStr;

/// Number of nonzero coefficients in every challenge polynomial.
pub(crate) const CHALLENGE_WEIGHT: usize = 39;
/// Number of nonzero coefficients in the Chipmunk digest polynomial.
pub(crate) const HOTS_WEIGHT: usize = 16;
/// Ratio between a masking bound and the largest `width * n * beta` it hides.
pub(crate) const REJECTION_SLACK: u64 = 64;

/// Byte length of key seeds.
pub const SEED_BYTES: usize = 32;
/// Byte length of the binding tag.
pub const BINDING_TAG_BYTES: usize = 32;
/// Byte length of a challenge share.
pub const CHALLENGE_BYTES: usize = 32;
/// Smallest supported ring.
pub const MIN_RING_SIZE: usize = 2;
/// Largest supported ring.
pub const MAX_RING_SIZE: usize = 1024;
/// Signing attempts before rejection sampling gives up.
pub const MAX_SIGNING_ATTEMPTS: u32 = 1024;

/// Bytes of the fixed ring signature header:
/// type tag, parameter set, ring size, threshold.
const RING_HEADER_BYTES: usize = 2 + 2 + 4 + 4;
/// Bytes of the Chipmunk signature header: type tag, parameter set.
const CHIPMUNK_HEADER_BYTES: usize = 2 + 2;
/// Wire ids at and above this value are reserved for custom sets.
const CUSTOM_ID_BASE: u16 = 0x8000;

/// Catalogue tag selecting a pinned parameter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ParameterSetId {
    /// Small dimensions for tests and latency-sensitive use.
    Fast,
    /// The recommended default.
    #[default]
    Balanced,
    /// Larger dimensions and moduli.
    Maximum,
    /// The largest catalogue set.
    Paranoid,
}

impl ParameterSetId {
    /// Every catalogue tag, in wire-id order.
    pub const ALL: [ParameterSetId; 4] = [
        ParameterSetId::Fast,
        ParameterSetId::Balanced,
        ParameterSetId::Maximum,
        ParameterSetId::Paranoid,
    ];

    /// The wire identifier.
    pub const fn wire_id(self) -> u16 {
        match self {
            ParameterSetId::Fast => 0x0001,
            ParameterSetId::Balanced => 0x0002,
            ParameterSetId::Maximum => 0x0003,
            ParameterSetId::Paranoid => 0x0004,
        }
    }

    /// Resolve a wire identifier.
    pub fn from_wire_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.wire_id() == id)
    }

    /// Upper-case catalogue name.
    pub const fn name(self) -> &'static str {
        match self {
            ParameterSetId::Fast => "FAST",
            ParameterSetId::Balanced => "BALANCED",
            ParameterSetId::Maximum => "MAXIMUM",
            ParameterSetId::Paranoid => "PARANOID",
        }
    }
}

impl fmt::Display for ParameterSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterSetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(Error::InvalidParameters {
                reason: "unknown parameter set name",
            })
    }
}

/// Raw algebraic parameters of every layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParameterValues {
    /// Chipmunk ring dimension.
    pub chipmunk_n: usize,
    /// Number of polynomials in a Chipmunk witness.
    pub chipmunk_gamma: usize,
    /// Chipmunk modulus.
    pub chipmunk_q: u32,
    /// Bytes of fresh randomness drawn per signing session.
    pub randomness_size: usize,
    /// Ring-LWE ring dimension.
    pub ring_lwe_n: usize,
    /// Ring-LWE modulus.
    pub ring_lwe_q: u32,
    /// Width of the centred binomial Ring-LWE secret and error.
    pub ring_lwe_sigma: u32,
    /// NTRU ring dimension.
    pub ntru_n: usize,
    /// NTRU modulus.
    pub ntru_q: u32,
    /// Code length (twice the circulant block size).
    pub code_n: usize,
    /// Code dimension.
    pub code_k: usize,
    /// Error weight.
    pub code_t: usize,
    /// Field modulus of the code.
    pub code_q: u32,
}

/// A validated, immutable ChipmunkRing parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    id: u16,
    name: &'static str,
    values: ParameterValues,
}

macro_rules! define_parameter_set {
    (
        $const_name:ident, $tag:expr,
        chipmunk = ($cn:expr, $cg:expr, $cq:expr),
        randomness = $rand:expr,
        ring_lwe = ($rn:expr, $rq:expr, $rs:expr),
        ntru = ($nn:expr, $nq:expr),
        code = ($con:expr, $cok:expr, $cot:expr, $coq:expr)
    ) => {
        #[doc = concat!("The `", stringify!($const_name), "` catalogue parameter set.")]
        pub const $const_name: ParameterSet = ParameterSet {
            id: $tag.wire_id(),
            name: $tag.name(),
            values: ParameterValues {
                chipmunk_n: $cn,
                chipmunk_gamma: $cg,
                chipmunk_q: $cq,
                randomness_size: $rand,
                ring_lwe_n: $rn,
                ring_lwe_q: $rq,
                ring_lwe_sigma: $rs,
                ntru_n: $nn,
                ntru_q: $nq,
                code_n: $con,
                code_k: $cok,
                code_t: $cot,
                code_q: $coq,
            },
        };
    };
}

impl ParameterSet {
    define_parameter_set!(
        FAST, ParameterSetId::Fast,
        chipmunk = (128, 2, 2_013_265_921),
        randomness = 16,
        ring_lwe = (128, 8_380_417, 2),
        ntru = (128, 8_380_417),
        code = (256, 128, 32, 8_380_417)
    );

    define_parameter_set!(
        BALANCED, ParameterSetId::Balanced,
        chipmunk = (256, 4, 2_013_265_921),
        randomness = 32,
        ring_lwe = (256, 167_772_161, 2),
        ntru = (256, 8_380_417),
        code = (512, 256, 64, 8_380_417)
    );

    define_parameter_set!(
        MAXIMUM, ParameterSetId::Maximum,
        chipmunk = (512, 4, 2_013_265_921),
        randomness = 48,
        ring_lwe = (512, 167_772_161, 3),
        ntru = (512, 167_772_161),
        code = (1024, 512, 128, 167_772_161)
    );

    define_parameter_set!(
        PARANOID, ParameterSetId::Paranoid,
        chipmunk = (1024, 8, 2_013_265_921),
        randomness = 64,
        ring_lwe = (1024, 469_762_049, 4),
        ntru = (1024, 469_762_049),
        code = (2048, 1024, 256, 469_762_049)
    );

    /// The catalogue set for a tag.
    pub const fn select(tag: ParameterSetId) -> Self {
        match tag {
            ParameterSetId::Fast => Self::FAST,
            ParameterSetId::Balanced => Self::BALANCED,
            ParameterSetId::Maximum => Self::MAXIMUM,
            ParameterSetId::Paranoid => Self::PARANOID,
        }
    }

    /// The catalogue set for a wire identifier.
    pub fn from_id(id: u16) -> Result<Self> {
        ParameterSetId::from_wire_id(id)
            .map(Self::select)
            .ok_or(Error::UnknownParameterSet(id))
    }

    /// Build and validate a non-catalogue set. `id` must be at least `0x8000`.
    pub fn custom(id: u16, values: ParameterValues) -> Result<Self> {
        if id < CUSTOM_ID_BASE {
            return Err(Error::InvalidParameters {
                reason: "custom parameter set ids start at 0x8000",
            });
        }
        let params = Self {
            id,
            name: "CUSTOM",
            values,
        };
        params.validate()?;
        Ok(params)
    }

    /// Wire identifier.
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Catalogue name, or `CUSTOM`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The catalogue tag, if this is a catalogue set.
    pub fn tag(&self) -> Option<ParameterSetId> {
        ParameterSetId::from_wire_id(self.id)
    }

    /// Raw layer parameters.
    pub const fn values(&self) -> &ParameterValues {
        &self.values
    }

    /// Bytes of fresh randomness drawn per signing session.
    pub const fn randomness_size(&self) -> usize {
        self.values.randomness_size
    }

    /// Estimated logical qubits needed to attack the set:
    /// `4 n floor(log2 q)` per lattice commitment layer plus `2 n` for the code.
    ///
    /// The Chipmunk layer is not counted. Its key opens a single digest and
    /// rests on the same ring-SIS problem as the lattice commitments, so the
    /// estimate tracks the commitment layers only.
    pub fn expected_quantum_bits(&self) -> u64 {
        let lattice = |n: usize, q: u32| 4 * n as u64 * u64::from(q.ilog2());
        let v = &self.values;
        lattice(v.ring_lwe_n, v.ring_lwe_q) + lattice(v.ntru_n, v.ntru_q) + 2 * v.code_n as u64
    }

    pub(crate) fn layer_shape(&self, kind: LayerKind) -> LayerShape {
        let v = &self.values;
        let kappa = CHALLENGE_WEIGHT as u64;
        match kind {
            LayerKind::RingLwe => {
                LayerShape::new(v.ring_lwe_n, v.ring_lwe_q, 2, kappa * u64::from(v.ring_lwe_sigma))
            }
            LayerKind::Ntru => LayerShape::new(v.ntru_n, v.ntru_q, 2, kappa),
            LayerKind::Code => {
                LayerShape::new(v.code_k, v.code_q, 2, kappa.min(v.code_t as u64))
            }
            LayerKind::Chipmunk => LayerShape::new(
                v.chipmunk_n,
                v.chipmunk_q,
                v.chipmunk_gamma,
                kappa * (HOTS_WEIGHT as u64 + 1),
            ),
        }
    }

    /// Byte length of a signing key.
    pub const fn signing_key_size(&self) -> usize {
        2 + SEED_BYTES
    }

    /// Byte length of a verifying key.
    pub fn verifying_key_size(&self) -> usize {
        let v = &self.values;
        let section = |n: usize, q: u32| packed_len(n, 32 - (q - 1).leading_zeros());
        2 + SEED_BYTES
            + section(v.ring_lwe_n, v.ring_lwe_q)
            + section(v.ntru_n, v.ntru_q)
            + section(v.code_k, v.code_q)
            + 2 * section(v.chipmunk_n, v.chipmunk_q)
    }

    /// Byte length of a standalone Chipmunk signature.
    pub fn chipmunk_signature_size(&self) -> usize {
        CHIPMUNK_HEADER_BYTES
            + CHALLENGE_BYTES
            + self.layer_shape(LayerKind::Chipmunk).response_bytes()
    }

    /// Byte length of a ring signature over `ring_size` members.
    ///
    /// Independent of the threshold and of which members signed.
    pub fn signature_size(&self, ring_size: usize) -> usize {
        let per_layer = |kind| 4 + ring_size * self.layer_shape(kind).response_bytes();
        RING_HEADER_BYTES
            + per_layer(LayerKind::RingLwe)
            + per_layer(LayerKind::Ntru)
            + per_layer(LayerKind::Code)
            + BINDING_TAG_BYTES
            + per_layer(LayerKind::Chipmunk)
            + ring_size * CHALLENGE_BYTES
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let v = &self.values;
        let fail = |reason| Err(Error::InvalidParameters { reason });

        for (n, q) in [
            (v.chipmunk_n, v.chipmunk_q),
            (v.ring_lwe_n, v.ring_lwe_q),
            (v.ntru_n, v.ntru_q),
            (v.code_k, v.code_q),
        ] {
            if !(64..=4096).contains(&n) || !n.is_power_of_two() {
                return fail("ring dimensions must be powers of two in [64, 4096]");
            }
            if q >= 1 << 31 || !is_prime(q) {
                return fail("moduli must be primes below 2^31");
            }
            if (u64::from(q) - 1) % (2 * n as u64) != 0 {
                return fail("moduli must satisfy q = 1 mod 2n");
            }
        }
        if v.code_n != 2 * v.code_k {
            return fail("code length must be twice the code dimension");
        }
        if v.code_t == 0 || v.code_t > v.code_n {
            return fail("code error weight must lie in [1, code_n]");
        }
        if !(1..=16).contains(&v.chipmunk_gamma) {
            return fail("chipmunk gamma must lie in [1, 16]");
        }
        if !(1..=8).contains(&v.ring_lwe_sigma) {
            return fail("ring-LWE sigma must lie in [1, 8]");
        }
        if !(16..=64).contains(&v.randomness_size) {
            return fail("randomness size must lie in [16, 64]");
        }
        if LayerKind::ALL
            .into_iter()
            .any(|kind| !self.layer_shape(kind).is_sound())
        {
            return fail("masking bound does not fit the modulus");
        }
        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::select(ParameterSetId::default())
    }
}

impl From<ParameterSetId> for ParameterSet {
    fn from(tag: ParameterSetId) -> Self {
        Self::select(tag)
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name, self.id)
    }
}
