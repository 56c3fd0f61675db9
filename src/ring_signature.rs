// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing signature type and wire codec.
//!
//! All integers are big-endian. Layout:
//!
//! | field | size |
//! |---|---|
//! | type tag `0x0108` | 2 |
//! | parameter set id | 2 |
//! | ring size `n` | 4 |
//! | required signers `t` | 4 |
//! | ring-LWE length, responses | 4 + n × response |
//! | NTRU length, responses | 4 + n × response |
//! | code length, responses | 4 + n × response |
//! | binding tag | 32 |
//! | core length, `n` challenge shares, Chipmunk responses | 4 + 32n + n × response |
//!
//! The size depends only on the parameter set and `n`.

use crate::codec::Reader;
use crate::dispatch::SignatureType;
use crate::error::{Error, Result};
use crate::layers::{LayerKind, Response};
use crate::params::{BINDING_TAG_BYTES, CHALLENGE_BYTES, MAX_RING_SIZE, MIN_RING_SIZE, ParameterSet};
use crate::threshold::Share;

const COMMITMENT_LAYERS: [LayerKind; 3] = [LayerKind::RingLwe, LayerKind::Ntru, LayerKind::Code];

/// A t-of-n ChipmunkRing signature.
#[derive(Clone, PartialEq, Eq)]
pub struct RingSignature {
    params: ParameterSet,
    required_signers: u32,
    shares: Vec<Share>,
    /// Indexed by position, then by layer.
    responses: Vec<Vec<Response>>,
    binding_tag: [u8; BINDING_TAG_BYTES],
}

fn corrupt(reason: &'static str) -> Error {
    Error::CorruptSignature { reason }
}

impl RingSignature {
    pub(crate) fn new(
        params: ParameterSet,
        required_signers: u32,
        shares: Vec<Share>,
        responses: Vec<Vec<Response>>,
        binding_tag: [u8; BINDING_TAG_BYTES],
    ) -> Self {
        Self {
            params,
            required_signers,
            shares,
            responses,
            binding_tag,
        }
    }

    /// Decode a signature over a catalogue parameter set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        reader.u16().ok_or(corrupt("truncated header"))?;
        let id = reader.u16().ok_or(corrupt("truncated header"))?;
        Self::from_bytes_with_params(ParameterSet::from_id(id)?, bytes)
    }

    /// Decode a signature whose parameter set may be a custom one.
    ///
    /// Every length is checked against the value implied by the parameter
    /// set and ring size before anything is parsed.
    pub fn from_bytes_with_params(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let truncated = || corrupt("truncated signature");

        if reader.u16().ok_or_else(truncated)? != SignatureType::ChipmunkRing.tag() {
            return Err(corrupt("not a ring signature"));
        }
        if reader.u16().ok_or_else(truncated)? != params.id() {
            return Err(corrupt("parameter set mismatch"));
        }
        let ring_size = usize::try_from(reader.u32().ok_or_else(truncated)?)
            .map_err(|_| corrupt("ring size out of range"))?;
        if !(MIN_RING_SIZE..=MAX_RING_SIZE).contains(&ring_size) {
            return Err(corrupt("ring size out of range"));
        }
        let required_signers = reader.u32().ok_or_else(truncated)?;
        if required_signers == 0 || required_signers as usize > ring_size {
            return Err(corrupt("threshold out of range"));
        }
        if bytes.len() != params.signature_size(ring_size) {
            return Err(corrupt("signature length does not match the ring size"));
        }

        let mut responses: Vec<Vec<Response>> = vec![Vec::with_capacity(LayerKind::ALL.len()); ring_size];
        for kind in COMMITMENT_LAYERS {
            let shape = params.layer_shape(kind);
            let section = read_section(&mut reader, ring_size * shape.response_bytes())?;
            for (position, chunk) in responses.iter_mut().zip(section.chunks_exact(shape.response_bytes())) {
                position.push(shape.decode_response(chunk));
            }
        }

        let mut binding_tag = [0u8; BINDING_TAG_BYTES];
        binding_tag.copy_from_slice(reader.take(BINDING_TAG_BYTES).ok_or_else(truncated)?);

        let shape = params.layer_shape(LayerKind::Chipmunk);
        let core = read_section(
            &mut reader,
            ring_size * (CHALLENGE_BYTES + shape.response_bytes()),
        )?;
        let (share_bytes, response_bytes) = core.split_at(ring_size * CHALLENGE_BYTES);
        let shares = share_bytes
            .chunks_exact(CHALLENGE_BYTES)
            .map(|chunk| {
                let mut share = [0u8; CHALLENGE_BYTES];
                share.copy_from_slice(chunk);
                share
            })
            .collect();
        for (position, chunk) in responses.iter_mut().zip(response_bytes.chunks_exact(shape.response_bytes())) {
            position.push(shape.decode_response(chunk));
        }

        if reader.remaining() != 0 {
            return Err(corrupt("trailing bytes"));
        }
        Ok(Self {
            params,
            required_signers,
            shares,
            responses,
            binding_tag,
        })
    }

    /// Wire encoding; exactly [`ParameterSet::signature_size`] bytes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_bytes(&self) -> Vec<u8> {
        let ring_size = self.ring_size();
        let mut out = Vec::with_capacity(self.params.signature_size(ring_size));
        out.extend_from_slice(&SignatureType::ChipmunkRing.tag().to_be_bytes());
        out.extend_from_slice(&self.params.id().to_be_bytes());
        out.extend_from_slice(&(ring_size as u32).to_be_bytes());
        out.extend_from_slice(&self.required_signers.to_be_bytes());

        for kind in COMMITMENT_LAYERS {
            let shape = self.params.layer_shape(kind);
            out.extend_from_slice(&((ring_size * shape.response_bytes()) as u32).to_be_bytes());
            for position in &self.responses {
                shape.encode_response(&position[kind.index()], &mut out);
            }
        }

        out.extend_from_slice(&self.binding_tag);

        let shape = self.params.layer_shape(LayerKind::Chipmunk);
        let core_len = ring_size * (CHALLENGE_BYTES + shape.response_bytes());
        out.extend_from_slice(&(core_len as u32).to_be_bytes());
        for share in &self.shares {
            out.extend_from_slice(share);
        }
        for position in &self.responses {
            shape.encode_response(&position[LayerKind::Chipmunk.index()], &mut out);
        }
        out
    }

    /// The parameter set the signature was made under.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Number of ring positions.
    pub fn ring_size(&self) -> usize {
        self.shares.len()
    }

    /// Minimum number of genuine signers `t`.
    pub fn required_signers(&self) -> u32 {
        self.required_signers
    }

    /// The binding tag.
    pub fn binding_tag(&self) -> &[u8; BINDING_TAG_BYTES] {
        &self.binding_tag
    }

    /// Length of [`RingSignature::to_bytes`].
    pub fn encoded_len(&self) -> usize {
        self.params.signature_size(self.ring_size())
    }

    pub(crate) fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub(crate) fn responses(&self, position: usize) -> &[Response] {
        &self.responses[position]
    }
}

fn read_section<'a>(reader: &mut Reader<'a>, expected: usize) -> Result<&'a [u8]> {
    let len = reader.u32().ok_or(corrupt("truncated signature"))?;
    if usize::try_from(len).ok() != Some(expected) {
        return Err(corrupt("section length does not match the ring size"));
    }
    reader.take(expected).ok_or(corrupt("truncated signature"))
}

impl core::fmt::Debug for RingSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RingSignature")
            .field("parameter_set", &self.params.name())
            .field("ring_size", &self.ring_size())
            .field("required_signers", &self.required_signers)
            .field("bytes", &hex::encode(self.to_bytes()))
            .finish()
    }
}

impl TryFrom<&[u8]> for RingSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for RingSignature {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl TryFrom<&Vec<u8>> for RingSignature {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Box<[u8]>> for RingSignature {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl From<RingSignature> for Vec<u8> {
    fn from(sig: RingSignature) -> Vec<u8> {
        sig.to_bytes()
    }
}

impl signature::SignatureEncoding for RingSignature {
    type Repr = Vec<u8>;
}

#[cfg(feature = "serde")]
impl serde::Serialize for RingSignature {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RingSignature {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}
