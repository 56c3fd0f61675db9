// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for ChipmunkRing operations.
//!
//! Every failure reachable from attacker-controlled input (malformed
//! signatures, hostile rings) is reported through [`Error`]; nothing in the
//! crate panics on such input.

/// Errors that can occur during ChipmunkRing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parameter set failed validation.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// The violated constraint.
        reason: &'static str,
    },
    /// A wire identifier does not name a catalogue parameter set.
    #[error("unknown parameter set id {0:#06x}")]
    UnknownParameterSet(u16),
    /// A wire tag does not name a supported signature type.
    #[error("unknown signature type {0:#06x}")]
    UnknownSignatureType(u16),
    /// The ring holds fewer than two members.
    #[error("ring too small: {size} members, at least 2 required")]
    RingTooSmall {
        /// Number of members supplied.
        size: usize,
    },
    /// The ring holds more members than supported.
    #[error("ring too large: {size} members, at most {max} supported")]
    RingTooLarge {
        /// Number of members supplied.
        size: usize,
        /// Largest supported ring.
        max: usize,
    },
    /// The threshold is zero or exceeds the ring size.
    #[error("threshold {required} out of range for ring of {ring_size}")]
    ThresholdOutOfRange {
        /// Requested number of signers.
        required: u32,
        /// Number of ring members.
        ring_size: usize,
    },
    /// A signer's position or key does not match the ring.
    #[error("signer at position {index} is not a ring member")]
    SignerNotInRing {
        /// Claimed ring position.
        index: usize,
    },
    /// The same ring position was supplied twice.
    #[error("ring position {index} supplied by more than one signer")]
    DuplicateSigner {
        /// Repeated ring position.
        index: usize,
    },
    /// The same verifying key appears twice in the ring.
    #[error("ring positions {first} and {second} hold the same key")]
    DuplicateRingMember {
        /// First occurrence.
        first: usize,
        /// Repeated occurrence.
        second: usize,
    },
    /// Key material belongs to a different parameter set or signature kind.
    #[error("key type mismatch: expected {expected}, got {got}")]
    KeyTypeMismatch {
        /// What the operation expected.
        expected: &'static str,
        /// What was supplied.
        got: &'static str,
    },
    /// Fewer signing keys than the threshold were supplied.
    #[error("insufficient signers: {provided} supplied, {required} required")]
    InsufficientSigners {
        /// Threshold.
        required: usize,
        /// Signing keys supplied.
        provided: usize,
    },
    /// More signing keys than the threshold were supplied.
    #[error("too many signers: {provided} supplied for a threshold of {required}")]
    ExcessSigners {
        /// Threshold.
        required: usize,
        /// Signing keys supplied.
        provided: usize,
    },
    /// The signature bytes are not a well-formed encoding.
    #[error("corrupt signature: {reason}")]
    CorruptSignature {
        /// The structural check that failed.
        reason: &'static str,
    },
    /// The signature is well-formed but cryptographically invalid.
    #[error("invalid signature")]
    InvalidSignature,
    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Invalid seed length.
    #[error("invalid seed length: expected {expected}, got {got}")]
    InvalidSeedLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// A verifying key encodes out-of-range coefficients.
    #[error("malformed key encoding")]
    MalformedKey,
    /// The message exceeds the supported size.
    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge {
        /// Message length.
        size: usize,
        /// Largest accepted message.
        max: usize,
    },
    /// Rejection sampling did not produce a releasable response.
    #[error("rejection sampling exhausted after {attempts} attempts")]
    RejectionSamplingExhausted {
        /// Number of attempts made.
        attempts: u32,
    },
}

impl From<Error> for signature::Error {
    fn from(e: Error) -> Self {
        signature::Error::from_source(e.to_string())
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
