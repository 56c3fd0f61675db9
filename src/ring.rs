// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An ordered, validated set of ring members.

use crate::error::{Error, Result};
use crate::hash::{DOMAIN_RING_ID, hash32};
use crate::params::{MAX_RING_SIZE, MIN_RING_SIZE, ParameterSet};
use crate::verifying_key::VerifyingKey;
use std::collections::HashMap;

/// The public keys a ring signature is made over.
///
/// A ring holds between two and [`MAX_RING_SIZE`] distinct verifying keys of
/// one parameter set. Member order is significant: it fixes each member's
/// position in the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ring {
    members: Vec<VerifyingKey>,
    params: ParameterSet,
    id: [u8; 32],
}

impl Ring {
    /// Validate `members` and build a ring.
    pub fn new(members: Vec<VerifyingKey>) -> Result<Self> {
        let size = members.len();
        if size < MIN_RING_SIZE {
            return Err(Error::RingTooSmall { size });
        }
        if size > MAX_RING_SIZE {
            return Err(Error::RingTooLarge {
                size,
                max: MAX_RING_SIZE,
            });
        }
        let params = *members[0].params();
        if let Some(other) = members.iter().find(|vk| *vk.params() != params) {
            return Err(Error::KeyTypeMismatch {
                expected: params.name(),
                got: other.params().name(),
            });
        }
        let mut seen: HashMap<&[u8], usize> = HashMap::with_capacity(size);
        for (index, member) in members.iter().enumerate() {
            if let Some(&first) = seen.get(member.as_ref()) {
                return Err(Error::DuplicateRingMember {
                    first,
                    second: index,
                });
            }
            seen.insert(member.as_ref(), index);
        }
        let id = ring_id(&params, &members);
        Ok(Self {
            members,
            params,
            id,
        })
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a ring has at least two members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in position order.
    pub fn members(&self) -> &[VerifyingKey] {
        &self.members
    }

    /// The member at `index`.
    pub fn get(&self, index: usize) -> Option<&VerifyingKey> {
        self.members.get(index)
    }

    /// Position of a member.
    pub fn position_of(&self, key: &VerifyingKey) -> Option<usize> {
        self.members.iter().position(|member| member == key)
    }

    /// The parameter set shared by every member.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Hash of the parameter set and every member key, in order.
    pub fn id(&self) -> &[u8; 32] {
        &self.id
    }
}

impl TryFrom<Vec<VerifyingKey>> for Ring {
    type Error = Error;

    fn try_from(members: Vec<VerifyingKey>) -> Result<Self> {
        Self::new(members)
    }
}

impl TryFrom<&[VerifyingKey]> for Ring {
    type Error = Error;

    fn try_from(members: &[VerifyingKey]) -> Result<Self> {
        Self::new(members.to_vec())
    }
}

impl AsRef<[VerifyingKey]> for Ring {
    fn as_ref(&self) -> &[VerifyingKey] {
        &self.members
    }
}

#[allow(clippy::cast_possible_truncation)]
fn ring_id(params: &ParameterSet, members: &[VerifyingKey]) -> [u8; 32] {
    let id = params.id().to_be_bytes();
    let size = (members.len() as u32).to_be_bytes();
    let mut inputs: Vec<&[u8]> = Vec::with_capacity(members.len() + 2);
    inputs.push(id.as_slice());
    inputs.push(size.as_slice());
    inputs.extend(members.iter().map(AsRef::as_ref));
    hash32(DOMAIN_RING_ID, &inputs)
}
