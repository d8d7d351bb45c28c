/// Unique identifier for a live entity (currently: stars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// What a physics body represents in the simulation.
///
/// Resolved once when the body is created and stored in the body's
/// `user_data`, so collision dispatch is a plain match instead of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyTag {
    /// One of the bridge's chain bodies, by index along the chain.
    BridgeSegment(u32),
    /// A falling star.
    Star(EntityId),
    /// Invisible kinematic body that pins a bridge endpoint to a control point.
    Anchor,
    /// Anything the dispatcher does not care about.
    Untracked,
}

const KIND_SHIFT: u32 = 32;
const PAYLOAD_MASK: u128 = 0xFFFF_FFFF;

impl BodyTag {
    /// Pack the tag into a rapier `user_data` value.
    pub fn to_user_data(self) -> u128 {
        let (kind, payload): (u128, u32) = match self {
            BodyTag::Untracked => (0, 0),
            BodyTag::BridgeSegment(index) => (1, index),
            BodyTag::Star(id) => (2, id.0),
            BodyTag::Anchor => (3, 0),
        };
        (kind << KIND_SHIFT) | payload as u128
    }

    /// Unpack a tag written by [`BodyTag::to_user_data`]. Unknown values map to `Untracked`.
    pub fn from_user_data(data: u128) -> Self {
        let payload = (data & PAYLOAD_MASK) as u32;
        match data >> KIND_SHIFT {
            1 => BodyTag::BridgeSegment(payload),
            2 => BodyTag::Star(EntityId(payload)),
            3 => BodyTag::Anchor,
            _ => BodyTag::Untracked,
        }
    }

    pub fn is_bridge(self) -> bool {
        matches!(self, BodyTag::BridgeSegment(_))
    }
}
