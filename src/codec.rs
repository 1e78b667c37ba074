//! Binary codecs behind a gift seed.
//!
//! ## Position field (8 bytes, big-endian u64)
//!
//! | Bits  | Width | Content                                   |
//! |-------|-------|-------------------------------------------|
//! | 63–54 | 10    | random padding, discarded on decode       |
//! | 53–36 | 18    | X: `round((x + 13107.15) * 10)`           |
//! | 35–18 | 18    | Y                                         |
//! | 17–0  | 18    | Z                                         |
//!
//! 18 bits give 262144 steps at 0.1 resolution, i.e. every axis spans
//! `[-13107.15, 13107.15]`. The padding makes two seeds for the same spot
//! differ textually.
//!
//! ## Aux field (1–4 bytes)
//!
//! Minimal big-endian encoding of a `u32`; zero still occupies one byte.
//!
//! Both fields travel as standard base64 with the `=` padding stripped.

use crate::error::{GiftError, Result};
use crate::types::Position;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use rand::Rng;

/// Largest value an 18-bit axis can hold.
pub const AXIS_MAX: u32 = (1 << 18) - 1;
/// Number of padding bits above the payload.
pub const PADDING_BITS: u32 = 10;
/// `13107.15 * 10`: the axis offset expressed in tenths.
const OFFSET_TENTHS: f64 = 131_071.5;
/// Largest encodable magnitude on any axis.
const AXIS_LIMIT: f32 = 13_107.15;
/// Low 54 bits: the three axes.
const PAYLOAD_MASK: u64 = 0x003F_FFFF_FFFF_FFFF;
const AXIS_MASK: u64 = AXIS_MAX as u64;
const X_SHIFT: u32 = 36;
const Y_SHIFT: u32 = 18;
const PADDING_SHIFT: u32 = 54;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Pack a position into 8 bytes, filling the padding bits from `rng`.
pub fn pack_position<R: Rng + ?Sized>(position: Position, rng: &mut R) -> Result<[u8; 8]> {
    let x = encode_axis(position.x)?;
    let y = encode_axis(position.y)?;
    let z = encode_axis(position.z)?;

    let padding: u64 = rng.gen_range(0..(1u64 << PADDING_BITS));
    let packed = (padding << PADDING_SHIFT)
        | (u64::from(x) << X_SHIFT)
        | (u64::from(y) << Y_SHIFT)
        | u64::from(z);

    Ok(packed.to_be_bytes())
}

/// Unpack a position field. Any 8-byte input decodes; other lengths are
/// rejected.
pub fn unpack_position(bytes: &[u8]) -> Result<Position> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| GiftError::InvalidPosition)?;
    let packed = u64::from_be_bytes(raw) & PAYLOAD_MASK;

    let x = ((packed >> X_SHIFT) & AXIS_MASK) as u32;
    let y = ((packed >> Y_SHIFT) & AXIS_MASK) as u32;
    let z = (packed & AXIS_MASK) as u32;

    Ok(Position::new(decode_axis(x), decode_axis(y), decode_axis(z)))
}

fn encode_axis(value: f32) -> Result<u32> {
    // Checked before rounding, so values just past the edge are not clamped onto it.
    if !value.is_finite() || value.abs() > AXIS_LIMIT {
        return Err(GiftError::PositionOutOfRange);
    }
    let scaled = (f64::from(value) * 10.0 + OFFSET_TENTHS).round();
    if !(0.0..=f64::from(AXIS_MAX)).contains(&scaled) {
        return Err(GiftError::PositionOutOfRange);
    }
    Ok(scaled as u32)
}

fn decode_axis(raw: u32) -> f32 {
    ((f64::from(raw) - OFFSET_TENTHS) / 10.0) as f32
}

// ---------------------------------------------------------------------------
// Aux integer
// ---------------------------------------------------------------------------

/// Minimal big-endian bytes for `value` (1 to 4 bytes).
pub fn pack_aux(value: u32) -> Vec<u8> {
    let width = match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    };
    value.to_be_bytes()[4 - width..].to_vec()
}

pub fn unpack_aux(bytes: &[u8]) -> Result<u32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return Err(GiftError::Malformed);
    }
    Ok(bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
}

// ---------------------------------------------------------------------------
// Base64 framing
// ---------------------------------------------------------------------------

/// Standard base64 without trailing `=`.
pub fn encode_segment(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Decode a segment that may have lost its `=` padding in transit.
pub fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let missing = (4 - segment.len() % 4) % 4;
    let mut padded = String::with_capacity(segment.len() + missing);
    padded.push_str(segment);
    padded.extend(std::iter::repeat('=').take(missing));
    STANDARD.decode(padded).ok()
}
