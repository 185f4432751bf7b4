//! Plan codec: compact, versioned text encoding for sharing layouts.
//!
//! A plan travels as base64url text wrapping a tagged buffer. The first byte
//! selects the wire format:
//!
//! | Tag    | Format                                              |
//! |--------|-----------------------------------------------------|
//! | `0x01` | bincode payload (fixed-width ints, little-endian)   |
//! | `0x02` | the same payload, raw DEFLATE                       |
//! | `0x7B` | legacy JSON (the tag is the opening `{`), read-only |
//!
//! Decoding never touches caller state; every failure is a [`DecodeError`].

use std::io::{Read, Write};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bincode::Options;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::plan::{Door, Placement, Plan};

/// Upper bound on a decoded (and decompressed) payload.
pub const MAX_PAYLOAD_BYTES: u64 = 1 << 20;

/// URL-safe alphabet, unpadded on encode, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Marker that precedes the payload in a planner link.
const ROUTE_MARKER: &str = "planner/";

// ── Formats ─────────────────────────────────────────────────────────────

/// Wire format selected by the leading tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Binary,
    Deflate,
    /// Decode-only.
    LegacyJson,
}

impl WireFormat {
    pub fn tag(self) -> u8 {
        match self {
            WireFormat::Binary => 0x01,
            WireFormat::Deflate => 0x02,
            WireFormat::LegacyJson => b'{',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(WireFormat::Binary),
            0x02 => Some(WireFormat::Deflate),
            b'{' => Some(WireFormat::LegacyJson),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WireFormat::Binary => "binary",
            WireFormat::Deflate => "deflate",
            WireFormat::LegacyJson => "legacy-json",
        }
    }
}

/// Which writable format `encode` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeMode {
    /// Always `0x01`.
    #[default]
    Uncompressed,
    /// Always `0x02`.
    Compressed,
    /// Whichever of the two is shorter; `0x01` on a tie.
    Smallest,
}

// ── Wire record ─────────────────────────────────────────────────────────

/// Binary payload. Placement records are 7 bytes, doors 4.
#[derive(Debug, Serialize, Deserialize)]
struct WirePlan {
    building_id: String,
    width: u16,
    height: u16,
    /// Row-major usable bitmap, least significant bit first.
    room_bits: Vec<u8>,
    placements: Vec<(u8, u8, u8, u16, u16)>,
    doors: Vec<(u16, u16)>,
}

/// Legacy JSON shape. Placements and doors may be omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPlan {
    building_id: String,
    width: u16,
    height: u16,
    room: Vec<Vec<bool>>,
    #[serde(default)]
    placements: Vec<Placement>,
    #[serde(default)]
    doors: Vec<Door>,
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
        .with_limit(MAX_PAYLOAD_BYTES)
}

fn bitmap_len(width: u16, height: u16) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

fn pack_room(plan: &Plan) -> Vec<u8> {
    let (w, h) = (plan.width as usize, plan.height as usize);
    let mut bits = vec![0u8; bitmap_len(plan.width, plan.height)];
    for r in 0..h {
        for c in 0..w {
            if plan.is_usable(r, c) {
                let i = r * w + c;
                bits[i / 8] |= 1 << (i % 8);
            }
        }
    }
    bits
}

fn unpack_room(bits: &[u8], width: u16, height: u16) -> Result<Vec<Vec<bool>>, DecodeError> {
    let expected = bitmap_len(width, height);
    if bits.len() != expected {
        return Err(DecodeError::InvalidPlan(format!(
            "room bitmap has {} bytes, expected {} for {}×{}",
            bits.len(),
            expected,
            width,
            height
        )));
    }
    let w = width as usize;
    Ok((0..height as usize)
        .map(|r| {
            (0..w)
                .map(|c| {
                    let i = r * w + c;
                    bits[i / 8] & (1 << (i % 8)) != 0
                })
                .collect()
        })
        .collect())
}

impl From<&Plan> for WirePlan {
    fn from(plan: &Plan) -> Self {
        Self {
            building_id: plan.building_id.clone(),
            width: plan.width,
            height: plan.height,
            room_bits: pack_room(plan),
            placements: plan
                .placements
                .iter()
                .map(|p| (p.group, p.item, p.rotation, p.row, p.col))
                .collect(),
            doors: plan.doors.clone(),
        }
    }
}

impl TryFrom<WirePlan> for Plan {
    type Error = DecodeError;

    fn try_from(wire: WirePlan) -> Result<Self, Self::Error> {
        let room = unpack_room(&wire.room_bits, wire.width, wire.height)?;
        Ok(Plan {
            building_id: wire.building_id,
            width: wire.width,
            height: wire.height,
            room,
            placements: wire
                .placements
                .into_iter()
                .map(|(group, item, rotation, row, col)| Placement::new(group, item, rotation, row, col))
                .collect(),
            doors: wire.doors,
        })
    }
}

impl From<LegacyPlan> for Plan {
    fn from(legacy: LegacyPlan) -> Self {
        Plan {
            building_id: legacy.building_id,
            width: legacy.width,
            height: legacy.height,
            room: legacy.room,
            placements: legacy.placements,
            doors: legacy.doors,
        }
    }
}

/// Shape and anchor checks shared by every format.
fn check_structure(plan: &Plan) -> Result<(), DecodeError> {
    if plan.room.len() != plan.height as usize
        || plan.room.iter().any(|row| row.len() != plan.width as usize)
    {
        return Err(DecodeError::InvalidPlan(format!(
            "room grid does not match {}×{}",
            plan.width, plan.height
        )));
    }
    if let Some(p) = plan
        .placements
        .iter()
        .find(|p| !plan.in_bounds(p.row as usize, p.col as usize))
    {
        return Err(DecodeError::InvalidPlan(format!(
            "placement anchor ({}, {}) is outside the room",
            p.row, p.col
        )));
    }
    if let Some(&(r, c)) = plan
        .doors
        .iter()
        .find(|&&(r, c)| !plan.in_bounds(r as usize, c as usize))
    {
        return Err(DecodeError::InvalidPlan(format!(
            "door ({}, {}) is outside the room",
            r, c
        )));
    }
    Ok(())
}

// ── Bytes ───────────────────────────────────────────────────────────────

fn deflate(payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(payload)
        .map_err(|e| EncodeError::Compress(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EncodeError::Compress(e.to_string()))
}

fn inflate(raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    DeflateDecoder::new(raw)
        .take(MAX_PAYLOAD_BYTES + 1)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Decompress(e.to_string()))?;
    if out.len() as u64 > MAX_PAYLOAD_BYTES {
        return Err(DecodeError::Decompress(format!(
            "payload exceeds {} bytes",
            MAX_PAYLOAD_BYTES
        )));
    }
    Ok(out)
}

fn tagged(format: WireFormat, body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(format.tag());
    out.extend(body);
    out
}

/// Serialize a plan to a tagged buffer.
pub fn encode_bytes(plan: &Plan, mode: EncodeMode) -> Result<Vec<u8>, EncodeError> {
    let payload = wire_options().serialize(&WirePlan::from(plan))?;
    match mode {
        EncodeMode::Uncompressed => Ok(tagged(WireFormat::Binary, payload)),
        EncodeMode::Compressed => Ok(tagged(WireFormat::Deflate, deflate(&payload)?)),
        EncodeMode::Smallest => {
            let compressed = deflate(&payload)?;
            if compressed.len() < payload.len() {
                Ok(tagged(WireFormat::Deflate, compressed))
            } else {
                Ok(tagged(WireFormat::Binary, payload))
            }
        }
    }
}

/// Parse a tagged buffer.
pub fn decode_bytes(bytes: &[u8]) -> Result<(Plan, WireFormat), DecodeError> {
    let (&tag, body) = bytes.split_first().ok_or(DecodeError::Empty)?;
    let format = WireFormat::from_tag(tag).ok_or(DecodeError::UnknownTag(tag))?;
    let plan = match format {
        WireFormat::Binary => {
            let wire: WirePlan = wire_options().deserialize(body)?;
            Plan::try_from(wire)?
        }
        WireFormat::Deflate => {
            let payload = inflate(body)?;
            let wire: WirePlan = wire_options().deserialize(&payload)?;
            Plan::try_from(wire)?
        }
        // the tag byte is part of the JSON document
        WireFormat::LegacyJson => Plan::from(serde_json::from_slice::<LegacyPlan>(bytes)?),
    };
    check_structure(&plan)?;
    Ok((plan, format))
}

// ── Text ────────────────────────────────────────────────────────────────

/// Strip a link down to its payload: accepts a bare payload,
/// `#planner/<payload>`, `planner/<payload>` or a full URL.
pub fn extract_payload(text: &str) -> &str {
    let text = text.trim();
    match text.rfind(ROUTE_MARKER) {
        Some(idx) => &text[idx + ROUTE_MARKER.len()..],
        None => text.strip_prefix('#').unwrap_or(text),
    }
}

fn unwrap_text(text: &str) -> Result<Vec<u8>, DecodeError> {
    let payload = extract_payload(text);
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    if payload.len() as u64 > MAX_PAYLOAD_BYTES * 4 / 3 + 4 {
        return Err(DecodeError::Malformed(format!(
            "payload exceeds {} bytes",
            MAX_PAYLOAD_BYTES
        )));
    }
    let bytes = URL_SAFE_LENIENT.decode(payload)?;
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(bytes)
}

/// Encode a plan as base64url text.
pub fn encode(plan: &Plan, mode: EncodeMode) -> Result<String, EncodeError> {
    Ok(URL_SAFE_LENIENT.encode(encode_bytes(plan, mode)?))
}

/// Decode text (or a link) into a plan.
pub fn decode(text: &str) -> Result<Plan, DecodeError> {
    decode_with_format(text).map(|(plan, _)| plan)
}

/// Decode text and report which wire format it used.
pub fn decode_with_format(text: &str) -> Result<(Plan, WireFormat), DecodeError> {
    decode_bytes(&unwrap_text(text)?)
}

/// Cheap integrity pre-check: base64url decodes to a non-empty buffer with a
/// known tag. Passing does not guarantee [`decode`] succeeds.
pub fn precheck(text: &str) -> Result<WireFormat, DecodeError> {
    let bytes = unwrap_text(text)?;
    let tag = bytes.first().copied().ok_or(DecodeError::Empty)?;
    WireFormat::from_tag(tag).ok_or(DecodeError::UnknownTag(tag))
}

/// Boolean form of [`precheck`].
pub fn is_valid_plan_data(text: &str) -> bool {
    precheck(text).is_ok()
}
