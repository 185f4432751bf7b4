//! Error kinds for the layout engine.
//!
//! Every failure is a value: codec and validator errors are recoverable at
//! the call site, and the optimizer reports unmet minimums as warnings.

use std::fmt;

/// Why a candidate placement was refused. Checks run in a fixed order and
/// the first failing one is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementRejected {
    /// Group index is not declared by the furniture set.
    UnknownGroup,
    /// Item index is not declared by the group.
    UnknownItem,
    /// Rotation is not allowed by the group's orientation mode.
    IllegalRotation,
    /// The item references a tile key absent from the catalog.
    UnknownTile(String),
    /// The group already holds `max` placements.
    GroupFull,
    /// The oriented footprint leaves the room rectangle.
    OutOfBounds,
    /// A footprint cell lands on a cell that is not usable floor.
    NotRoomFloor,
    /// A footprint cell is already covered by another placement.
    Overlap,
    /// A blocking tile would cut off the last walkable neighbour of a tile
    /// or door that needs one.
    BlocksRequiredWalkway,
    /// A tile that must be reachable has no walkable neighbour.
    Unreachable,
    /// A footprint cell covers a door.
    DoorBlocked,
}

impl fmt::Display for PlacementRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementRejected::UnknownGroup => write!(f, "unknown furniture group"),
            PlacementRejected::UnknownItem => write!(f, "unknown item variant"),
            PlacementRejected::IllegalRotation => write!(f, "rotation not allowed for this group"),
            PlacementRejected::UnknownTile(key) => write!(f, "tile key '{}' is not in the catalog", key),
            PlacementRejected::GroupFull => write!(f, "group already at its maximum"),
            PlacementRejected::OutOfBounds => write!(f, "footprint extends outside the room"),
            PlacementRejected::NotRoomFloor => write!(f, "footprint covers a cell that is not room floor"),
            PlacementRejected::Overlap => write!(f, "footprint overlaps another placement"),
            PlacementRejected::BlocksRequiredWalkway => {
                write!(f, "blocking tile cuts off a tile or door that must stay reachable")
            }
            PlacementRejected::Unreachable => write!(f, "a tile that must be reachable has no walkable neighbour"),
            PlacementRejected::DoorBlocked => write!(f, "footprint covers a door"),
        }
    }
}

impl std::error::Error for PlacementRejected {}

/// A group the optimizer could not bring up to its minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMinimumUnmet {
    pub group: usize,
    pub placed: u32,
    pub min: u32,
}

impl fmt::Display for GroupMinimumUnmet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group {} has {} of at least {} placements",
            self.group, self.placed, self.min
        )
    }
}

/// Failure to turn text into a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No payload after base64url decoding.
    Empty,
    /// Not valid base64url.
    InvalidBase64(String),
    /// First byte is not a known format tag.
    UnknownTag(u8),
    /// Truncated or garbled binary payload.
    Malformed(String),
    /// Compressed payload could not be inflated.
    Decompress(String),
    /// Legacy JSON payload failed to parse.
    Json(String),
    /// Payload parsed but describes an inconsistent plan.
    InvalidPlan(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "plan data is empty"),
            DecodeError::InvalidBase64(e) => write!(f, "invalid base64url: {}", e),
            DecodeError::UnknownTag(t) => write!(f, "unknown plan format tag {:#04x}", t),
            DecodeError::Malformed(e) => write!(f, "malformed plan payload: {}", e),
            DecodeError::Decompress(e) => write!(f, "could not decompress plan: {}", e),
            DecodeError::Json(e) => write!(f, "invalid legacy plan JSON: {}", e),
            DecodeError::InvalidPlan(e) => write!(f, "inconsistent plan: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError::InvalidBase64(e.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for DecodeError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        DecodeError::Malformed(e.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

/// Failure to turn a plan into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Serialize(String),
    Compress(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Serialize(e) => write!(f, "could not serialize plan: {}", e),
            EncodeError::Compress(e) => write!(f, "could not compress plan: {}", e),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<Box<bincode::ErrorKind>> for EncodeError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        EncodeError::Serialize(e.to_string())
    }
}

/// Top-level error for planner operations that span modules.
#[derive(Debug)]
pub enum PlannerError {
    Decode(DecodeError),
    Encode(EncodeError),
    /// No building with this id in the catalog.
    UnknownBuilding(String),
    /// The building names a furniture set the catalog does not define.
    MissingFurniture { building: String, furniture: String },
    /// The furniture table could not be parsed.
    Schema(String),
    /// Configuration could not be loaded or is invalid.
    Config(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Decode(e) => write!(f, "decode failed: {}", e),
            PlannerError::Encode(e) => write!(f, "encode failed: {}", e),
            PlannerError::UnknownBuilding(id) => write!(f, "unknown building id '{}'", id),
            PlannerError::MissingFurniture {
                building,
                furniture,
            } => write!(
                f,
                "building '{}' has no furniture definition '{}'",
                building, furniture
            ),
            PlannerError::Schema(e) => write!(f, "furniture table error: {}", e),
            PlannerError::Config(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::Decode(e) => Some(e),
            PlannerError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for PlannerError {
    fn from(e: DecodeError) -> Self {
        PlannerError::Decode(e)
    }
}

impl From<EncodeError> for PlannerError {
    fn from(e: EncodeError) -> Self {
        PlannerError::Encode(e)
    }
}
