//! Furniture layout engine for FurnPlan.
//!
//! Given a building and a room shape, this crate decides where furniture may
//! go, fills a room automatically, totals the building's statistics, and
//! packs the result into a short shareable string. Everything is pure data in,
//! data out; the only I/O is the optional file-backed fallback store.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`audit`] | Whole-plan invariant audit (bounds, overlaps, doors, group counts) |
//! | [`catalog`] | Builtin furniture table keyed by building id, self-validation |
//! | [`codec`] | Tagged binary / deflate / legacy JSON plan codec, base64url text |
//! | [`config`] | Planner configuration and validation |
//! | [`error`] | Decode, encode, placement and planner error kinds |
//! | [`footprint`] | Oriented, catalog-resolved item footprints |
//! | [`optimizer`] | Deterministic greedy auto-placement with minimum repair |
//! | [`plan`] | Room model, placements, occupancy arena |
//! | [`render`] | ASCII grid and text report |
//! | [`rotation`] | Quarter-turn and mirror transforms of tile grids |
//! | [`route`] | URL fragment router |
//! | [`schema`] | Tile types, groups, items, stats, buildings |
//! | [`stats`] | Stat aggregation and display formatting |
//! | [`storage`] | Last-good plan store and link recovery |
//! | [`validator`] | Single-placement legality checks |

pub mod audit;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod footprint;
pub mod optimizer;
pub mod plan;
pub mod render;
pub mod rotation;
pub mod route;
pub mod schema;
pub mod stats;
pub mod storage;
pub mod validator;
