//! Core data structures flowing through `reaction-atlas`.
//!
//! - [`atom`] – Element plus Cartesian coordinates.
//! - [`types`] – Periodic table elements and bond order classifications.
//! - [`point`] – Stationary points (EQ/TS), bonds, connections and species identity.
//! - [`network`] – The assembled reaction network borrowing the parsed points.
//! - [`layout`] – Node coordinates and cluster placements produced for rendering.
//!
//! Parsed geometry ([`StationaryPoint`]) is kept separate from the derived
//! views ([`ReactionNetwork`], [`Layout`]) so that the [`crate::engine`]
//! pipeline can build each stage from the previous one without mutation.
//!
//! [`StationaryPoint`]: point::StationaryPoint
//! [`ReactionNetwork`]: network::ReactionNetwork
//! [`Layout`]: layout::Layout

pub mod atom;
pub mod layout;
pub mod network;
pub mod point;
pub mod types;
