// SPDX-License-Identifier: Apache-2.0

//! Netlist ingestion for the iCE40 place-and-route flow.
//!
//! The entry points live in [`blif`]: they read a BLIF description (with the
//! Radiant-style quoted numeric parameters), collapse pass-through `.names`
//! aliases into canonical nets, and check the resulting wiring before handing
//! back a [`design::Design`].

pub mod bits;
pub mod blif;
pub mod design;
pub mod standard_models;
pub mod stats;
