// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless driver for lattice probe sessions.
//!
//! A script stands in for the interactive host: it publishes a regular
//! lattice, feeds selection and drag input tick by tick, captures iterations,
//! and the report renders the resulting displacement history.

pub mod cli;
pub mod report;
pub mod script;
