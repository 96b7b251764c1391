//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the switch: post
//! classification, redundant-write suppression, and the poll loop.
//! All interaction with the network and the serial device happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without a live API or a plugged-in board.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
