//! Authoritative room server for the Warlock hidden-role combat game.
//!
//! `room::Room` is the state machine; everything else is either a pure
//! subsystem it drives (`combat`, `damage`, `warlock`, `status_effect`,
//! ...), read-only configuration it's built from (`catalog`), or the
//! ambient plumbing around it (`registry`, `bus`, `net`, `config`).

pub mod ability;
pub mod action;
pub mod bus;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod coordination;
pub mod damage;
pub mod error;
pub mod event;
pub mod game_state_utils;
pub mod ids;
pub mod monster;
pub mod monster_controller;
pub mod net;
pub mod player;
pub mod registry;
pub mod room;
pub mod status_effect;
pub mod template;
pub mod warlock;
