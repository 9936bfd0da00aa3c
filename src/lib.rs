//! Goban - a networked two-player Go session.
//!
//! An authoritative server enforces stone placement rules (capture, suicide
//! prevention, ko repetition), sequences turns across two connections, and
//! speaks a line-oriented text protocol.
//!
//! # Architecture
//!
//! - **Board engine** ([`games::go`]): pure rule logic - placement validity,
//!   liberty computation, group capture, position snapshots.
//! - **Session** ([`session`]): the match state machine, run as a
//!   single-owner actor over a serialized command queue; emits discrete
//!   events that a dispatcher maps to per-player outbound channels.
//! - **Connection handling** ([`connection`], [`server`]): one reader/writer
//!   task pair per socket, wired to the session queue.
//! - **Wire format** ([`protocol`], [`codec`]): newline-delimited commands
//!   and notifications with JSON move/board payloads.
//! - **Console client** ([`client`]): a thin line client for the same
//!   protocol.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod codec;
pub mod connection;
pub mod error;
pub mod games;
pub mod protocol;
pub mod server;
pub mod session;

pub use error::{ProtocolError, RuleViolation, SessionError};
pub use games::go::{Board, Move, Point, Stone};
pub use protocol::{Command, Notice};
pub use session::{
    PlayerId, Scope, Session, SessionCommand, SessionEvent, SessionHandle, SessionState,
};
