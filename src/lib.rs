//! A File over EtherCAT (FoE) transfer engine supporting `std` and `no_std` environments.
//!
//! FoE is a minimal, TFTP-like file transfer protocol carried over the EtherCAT mailbox. It is
//! most commonly used to push firmware images or configuration blobs into SubDevices, usually
//! while they are in `BOOT` state.
//!
//! This crate implements the master side of the protocol: the read and write session state
//! machines, FoE frame encoding/decoding and the error taxonomy. It does *not* implement the
//! mailbox transport itself — implement [`MailboxTransport`] on top of whatever moves mailbox
//! buffers to and from your devices, then drive transfers through [`FoeClient`].
//!
//! # Protocol notes
//!
//! - Transfers are blocking and half-duplex: one request, one response, repeated until the file
//!   is exhausted. Run at most one transfer per SubDevice at a time.
//! - Data segments are sized to the SubDevice's advertised mailbox length minus the 12 byte
//!   mailbox + FoE preamble.
//! - End of file is signalled by a data segment strictly shorter than the negotiated segment
//!   size. A file that is an exact multiple of the segment size is terminated with an extra
//!   zero length segment.
//! - The 1-7 rolling mailbox counter doubles as the session handle and is never zero.
//!
//! # Feature flags
//!
//! - `std` (enabled by default) — use the standard library, and `log` for logging.
//! - `defmt` — emit logs with `defmt` for `no_std` targets.
//! - `serde` — `serde::Serialize` impls for protocol enums and errors.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(ambiguous_associated_items)]

pub(crate) mod fmt;

pub mod error;
mod foe;
mod mailbox;
mod subdevice;
mod transport;

pub use foe::{FoeClient, FoeConfig, FoeErrorCode, FoeFrame, FoeHeader, FoeOpCode, ProgressHook};
pub use mailbox::{MailboxHeader, MailboxType, Priority};
pub use subdevice::SubDevice;
pub use transport::{MailboxTransport, SendError};
