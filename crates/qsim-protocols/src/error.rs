//! Error types for the protocols crate.

use qsim_hal::DeviceError;
use thiserror::Error;

/// Errors produced while running a protocol.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The underlying device failed.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Sender and receiver used the same basis but read different bits.
    #[error("BB84 round {round}: bases matched but {sent} was received as {received}")]
    BasisDisagreement {
        /// 1-based round number.
        round: usize,
        /// Bit that was encoded.
        sent: bool,
        /// Bit that was decoded.
        received: bool,
    },

    /// A one-time pad needs at least one key bit per message bit.
    #[error("Key of {key} bits is too short for a message of {message} bits")]
    KeyTooShort {
        /// Message length in bits.
        message: usize,
        /// Key length in bits.
        key: usize,
    },

    /// A win-probability estimate over zero games.
    #[error("At least one game is needed to estimate a win probability")]
    NoGames,
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
