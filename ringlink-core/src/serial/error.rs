//! Serial channel errors

use ringlink_hal::ConfigError;

/// Errors reported by [`SerialChannel`](super::SerialChannel)
///
/// `E` is the binding's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    /// Channel index is not supported by the binding
    InvalidChannel,
    /// Configuration failed validation
    InvalidConfig(ConfigError),
    /// `init` called on a channel that is already running
    AlreadyInitialized,
    /// Operation requires an initialized channel
    NotInitialized,
    /// The config leaves the required direction (RX or TX) disabled
    DirectionDisabled,
    /// The hardware binding reported a failure
    Binding(E),
}

impl<E> From<ConfigError> for SerialError<E> {
    fn from(e: ConfigError) -> Self {
        SerialError::InvalidConfig(e)
    }
}

impl<E: core::fmt::Debug> embedded_io::Error for SerialError<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            SerialError::NotInitialized => embedded_io::ErrorKind::NotConnected,
            SerialError::DirectionDisabled => embedded_io::ErrorKind::Unsupported,
            SerialError::InvalidChannel | SerialError::InvalidConfig(_) => {
                embedded_io::ErrorKind::InvalidInput
            }
            SerialError::AlreadyInitialized | SerialError::Binding(_) => {
                embedded_io::ErrorKind::Other
            }
        }
    }
}
