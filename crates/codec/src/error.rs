use primitives::hex::FromHexError;

/// A transaction field could not be brought into canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// `to` is not a 20-byte hex address.
    #[error("invalid recipient address {input:?}: {source}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Underlying hex error.
        #[source]
        source: FromHexError,
    },
    /// `data` is not an even-length hex string.
    #[error("invalid calldata: {0}")]
    InvalidData(#[source] FromHexError),
}
