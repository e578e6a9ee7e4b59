use auto_impl::auto_impl;
use std::{fs, io, path::PathBuf};

/// Spot price used by the original fee scripts, in USD per ETH.
pub const REFERENCE_ETH_PRICE: f64 = 3800.0;

/// The spot price could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    /// The price file could not be read.
    #[error("failed to read price from {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The price is not a number.
    #[error("price {0:?} is not a number")]
    Parse(String),
    /// The price is negative, NaN or infinite.
    #[error("price {0} must be a finite, non-negative number")]
    Invalid(f64),
}

/// Supplies the fiat price of one unit of the native currency.
#[auto_impl(&, Box, Arc)]
pub trait PriceSource {
    /// Returns the current spot price.
    fn spot_price(&self) -> Result<f64, PriceError>;
}

fn validate(price: f64) -> Result<f64, PriceError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(PriceError::Invalid(price))
    }
}

/// A constant spot price.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPrice(f64);

impl FixedPrice {
    /// Creates a constant price source.
    pub fn new(price: f64) -> Self {
        Self(price)
    }
}

impl Default for FixedPrice {
    fn default() -> Self {
        Self(REFERENCE_ETH_PRICE)
    }
}

impl PriceSource for FixedPrice {
    fn spot_price(&self) -> Result<f64, PriceError> {
        validate(self.0)
    }
}

/// Reads the spot price from a file holding a single decimal number.
///
/// The file is read on every call so an external process can keep it current.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePrice {
    path: PathBuf,
}

impl FilePrice {
    /// Creates a price source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PriceSource for FilePrice {
    fn spot_price(&self) -> Result<f64, PriceError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let contents = contents.trim();
        let price = contents
            .parse::<f64>()
            .map_err(|_| PriceError::Parse(contents.to_string()))?;
        validate(price)
    }
}
