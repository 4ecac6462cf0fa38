/// Order validation
///
/// Admission rules applied before an order touches any book state. A rejected
/// order leaves the engine untouched, so the caller can correct and resubmit.
///
/// ## Rules
/// - Price must be positive and within configured bounds
/// - Quantity must be positive and within configured bounds
/// - Symbol must be non-empty (and on the allow-list when one is configured)
///
/// An invalid side is unrepresentable: `Side` is an enum.

use crate::shared::protocol::OrderRequest;
use std::sync::Arc;
use thiserror::Error;

/// Validation failures, naming the violated field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("price out of range: {0}")]
    PriceOutOfRange(String),

    #[error("quantity out of range: {0}")]
    QuantityOutOfRange(String),
}

impl ValidationError {
    /// Violated field label, used for the rejection counter
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidPrice(_) | ValidationError::PriceOutOfRange(_) => "price",
            ValidationError::InvalidQuantity(_) | ValidationError::QuantityOutOfRange(_) => {
                "quantity"
            }
            ValidationError::InvalidSymbol(_) => "symbol",
        }
    }
}

/// Order validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Minimum price (inclusive)
    pub min_price: u64,

    /// Maximum price (inclusive)
    pub max_price: u64,

    /// Minimum quantity (inclusive)
    pub min_quantity: u64,

    /// Maximum quantity (inclusive)
    pub max_quantity: u64,

    /// Allowed symbols (empty means all symbols allowed)
    pub allowed_symbols: Vec<Arc<str>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_price: 1,
            max_price: u64::MAX,
            min_quantity: 1,
            max_quantity: 1_000_000,
            allowed_symbols: Vec::new(),
        }
    }
}

/// Order validator
pub struct OrderValidator {
    config: ValidationConfig,
}

impl OrderValidator {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates an order request against the admission rules
    pub fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        self.validate_price(request.price)?;
        self.validate_quantity(request.quantity)?;
        self.validate_symbol(&request.symbol)?;
        Ok(())
    }

    fn validate_price(&self, price: u64) -> Result<(), ValidationError> {
        if price == 0 {
            return Err(ValidationError::InvalidPrice(
                "price must be greater than zero".to_string(),
            ));
        }

        if price < self.config.min_price {
            return Err(ValidationError::PriceOutOfRange(format!(
                "price {} is below minimum {}",
                price, self.config.min_price
            )));
        }

        if price > self.config.max_price {
            return Err(ValidationError::PriceOutOfRange(format!(
                "price {} exceeds maximum {}",
                price, self.config.max_price
            )));
        }

        Ok(())
    }

    fn validate_quantity(&self, quantity: u64) -> Result<(), ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity(
                "quantity must be greater than zero".to_string(),
            ));
        }

        if quantity < self.config.min_quantity {
            return Err(ValidationError::QuantityOutOfRange(format!(
                "quantity {} is below minimum {}",
                quantity, self.config.min_quantity
            )));
        }

        if quantity > self.config.max_quantity {
            return Err(ValidationError::QuantityOutOfRange(format!(
                "quantity {} exceeds maximum {}",
                quantity, self.config.max_quantity
            )));
        }

        Ok(())
    }

    fn validate_symbol(&self, symbol: &Arc<str>) -> Result<(), ValidationError> {
        if symbol.is_empty() {
            return Err(ValidationError::InvalidSymbol(
                "symbol cannot be empty".to_string(),
            ));
        }

        if !self.config.allowed_symbols.is_empty()
            && !self
                .config
                .allowed_symbols
                .iter()
                .any(|s| s.as_ref() == symbol.as_ref())
        {
            return Err(ValidationError::InvalidSymbol(format!(
                "symbol '{}' is not in allowed list",
                symbol
            )));
        }

        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
