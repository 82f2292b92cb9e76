pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "rent_vs_buy")]
pub mod rent_vs_buy;

pub use error::PropertyFinanceError;
pub use types::*;

/// Standard result type for all property-finance operations
pub type PropertyFinanceResult<T> = Result<T, PropertyFinanceError>;
