pub mod affordability;
pub mod amortize;
pub mod investment;
pub mod mortgage;
pub mod rent_vs_buy;
