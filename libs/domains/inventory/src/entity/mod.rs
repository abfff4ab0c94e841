//! sea-orm entities for the `departments` and `products` tables.

pub mod department;
pub mod product;
