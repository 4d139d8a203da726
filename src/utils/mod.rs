pub mod jwt;
pub mod time;
pub mod validation;

pub use jwt::*;
pub use time::*;
pub use validation::*;
