pub mod chat;
pub mod food_analysis;
pub mod ingredient;
pub mod nutrition;
pub mod profile;

pub use chat::*;
pub use food_analysis::*;
pub use ingredient::*;
pub use nutrition::*;
pub use profile::*;
