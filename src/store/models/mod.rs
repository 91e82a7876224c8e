pub mod product;
pub mod user;

pub use product::{NewProduct, Product, ProductDraft, ProductPatch, ProductValidationError, Rating};
pub use user::{User, UserProfile};
