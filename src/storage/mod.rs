//! Persistence for expense registers.

pub mod json_backend;

use crate::errors::ExpenseError;
use crate::expense::ExpenseRegister;

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Seam between the register model and whatever holds its bytes.
pub trait StorageBackend {
    fn save(&self, register: &ExpenseRegister, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<ExpenseRegister>;
}

pub use json_backend::{load_register_from_path, save_register_to_path, JsonStorage};
