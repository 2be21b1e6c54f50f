pub mod companion;
pub mod health;
pub mod image;
pub mod writing;
