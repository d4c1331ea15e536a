pub mod index;
pub mod objects;
