pub mod documents;
pub mod form;
pub mod health;
