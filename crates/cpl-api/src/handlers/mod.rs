pub mod documents;
pub mod health;
pub mod requests;
pub mod upload;
