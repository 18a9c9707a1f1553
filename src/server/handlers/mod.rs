pub mod ask;
pub mod health;
pub mod pages;
pub mod upload;
