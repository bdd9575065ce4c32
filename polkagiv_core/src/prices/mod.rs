pub mod cache;
pub mod dto;
pub mod handler;
