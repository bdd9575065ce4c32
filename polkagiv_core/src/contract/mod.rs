pub mod abi;
pub mod cache;
pub mod dto;
pub mod handler;
pub mod traits;
