pub mod export;
pub mod pack;
