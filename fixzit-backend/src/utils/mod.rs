// src/utils/mod.rs
pub mod error_helper;
pub mod jwt;
pub mod password;
pub mod search;
pub mod signature;
pub mod validation;
