pub mod api;
pub mod api_clients;
pub mod config;
pub mod controller;
pub mod dialogs;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod photo;
pub mod render;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod test_utils;
