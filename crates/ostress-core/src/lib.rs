pub mod config;
pub mod logging;
pub mod manifest;
pub mod retry;
pub mod stress;
pub mod transfer;
pub mod url_model;
