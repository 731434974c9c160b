pub mod config;
pub mod logging;

pub mod batch;
pub mod checksum;
pub mod fetch;
pub mod input;
pub mod ledger;
pub mod processor;
pub mod storage;
pub mod url_model;
pub mod validate;
