pub mod api;
pub mod backend;
pub mod boundary;
pub mod commentary;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod game;
pub mod llms_txt;
pub mod localize;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod plugin;
pub mod render;
pub mod request;
pub mod tools;
pub mod upstream;
