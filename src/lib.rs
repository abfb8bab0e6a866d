pub mod api;
pub mod app;
pub mod breadcrumbs;
pub mod browser;
pub mod config;
pub mod data_models;
pub mod error;
pub mod markup;
pub mod page;
pub mod render;
pub mod session;
pub mod share;
pub mod url_state;
