pub mod client;
pub mod config;
pub mod console;
pub mod db;
pub mod desk;
pub mod error;
pub mod form;
pub mod models;
pub mod render;
pub mod routes;
pub mod store;
pub mod sync;
pub mod view;

pub use client::{ClinicApi, HttpClinicApi};
pub use desk::Desk;
pub use error::ClientError;
