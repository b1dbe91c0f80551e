pub mod client;
pub mod jwt;
pub mod oauth;

pub use client::ZoomClient;
