mod client;
mod models;
pub mod oauth;

pub use client::TwitterClient;
pub use models::{Tweet, User};
pub use oauth::OAuthSigner;
