//! Notion REST client backing the choreboard record store.

mod client;

pub use client::NotionClient;
