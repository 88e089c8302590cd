pub mod client;

pub use client::{BankingClient, BankingClientBuilder};
