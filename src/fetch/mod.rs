pub mod rest;
pub mod source;

pub use rest::RestClient;
pub use source::{fetch_pair, FetchError, FetchGeneration};

#[cfg(test)]
mod tests;
