pub mod board;
pub mod config;
pub mod dispatch;
pub mod status;
pub mod store;
pub mod sync;
pub mod terminal;

#[cfg(test)]
mod tests;
