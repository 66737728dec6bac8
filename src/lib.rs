pub mod category;
pub mod config;
pub mod content_cache;
pub mod image_relay;
pub mod logger;
pub mod news;
pub mod normalizer;
pub mod paginator;
pub mod query_string;
pub mod server;
pub mod text_utils;
pub mod util;
pub mod view;
pub mod wordpress;
#[cfg(test)]
mod test_data;
