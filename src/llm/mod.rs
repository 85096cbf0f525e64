pub mod api;
pub mod client;

pub use api::CompletionInterface;
pub use client::GroqClient;

use lazy_static::lazy_static;
use regex::Regex;

/// Strip chain-of-thought delimiters some models emit before their answer.
pub fn clean_response(response: &str) -> String {
    lazy_static! {
        static ref THINK_RE: Regex = Regex::new(r"(?s)<think>.*?</think>").unwrap();
    }
    THINK_RE.replace_all(response, "").trim().to_string()
}
