//! Model provider implementations for codecritic.
//!
//! All providers implement the `codecritic_core::Provider` trait. One
//! OpenAI-compatible client covers every endpoint the review loop talks to
//! (Groq, OpenAI, local OpenAI-compatible servers).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
