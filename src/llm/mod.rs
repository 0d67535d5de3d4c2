//! LLM integration for prism-forge.
//!
//! Provides an OpenAI-compatible chat-completions client and the
//! [`LlmProvider`] trait the pipeline is written against, so tests can
//! substitute a deterministic fake that returns scripted batches,
//! shortfalls and malformed payloads.

pub mod client;

pub use client::{
    Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, OpenRouterClient,
    ResponseFormat, Usage,
};
