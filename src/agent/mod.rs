//! Agent system for intelligent task execution with tool calling.
//!
//! Provides an LLM agent loop that selects tools from a registry by name,
//! invokes them with validated arguments, and feeds the results back until
//! the model produces a final answer.

mod runner;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
