//! RAG (Retrieval-Augmented Generation) module
//!
//! This module wires retrieval and generation together:
//! - Similarity search against the configured vector store
//! - A system message carrying the retrieved context
//! - Chat model invocation with per-session history
//!
//! # Examples
//!
//! ```rust,no_run
//! use askrag::config::AppConfig;
//! use askrag::models::SessionId;
//! use askrag::rag::QuestionService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = QuestionService::from_config(&config).await?;
//!
//!     let answer = service
//!         .ask(&SessionId::from("demo"), "What is the capital of France?")
//!         .await?;
//!     println!("Answer: {answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod history;
pub mod pipeline;
pub mod prompts;

pub use history::HistoryChat;
pub use history::SessionStore;
pub use pipeline::QuestionService;
pub use prompts::build_context_prompt;
pub use prompts::build_turn_messages;
