//! Interactive terminal chat with the support assistant.
//!
//! Readline input, slash commands, a thinking spinner while the agent
//! answers, and markdown rendering of replies. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
