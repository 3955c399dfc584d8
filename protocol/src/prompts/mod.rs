// LazyAI Prompts
// Prompt templates printed by the `code` and `pr` subcommands

pub mod code;
pub mod pr;

pub use code::render_code_prompt;
pub use pr::render_pr_prompt;
