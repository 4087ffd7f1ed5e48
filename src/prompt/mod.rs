// Prompt construction. Everything here is deterministic string rendering;
// the templates are the contract with the models, so tests pin their shape.

pub mod datagen;
pub mod tutor;

pub use datagen::{build_generation_prompt, DATAGEN_SYSTEM_PROMPT};
pub use tutor::{translation_prompt, user_prompt_for, TUTOR_SYSTEM_PROMPT};
