//! Configuration for the cpp-outline tool.
//!
//! This crate provides:
//! - Configuration format (`outline.toml`)
//! - compile_commands.json parsing
//!
//! # Example
//!
//! ```toml
//! # outline.toml
//! [parser]
//! frontend = "clang"
//! std = "c++17"
//! includes = ["include"]
//! defines = ["LUA_EXPORT="]
//! compile_commands = "build/compile_commands.json"
//!
//! [outline]
//! filter = "top_level"
//! variable_label = "function"
//! indent = 0
//! ```

mod compile_commands;
mod config;
mod error;

pub use compile_commands::{CompileCommand, CompileCommands, CompilerFlags};
pub use config::{
    FrontendKind, OutlineConfig, OutputConfig, ParserConfig, CONFIG_FILE_NAME, DEFAULT_STD,
};
pub use error::{ConfigError, Result};
