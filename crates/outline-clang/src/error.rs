use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the libclang frontend.
#[derive(Error, Diagnostic, Debug)]
pub enum ClangError {
    #[error("Failed to load libclang: {0}")]
    #[diagnostic(
        code(outline::clang::load),
        help("install libclang or point LIBCLANG_PATH at the directory containing it, or use --frontend tree-sitter")
    )]
    Load(String),

    #[error("Failed to create clang index")]
    #[diagnostic(code(outline::clang::index))]
    Index,

    #[error("Failed to parse file: {}", .0.display())]
    #[diagnostic(code(outline::clang::parse))]
    Parse(PathBuf),

    #[error("Clang error: {message}")]
    #[diagnostic(
        code(outline::clang::diagnostic),
        help("run without --strict to outline the declarations clang recovered")
    )]
    Diagnostic { message: String },

    /// Path or compiler argument containing an interior NUL byte.
    #[error("Invalid argument for libclang: {0:?}")]
    #[diagnostic(code(outline::clang::argument))]
    InvalidArgument(String),
}
