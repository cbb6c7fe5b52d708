//! C++ parsing using libclang.

use crate::error::ClangError;
use outline_ast::{DeclKind, DeclNode, DeclTree, FileIdentity, SourceLocation};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;
use tracing::{debug, warn};

/// Parser that uses libclang to parse C++ source files.
pub struct ClangParser {
    index: clang_sys::CXIndex,
}

impl ClangParser {
    /// Load libclang (once per thread) and create an index.
    pub fn new() -> Result<Self, ClangError> {
        if !clang_sys::is_loaded() {
            clang_sys::load().map_err(ClangError::Load)?;
            debug!("loaded libclang");
        }

        unsafe {
            let index = clang_sys::clang_createIndex(0, 0);
            if index.is_null() {
                return Err(ClangError::Index);
            }
            Ok(Self { index })
        }
    }

    /// Parse `path` with the given compiler arguments.
    ///
    /// Diagnostics of error severity are logged; with `strict` the first one
    /// fails the parse.
    pub fn parse_file(&self, path: &Path, args: &[String], strict: bool) -> Result<DeclTree, ClangError> {
        let path_str = path.to_string_lossy();
        let c_path = CString::new(path_str.as_ref())
            .map_err(|_| ClangError::InvalidArgument(path_str.to_string()))?;

        let args: Vec<CString> = args
            .iter()
            .map(|arg| CString::new(arg.as_str()).map_err(|_| ClangError::InvalidArgument(arg.clone())))
            .collect::<Result<_, _>>()?;
        let c_args: Vec<*const c_char> = args.iter().map(|s| s.as_ptr()).collect();

        let tu = unsafe {
            clang_sys::clang_parseTranslationUnit(
                self.index,
                c_path.as_ptr(),
                c_args.as_ptr(),
                c_args.len() as i32,
                ptr::null_mut(),
                0,
                clang_sys::CXTranslationUnit_None,
            )
        };
        if tu.is_null() {
            return Err(ClangError::Parse(path.to_path_buf()));
        }
        let tu = TranslationUnit(tu);

        let errors = tu.error_diagnostics();
        for message in &errors {
            warn!(file = %path.display(), "{}", message);
        }
        if strict {
            if let Some(message) = errors.into_iter().next() {
                return Err(ClangError::Diagnostic { message });
            }
        }

        let root = unsafe { convert_cursor(clang_sys::clang_getTranslationUnitCursor(tu.0)) };
        debug!(file = %path.display(), nodes = root.count(), "converted translation unit");

        Ok(DeclTree {
            root,
            main_file: FileIdentity::new(path),
        })
    }
}

impl Drop for ClangParser {
    fn drop(&mut self) {
        unsafe {
            clang_sys::clang_disposeIndex(self.index);
        }
    }
}

/// Owned translation unit, disposed when dropped.
struct TranslationUnit(clang_sys::CXTranslationUnit);

impl TranslationUnit {
    /// Formatted diagnostics of error severity or worse.
    fn error_diagnostics(&self) -> Vec<String> {
        let mut errors = Vec::new();
        unsafe {
            let num_diagnostics = clang_sys::clang_getNumDiagnostics(self.0);
            for i in 0..num_diagnostics {
                let diag = clang_sys::clang_getDiagnostic(self.0, i);
                if clang_sys::clang_getDiagnosticSeverity(diag) >= clang_sys::CXDiagnostic_Error {
                    let formatted = clang_sys::clang_formatDiagnostic(
                        diag,
                        clang_sys::clang_defaultDiagnosticDisplayOptions(),
                    );
                    errors.push(cx_string_to_string(formatted));
                }
                clang_sys::clang_disposeDiagnostic(diag);
            }
        }
        errors
    }
}

impl Drop for TranslationUnit {
    fn drop(&mut self) {
        unsafe {
            clang_sys::clang_disposeTranslationUnit(self.0);
        }
    }
}

/// Convert a Clang cursor to a declaration node.
///
/// Only declarations are descended into; statement and expression subtrees
/// of function bodies never show up in an outline.
unsafe fn convert_cursor(cursor: clang_sys::CXCursor) -> DeclNode {
    let kind = clang_sys::clang_getCursorKind(cursor);

    let mut node = DeclNode::new(convert_cursor_kind(kind), cursor_display_name(cursor));
    node.location = Some(get_location(cursor));

    let definition = clang_sys::clang_getCursorDefinition(cursor);
    if clang_sys::clang_Cursor_isNull(definition) == 0 {
        node.definition = Some(get_location(definition));
    }

    if kind == clang_sys::CXCursor_TranslationUnit || clang_sys::clang_isDeclaration(kind) != 0 {
        let children_ptr: *mut Vec<DeclNode> = &mut node.children;

        extern "C" fn visitor(
            child: clang_sys::CXCursor,
            _parent: clang_sys::CXCursor,
            data: clang_sys::CXClientData,
        ) -> clang_sys::CXChildVisitResult {
            unsafe {
                let children = &mut *(data as *mut Vec<DeclNode>);

                // Skip null cursors
                if clang_sys::clang_Cursor_isNull(child) != 0 {
                    return clang_sys::CXChildVisit_Continue;
                }

                children.push(convert_cursor(child));
                clang_sys::CXChildVisit_Continue
            }
        }

        clang_sys::clang_visitChildren(cursor, visitor, children_ptr as clang_sys::CXClientData);
    }

    node
}

/// Convert a Clang cursor kind to a declaration kind.
unsafe fn convert_cursor_kind(kind: clang_sys::CXCursorKind) -> DeclKind {
    match kind {
        clang_sys::CXCursor_TranslationUnit => DeclKind::TranslationUnit,
        clang_sys::CXCursor_Namespace => DeclKind::Namespace,
        clang_sys::CXCursor_StructDecl => DeclKind::StructDecl,
        clang_sys::CXCursor_ClassDecl => DeclKind::ClassDecl,
        clang_sys::CXCursor_CXXMethod => DeclKind::Method,
        clang_sys::CXCursor_FunctionDecl => DeclKind::Function,
        clang_sys::CXCursor_VarDecl => DeclKind::VariableDecl,
        _ => DeclKind::other(cx_string_to_string(clang_sys::clang_getCursorKindSpelling(kind))),
    }
}

/// Spelling location of a cursor; builtin declarations have no file.
unsafe fn get_location(cursor: clang_sys::CXCursor) -> SourceLocation {
    let loc = clang_sys::clang_getCursorLocation(cursor);
    let mut file: clang_sys::CXFile = ptr::null_mut();
    let mut line: u32 = 0;
    let mut column: u32 = 0;

    clang_sys::clang_getSpellingLocation(loc, &mut file, &mut line, &mut column, ptr::null_mut());

    if file.is_null() {
        SourceLocation::builtin(line, column)
    } else {
        let name = cx_string_to_string(clang_sys::clang_getFileName(file));
        SourceLocation::new(name.as_str(), line, column)
    }
}

/// Convert a CXString to a Rust String.
fn cx_string_to_string(cx_string: clang_sys::CXString) -> String {
    unsafe {
        let c_str = clang_sys::clang_getCString(cx_string);
        let result = if c_str.is_null() {
            String::new()
        } else {
            CStr::from_ptr(c_str).to_string_lossy().into_owned()
        };
        clang_sys::clang_disposeString(cx_string);
        result
    }
}

/// Display name of a cursor: `bar(int)` for callables, the plain name otherwise.
fn cursor_display_name(cursor: clang_sys::CXCursor) -> String {
    unsafe { cx_string_to_string(clang_sys::clang_getCursorDisplayName(cursor)) }
}
