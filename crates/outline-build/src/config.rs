//! Configuration types (outline.toml format).

use crate::compile_commands::{CompileCommands, CompilerFlags};
use crate::error::{ConfigError, Result};
use outline_walker::WalkOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "outline.toml";

/// Standard passed to the frontend when nothing else asks for one.
pub const DEFAULT_STD: &str = "c++17";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Parser frontend settings.
    pub parser: ParserConfig,

    /// Rendering settings.
    pub outline: OutputConfig,
}

/// Which parser frontend builds the declaration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontendKind {
    /// tree-sitter-cpp, no system dependency
    #[default]
    TreeSitter,
    /// libclang, loaded at runtime
    Clang,
}

/// Parser frontend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Frontend to use.
    pub frontend: FrontendKind,

    /// C++ standard (e.g., "c++17", "c++20").
    pub std: Option<String>,

    /// Include directories.
    pub includes: Vec<PathBuf>,

    /// Preprocessor definitions (`NAME` or `NAME=VALUE`).
    pub defines: Vec<String>,

    /// Additional compiler flags (libclang only).
    pub cflags: Vec<String>,

    /// Splice quoted includes into the tree (tree-sitter only).
    pub follow_includes: bool,

    /// Treat syntax errors as failures.
    pub strict: bool,

    /// compile_commands.json to take flags from.
    pub compile_commands: Option<PathBuf>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            frontend: FrontendKind::default(),
            std: None,
            includes: Vec::new(),
            defines: Vec::new(),
            cflags: Vec::new(),
            follow_includes: true,
            strict: false,
            compile_commands: None,
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(flatten)]
    pub walk: WalkOptions,

    /// Spaces of indentation per nesting level (0 = literal lines).
    pub indent: usize,
}

impl OutlineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: OutlineConfig = toml::from_str(&content)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `outline.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        for include in &mut self.parser.includes {
            if include.is_relative() {
                *include = base.join(&*include);
            }
        }
        if let Some(db) = &mut self.parser.compile_commands {
            if db.is_relative() {
                *db = base.join(&*db);
            }
        }
    }

    /// Merge flags recorded for `source` in the configured compile database.
    ///
    /// Includes and defines are appended after the configured ones; the
    /// standard is taken only if none is configured.
    pub fn apply_compile_commands(&mut self, source: &Path) -> Result<()> {
        let Some(db_path) = self.parser.compile_commands.clone() else {
            return Ok(());
        };

        let commands = CompileCommands::from_file(&db_path)?;
        let command = commands.require_command(source)?;
        debug!(database = %db_path.display(), file = %command.file.display(), "using compile command");

        self.parser.merge(command.flags());
        Ok(())
    }
}

impl ParserConfig {
    /// Append includes and defines, keeping order and dropping duplicates.
    pub fn merge(&mut self, flags: CompilerFlags) {
        for include in flags.includes {
            if !self.includes.contains(&include) {
                self.includes.push(include);
            }
        }
        for define in flags.defines {
            if !self.defines.contains(&define) {
                self.defines.push(define);
            }
        }
        if self.std.is_none() {
            self.std = flags.std;
        }
    }

    /// The configured standard or [`DEFAULT_STD`].
    pub fn std(&self) -> &str {
        self.std.as_deref().unwrap_or(DEFAULT_STD)
    }

    /// Command-line arguments for a C++ compiler frontend.
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec![
            "-x".to_string(),
            "c++".to_string(),
            format!("-std={}", self.std()),
        ];
        args.extend(self.includes.iter().map(|dir| format!("-I{}", dir.display())));
        args.extend(self.defines.iter().map(|define| format!("-D{}", define)));
        args.extend(self.cflags.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outline_walker::{FileFilter, VariableLabel};
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[parser]
frontend = "clang"
std = "c++20"
includes = ["include"]
defines = ["LUA_EXPORT="]
follow_includes = false

[outline]
filter = "every_level"
variable_label = "variable"
indent = 2
        "#;

        let config: OutlineConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.parser.frontend, FrontendKind::Clang);
        assert_eq!(config.parser.std(), "c++20");
        assert_eq!(config.parser.includes, vec![PathBuf::from("include")]);
        assert!(!config.parser.follow_includes);
        assert!(!config.parser.strict);
        assert_eq!(config.outline.walk.filter, FileFilter::EveryLevel);
        assert_eq!(config.outline.walk.variable_label, VariableLabel::Variable);
        assert!(!config.outline.walk.show_names);
        assert_eq!(config.outline.indent, 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: OutlineConfig = toml::from_str("").unwrap();

        assert_eq!(config.parser.frontend, FrontendKind::TreeSitter);
        assert_eq!(config.parser.std(), DEFAULT_STD);
        assert!(config.parser.follow_includes);
        assert_eq!(config.outline, OutputConfig::default());
    }

    #[test]
    fn test_unknown_frontend_is_rejected() {
        let result: std::result::Result<OutlineConfig, _> =
            toml::from_str("[parser]\nfrontend = \"gcc\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_compiler_args() {
        let mut parser = ParserConfig::default();
        parser.includes.push(PathBuf::from("include"));
        parser.defines.push("NDEBUG".to_string());
        parser.cflags.push("-Wno-everything".to_string());

        assert_eq!(
            parser.compiler_args(),
            vec!["-x", "c++", "-std=c++17", "-Iinclude", "-DNDEBUG", "-Wno-everything"]
        );
    }

    #[test]
    fn test_merge_keeps_configured_std() {
        let mut parser = ParserConfig {
            std: Some("c++14".to_string()),
            defines: vec!["A".to_string()],
            ..ParserConfig::default()
        };
        parser.merge(CompilerFlags {
            includes: vec![PathBuf::from("/inc")],
            defines: vec!["A".to_string(), "B".to_string()],
            std: Some("c++20".to_string()),
        });

        assert_eq!(parser.std(), "c++14");
        assert_eq!(parser.defines, vec!["A", "B"]);
        assert_eq!(parser.includes, vec![PathBuf::from("/inc")]);
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("compile_commands.json");
        std::fs::write(
            &db,
            r#"[{"directory": "/build", "file": "/src/test.cpp", "command": "c++ -I/opt/inc -DX=1 -std=c++20 -c test.cpp"}]"#,
        )
        .unwrap();

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(
            file,
            "[parser]\nincludes = [\"include\"]\ncompile_commands = \"compile_commands.json\""
        )
        .unwrap();

        let mut config = OutlineConfig::discover(dir.path()).unwrap();
        assert_eq!(config.parser.includes, vec![dir.path().join("include")]);
        assert_eq!(config.parser.compile_commands.as_deref(), Some(db.as_path()));

        config
            .apply_compile_commands(Path::new("/src/test.cpp"))
            .unwrap();
        assert_eq!(
            config.parser.includes,
            vec![dir.path().join("include"), PathBuf::from("/opt/inc")]
        );
        assert_eq!(config.parser.defines, vec!["X=1"]);
        assert_eq!(config.parser.std(), "c++20");
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutlineConfig::discover(dir.path()).unwrap();
        assert_eq!(config.parser.frontend, FrontendKind::TreeSitter);
    }

    #[test]
    fn test_read_error_reports_cause_once() {
        let dir = tempfile::tempdir().unwrap();
        let err = OutlineConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        let ConfigError::Read { source, .. } = &err else {
            panic!("expected a read error, got {:?}", err);
        };
        assert!(!err.to_string().contains(&source.to_string()));
        assert!(std::error::Error::source(&err).is_some());
    }
}
