//! compile_commands.json lookup.
//!
//! CMake and Bear record the exact compiler invocation for each source file.
//! The outline only needs the flags that change how declarations parse:
//! include directories, macro definitions and the language standard.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// One entry of a compile database.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compiler invocation
    pub directory: PathBuf,
    /// Source file, absolute or relative to `directory`
    pub file: PathBuf,
    /// Shell-quoted command line
    #[serde(default)]
    pub command: Option<String>,
    /// Pre-split command line; wins over `command`
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

/// Parse-relevant flags pulled out of a compile command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerFlags {
    /// `-I`, `-isystem` and `-iquote` directories, resolved against the command directory
    pub includes: Vec<PathBuf>,
    /// `-D` definitions as spelled (`NAME` or `NAME=VALUE`)
    pub defines: Vec<String>,
    /// Last `-std=` value
    pub std: Option<String>,
}

impl CompileCommand {
    /// The command line as separate arguments.
    pub fn arguments(&self) -> Vec<String> {
        match (&self.arguments, &self.command) {
            (Some(args), _) => args.clone(),
            (None, Some(command)) => split_command(command),
            (None, None) => Vec::new(),
        }
    }

    pub fn flags(&self) -> CompilerFlags {
        let mut flags = CompilerFlags::default();
        let args = self.arguments();
        let mut args = args.iter().map(String::as_str);

        while let Some(arg) = args.next() {
            match arg {
                "-I" | "-isystem" | "-iquote" => {
                    if let Some(dir) = args.next() {
                        flags.includes.push(self.directory.join(dir));
                    }
                }
                "-D" => {
                    if let Some(define) = args.next() {
                        flags.defines.push(define.to_string());
                    }
                }
                _ => {
                    if let Some(dir) = arg.strip_prefix("-I").filter(|dir| !dir.is_empty()) {
                        flags.includes.push(self.directory.join(dir));
                    } else if let Some(define) = arg.strip_prefix("-D").filter(|d| !d.is_empty()) {
                        flags.defines.push(define.to_string());
                    } else if let Some(std) = arg.strip_prefix("-std=") {
                        flags.std = Some(std.to_string());
                    }
                }
            }
        }

        flags
    }

    fn matches(&self, source: &Path, cwd: &Path) -> bool {
        let recorded = lexical_normalize(&self.directory.join(&self.file));
        let source = lexical_normalize(source);
        recorded == lexical_normalize(&cwd.join(&source))
            || recorded == lexical_normalize(&self.directory.join(&source))
            || (source.is_relative() && recorded.ends_with(&source))
    }
}

/// Drop `.` segments and fold `dir/..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.components().next_back(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Split a command line on whitespace, honouring double quotes and backslash escapes.
fn split_command(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quoted = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_arg = true;
            }
            '"' => {
                quoted = !quoted;
                in_arg = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    args
}

/// A loaded compile_commands.json.
#[derive(Debug, Clone)]
pub struct CompileCommands {
    commands: Vec<CompileCommand>,
}

impl CompileCommands {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let commands: Vec<CompileCommand> = serde_json::from_str(json)?;
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    /// The entry for `source`, with relative paths taken from the current directory.
    pub fn find_command(&self, source: &Path) -> Option<&CompileCommand> {
        let cwd = std::env::current_dir().unwrap_or_default();
        self.find_command_from(source, &cwd)
    }

    /// The entry for `source`, with relative paths taken from `cwd`.
    ///
    /// Both sides are compared absolute and without `.`/`..` segments. A
    /// relative `source` also matches by suffix, so `src/main.cc` finds
    /// `/home/user/project/src/main.cc` from anywhere.
    pub fn find_command_from(&self, source: &Path, cwd: &Path) -> Option<&CompileCommand> {
        self.commands.iter().find(|cmd| cmd.matches(source, cwd))
    }

    /// Like [`CompileCommands::find_command`], but a missing entry is an error.
    pub fn require_command(&self, source: &Path) -> Result<&CompileCommand> {
        self.find_command(source)
            .ok_or_else(|| ConfigError::CommandNotFound(source.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_command_and_arguments() {
        let json = r#"[
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/main.cc",
                "command": "g++ -I/usr/include -I../include -DDEBUG=1 -std=c++20 -c main.cc"
            },
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/utils.cc",
                "arguments": ["g++", "-isystem", "/usr/include", "-DNDEBUG", "-D", "LUA_EXPORT=", "-c", "utils.cc"]
            }
        ]"#;

        let cmds = CompileCommands::from_json(json).unwrap();
        assert_eq!(cmds.commands().len(), 2);

        assert_eq!(
            cmds.commands()[0].flags(),
            CompilerFlags {
                includes: vec![
                    PathBuf::from("/usr/include"),
                    PathBuf::from("/home/user/project/build/../include"),
                ],
                defines: vec!["DEBUG=1".to_string()],
                std: Some("c++20".to_string()),
            }
        );

        let utils = cmds.commands()[1].flags();
        assert_eq!(utils.std, None);
        assert_eq!(utils.includes, vec![PathBuf::from("/usr/include")]);
        assert_eq!(utils.defines, vec!["NDEBUG", "LUA_EXPORT="]);
    }

    #[test]
    fn test_quoted_command_arguments() {
        assert_eq!(
            split_command(r#"clang++ -DNAME="a b" -I "my dir" -DPATH=\"x\"  -c f.cc"#),
            vec!["clang++", "-DNAME=a b", "-I", "my dir", "-DPATH=\"x\"", "-c", "f.cc"]
        );
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn test_find_command() {
        let json = r#"[
            {
                "directory": "/build",
                "file": "src/main.cc",
                "command": "g++ -c main.cc"
            }
        ]"#;

        let cmds = CompileCommands::from_json(json).unwrap();

        assert!(cmds.find_command(Path::new("src/main.cc")).is_some());
        assert!(cmds.find_command(Path::new("/build/src/main.cc")).is_some());
        assert!(cmds.find_command(Path::new("main.cc")).is_some());
        assert!(cmds.find_command(Path::new("./src/main.cc")).is_some());
        assert!(cmds.find_command(Path::new("/build/./src/../src/main.cc")).is_some());
        assert!(cmds.find_command(Path::new("src/other.cc")).is_none());
        assert!(cmds.find_command(Path::new("/elsewhere/main.cc")).is_none());
        assert!(matches!(
            cmds.require_command(Path::new("src/other.cc")),
            Err(ConfigError::CommandNotFound(_))
        ));
    }

    #[test]
    fn test_find_command_relative_to_working_directory() {
        let json = r#"[
            {
                "directory": "/tmp/project/build",
                "file": "/tmp/project/t.cpp",
                "command": "g++ -c ../t.cpp"
            }
        ]"#;

        let cmds = CompileCommands::from_json(json).unwrap();
        let cwd = Path::new("/tmp/project");

        assert!(cmds.find_command_from(Path::new("./t.cpp"), cwd).is_some());
        assert!(cmds.find_command_from(Path::new("t.cpp"), cwd).is_some());
        assert!(cmds.find_command_from(Path::new("../t.cpp"), Path::new("/tmp/project/build")).is_some());
        assert!(cmds.find_command_from(Path::new("./u.cpp"), cwd).is_none());
    }
}
