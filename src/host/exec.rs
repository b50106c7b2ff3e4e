use crate::error::{Error, Result};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

#[cfg(target_os = "windows")]
const EXECUTABLE_NAME: &str = "main.exe";
#[cfg(not(target_os = "windows"))]
const EXECUTABLE_NAME: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Toolchain {
    pub extension: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// Compiled toolchains build `main` first, then run it.
    pub compiled: bool,
}

pub(crate) fn toolchain_for(language: &str) -> Result<Toolchain> {
    let toolchain = match language.trim().to_lowercase().as_str() {
        "python" => Toolchain {
            extension: "py",
            program: "python",
            args: &[],
            compiled: false,
        },
        "javascript" | "typescript" => Toolchain {
            extension: "js",
            program: "node",
            args: &[],
            compiled: false,
        },
        "c++" | "cpp" => Toolchain {
            extension: "cpp",
            program: "g++",
            args: &[],
            compiled: true,
        },
        "c" => Toolchain {
            extension: "c",
            program: "gcc",
            args: &[],
            compiled: true,
        },
        "rust" => Toolchain {
            extension: "rs",
            program: "rustc",
            args: &[],
            compiled: true,
        },
        "go" | "golang" => Toolchain {
            extension: "go",
            program: "go",
            args: &["run"],
            compiled: false,
        },
        _ => return Err(Error::UnsupportedLanguage(language.to_string())),
    };
    Ok(toolchain)
}

fn spawn_error(program: &str) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Spawn {
        program: program.to_string(),
        source,
    }
}

/// stdout, then stderr on its own line when there is any.
pub(crate) fn collect_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.is_empty() {
        stdout.to_string()
    } else {
        format!("{stdout}\n{stderr}")
    }
}

pub(crate) async fn execute(cwd: &Path, language: &str, code: &str) -> Result<String> {
    let toolchain = toolchain_for(language)?;
    let file_name = format!("main.{}", toolchain.extension);
    let source = cwd.join(&file_name);
    tokio::fs::write(&source, code).await?;
    info!(%language, program = toolchain.program, "executing {}", source.display());

    let output = if toolchain.compiled {
        let executable = cwd.join(EXECUTABLE_NAME);
        let compile = Command::new(toolchain.program)
            .arg(&source)
            .arg("-o")
            .arg(&executable)
            .current_dir(cwd)
            .output()
            .await
            .map_err(spawn_error(toolchain.program))?;

        if !compile.status.success() {
            debug!(status = ?compile.status, "compilation failed");
            return Ok(String::from_utf8_lossy(&compile.stderr).to_string());
        }

        Command::new(&executable)
            .current_dir(cwd)
            .output()
            .await
            .map_err(spawn_error(EXECUTABLE_NAME))?
    } else {
        Command::new(toolchain.program)
            .args(toolchain.args)
            .arg(&file_name)
            .current_dir(cwd)
            .output()
            .await
            .map_err(spawn_error(toolchain.program))?
    };

    Ok(collect_output(&output))
}

/// The directory argument of a `cd` command, `""` for a bare `cd`, or `None`
/// for anything else.
pub(crate) fn cd_target(command: &str) -> Option<&str> {
    let trimmed = command.trim();
    if trimmed == "cd" {
        return Some("");
    }
    trimmed.strip_prefix("cd ").map(str::trim)
}

pub(crate) async fn run_shell(cwd: &Path, command: &str) -> Result<String> {
    #[cfg(target_os = "windows")]
    let (shell, args): (&str, &[&str]) = ("powershell", &["-NoProfile", "-Command"]);
    #[cfg(not(target_os = "windows"))]
    let (shell, args): (&str, &[&str]) = ("sh", &["-c"]);

    debug!(%command, cwd = %cwd.display(), "running terminal command");
    let output = Command::new(shell)
        .args(args)
        .arg(command)
        .current_dir(cwd)
        .output()
        .await
        .map_err(spawn_error(shell))?;
    Ok(collect_output(&output))
}

#[cfg(test)]
mod tests {
    use super::{cd_target, toolchain_for};
    use crate::error::Error;

    #[test]
    fn routes_aliases_to_the_same_toolchain() {
        let go = toolchain_for("Go").expect("go toolchain");
        assert_eq!(go.args, &["run"]);
        assert!(!go.compiled);
        let cpp = toolchain_for("C++").expect("c++ toolchain");
        assert_eq!(cpp, toolchain_for("cpp").expect("cpp toolchain"));
        assert!(cpp.compiled);
        assert_eq!(cpp.program, "g++");

        let js = toolchain_for("TypeScript").expect("typescript runs through node");
        assert_eq!(js.program, "node");
        assert_eq!(js.extension, "js");
        assert!(!js.compiled);

        assert_eq!(toolchain_for("golang").expect("golang").program, "go");
        assert_eq!(toolchain_for("Rust").expect("rust").program, "rustc");
        assert_eq!(toolchain_for("python").expect("python").extension, "py");
    }

    #[test]
    fn unknown_language_is_unsupported() {
        let error = toolchain_for("Text").expect_err("text cannot run");
        assert!(matches!(error, Error::UnsupportedLanguage(name) if name == "Text"));
    }

    #[test]
    fn cd_target_recognizes_only_cd() {
        assert_eq!(cd_target("cd"), Some(""));
        assert_eq!(cd_target("  cd  src  "), Some("src"));
        assert_eq!(cd_target("cd ~"), Some("~"));
        assert_eq!(cd_target("cdrom"), None);
        assert_eq!(cd_target("ls -la"), None);
    }
}
