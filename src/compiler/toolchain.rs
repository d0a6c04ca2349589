use std::path::PathBuf;
use std::process::Stdio;

use eyre::{Result, WrapErr, eyre};
use tokio::process::Command;

use super::{CompileOutput, Compiler, sources};
use crate::config::CompilerSettings;
use crate::project::{Project, ProjectType};

/// Command line used to build a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn for_project(project_type: ProjectType, settings: &CompilerSettings) -> Self {
        match project_type {
            ProjectType::Foundry => {
                let mut args = vec![
                    "build".to_string(),
                    "--skip".to_string(),
                    "test".to_string(),
                    "--skip".to_string(),
                    "script".to_string(),
                    "--use".to_string(),
                    settings.solc_version.clone(),
                ];
                if settings.optimizer {
                    args.push("--optimize".to_string());
                    args.push("--optimizer-runs".to_string());
                    args.push(settings.optimizer_runs.to_string());
                }
                Self {
                    program: "forge".to_string(),
                    args,
                }
            }
            // Compiler settings and source paths live in the Hardhat config itself
            ProjectType::Hardhat => Self {
                program: "npx".to_string(),
                args: vec!["hardhat".to_string(), "compile".to_string()],
            },
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Compiles with the project's own toolchain, forge or Hardhat
///
/// Source discovery only guards against an empty project. The toolchain
/// chooses what to build: forge skips tests and scripts through `--skip`, while
/// Hardhat compiles its configured sources directory as is.
pub struct ToolchainCompiler {
    project_root: PathBuf,
    src_dir: PathBuf,
    invocation: Invocation,
}

impl ToolchainCompiler {
    pub fn new(project: &Project, settings: &CompilerSettings) -> Self {
        Self {
            project_root: project.root.clone(),
            src_dir: project.src_dir.clone(),
            invocation: Invocation::for_project(project.project_type, settings),
        }
    }

    #[cfg(test)]
    fn with_invocation(mut self, invocation: Invocation) -> Self {
        self.invocation = invocation;
        self
    }
}

impl Compiler for ToolchainCompiler {
    async fn compile(&self) -> Result<CompileOutput> {
        let sources = sources::discover(&self.src_dir)?;
        if sources.is_empty() {
            return Err(eyre!("No contract sources found in {:?}", self.src_dir));
        }

        tracing::info!("Running {}", self.invocation);

        let output = Command::new(&self.invocation.program)
            .args(&self.invocation.args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .wrap_err_with(|| format!("Failed to spawn {}", self.invocation.program))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!("{}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(eyre!(
                "`{}` failed ({}):\n{}",
                self.invocation,
                output.status,
                stderr.trim()
            ));
        }

        Ok(CompileOutput {
            sources: sources.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn settings(optimizer: bool) -> CompilerSettings {
        CompilerSettings {
            solc_version: "0.8.16".to_string(),
            optimizer,
            optimizer_runs: 200,
        }
    }

    fn project(root: &std::path::Path) -> Project {
        Project {
            project_type: ProjectType::Foundry,
            root: root.to_path_buf(),
            name: "mover".to_string(),
            src_dir: root.join("src"),
            out_dir: root.join("out"),
            foundry: None,
        }
    }

    #[test]
    fn test_forge_invocation() {
        let invocation = Invocation::for_project(ProjectType::Foundry, &settings(true));
        assert_eq!(
            invocation.to_string(),
            "forge build --skip test --skip script --use 0.8.16 --optimize --optimizer-runs 200"
        );

        let invocation = Invocation::for_project(ProjectType::Foundry, &settings(false));
        assert_eq!(
            invocation.to_string(),
            "forge build --skip test --skip script --use 0.8.16"
        );
    }

    #[test]
    fn test_hardhat_invocation() {
        let invocation = Invocation::for_project(ProjectType::Hardhat, &settings(true));
        assert_eq!(invocation.to_string(), "npx hardhat compile");
    }

    #[tokio::test]
    async fn test_no_sources_fails_before_running_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = ToolchainCompiler::new(&project(dir.path()), &settings(true));

        let err = compiler.compile().await.unwrap_err();
        assert!(err.to_string().contains("No contract sources"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_toolchain_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/Mover.sol"), "contract Mover {}").unwrap();

        let compiler = ToolchainCompiler::new(&project(dir.path()), &settings(true))
            .with_invocation(Invocation {
                program: "sh".to_string(),
                args: vec![
                    "-c".to_string(),
                    "echo 'ParserError: expected ;' >&2; exit 1".to_string(),
                ],
            });

        let err = compiler.compile().await.unwrap_err();
        assert!(err.to_string().contains("ParserError"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_toolchain_success() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/Mover.sol"), "contract Mover {}").unwrap();
        fs::write(dir.path().join("src/Mover.t.sol"), "contract MoverTest {}").unwrap();

        let compiler = ToolchainCompiler::new(&project(dir.path()), &settings(true))
            .with_invocation(Invocation {
                program: "true".to_string(),
                args: vec![],
            });

        let output = compiler.compile().await.unwrap();
        assert_eq!(output, CompileOutput { sources: 1 });
    }
}
