use crate::runtimes::RuntimeKind;
use harness_models::HarnessError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// One-shot dependency installation: prepares a function's directory before
/// the image is finalized. Any installer failure aborts the build.
pub struct Installer;

impl Installer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self))]
    pub async fn install_dependencies(
        &self,
        runtime: RuntimeKind,
        function_dir: &Path,
    ) -> Result<(), HarnessError> {
        let manifest = function_dir.join(runtime.manifest_file());
        if !manifest.exists() {
            info!(
                runtime = runtime.as_str(),
                function_dir = %function_dir.display(),
                "no dependency manifest, nothing to install"
            );
            return Ok(());
        }

        let argv: Vec<&str> = match runtime {
            RuntimeKind::Node => {
                if function_dir.join("package-lock.json").exists()
                    || function_dir.join("npm-shrinkwrap.json").exists()
                {
                    vec!["npm", "ci", "--omit=dev"]
                } else {
                    vec!["npm", "install", "--omit=dev"]
                }
            }
            RuntimeKind::Python => vec![
                "pip",
                "install",
                "--no-cache-dir",
                "-r",
                "requirements.txt",
                "--target",
                ".",
            ],
        };

        info!(
            runtime = runtime.as_str(),
            command = %argv.join(" "),
            function_dir = %function_dir.display(),
            "installing dependencies"
        );

        let output = Command::new(argv[0])
            .args(&argv[1..])
            .current_dir(function_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| HarnessError::InstallFailed {
                reason: format!("failed to spawn {}: {}", argv[0], e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::InstallFailed {
                reason: format!("{} exited with {}: {}", argv[0], output.status, stderr),
            });
        }

        info!(runtime = runtime.as_str(), "dependencies installed");
        Ok(())
    }
}

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}
