use crate::runtimes::{self, BuildOptions, RuntimeKind};
use harness_models::HarnessError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info, instrument};

/// Assembles a build context and drives `docker build` for a function.
pub struct ImageBuilder;

impl ImageBuilder {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, options))]
    pub async fn build_image(
        &self,
        function_name: &str,
        runtime: RuntimeKind,
        function_dir: &Path,
        options: &BuildOptions,
        image_ref: &str,
    ) -> Result<(), HarnessError> {
        let temp_dir = tempfile::tempdir().map_err(|e| HarnessError::InternalError {
            reason: e.to_string(),
        })?;
        let build_context = temp_dir.path();

        // Function code lives under function/ in the context so the
        // Dockerfile can copy it as one unit.
        copy_dir_recursive(function_dir, &build_context.join("function")).map_err(|e| {
            HarnessError::InternalError {
                reason: format!("copy build context: {e}"),
            }
        })?;

        let dockerfile_content = runtimes::dockerfile_for(runtime, options);
        let dockerfile_path = build_context.join("Dockerfile");
        std::fs::write(&dockerfile_path, dockerfile_content).map_err(|e| {
            HarnessError::InternalError {
                reason: e.to_string(),
            }
        })?;

        // Harness binaries are expected next to the build invocation; the
        // Dockerfile copies them into /usr/local/bin.
        for binary in ["harness-entrypoint", "harness-server"] {
            let source = Path::new("target/release").join(binary);
            if source.exists() {
                std::fs::copy(&source, build_context.join(binary)).map_err(|e| {
                    HarnessError::InternalError {
                        reason: e.to_string(),
                    }
                })?;
            }
        }

        info!(image_ref = %image_ref, context = %build_context.display(), "building image");

        let mut cmd = Command::new("docker");
        cmd.arg("build")
            .arg("-t")
            .arg(image_ref)
            .arg("-f")
            .arg(&dockerfile_path);
        if let Some(base_image) = &options.base_image {
            cmd.arg("--build-arg").arg(format!("BASE_IMAGE={base_image}"));
        }
        cmd.arg("--build-arg")
            .arg(format!("VERSION={}", options.version));
        cmd.arg(build_context);

        let build_result = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| HarnessError::ImageBuildFailed {
                reason: e.to_string(),
            })?;

        if !build_result.status.success() {
            let stderr = String::from_utf8_lossy(&build_result.stderr);
            error!(image_ref = %image_ref, "docker build failed: {}", stderr);
            return Err(HarnessError::ImageBuildFailed {
                reason: format!("docker build failed: {stderr}"),
            });
        }

        info!(image_ref = %image_ref, function_name = %function_name, "built image");
        Ok(())
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag for a function image, keyed by the code digest so rebuilds of
/// unchanged code hit the Docker cache.
pub fn image_tag(function_name: &str, code_sha256: &str) -> String {
    let short = &code_sha256[..code_sha256.len().min(12)];
    format!("faas-harness/{function_name}:{short}")
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
