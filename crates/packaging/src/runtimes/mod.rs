use harness_models::HarnessError;

mod node;
mod python;

/// Language runtimes the packaging pipeline can build images for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    Node,
    Python,
}

impl RuntimeKind {
    pub fn parse(s: &str) -> Result<Self, HarnessError> {
        match s {
            "nodejs" | "node" => Ok(RuntimeKind::Node),
            "python" => Ok(RuntimeKind::Python),
            other => Err(HarnessError::UnsupportedRuntime {
                runtime: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeKind::Node => "nodejs",
            RuntimeKind::Python => "python",
        }
    }

    /// Dependency manifest the installer looks for in a function package.
    pub fn manifest_file(&self) -> &'static str {
        match self {
            RuntimeKind::Node => "package.json",
            RuntimeKind::Python => "requirements.txt",
        }
    }
}

/// Knobs surfaced as Docker build arguments.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Overrides the runtime's default base image (`BASE_IMAGE` build arg).
    pub base_image: Option<String>,
    /// Image version label (`VERSION` build arg).
    pub version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_image: None,
            version: "latest".to_string(),
        }
    }
}

pub fn dockerfile_for(kind: RuntimeKind, options: &BuildOptions) -> String {
    match kind {
        RuntimeKind::Node => node::dockerfile(options),
        RuntimeKind::Python => python::dockerfile(options),
    }
}
