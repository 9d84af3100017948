use super::BuildOptions;

pub fn dockerfile(options: &BuildOptions) -> String {
    let base_image = options
        .base_image
        .as_deref()
        .unwrap_or("python:3.11-slim");
    format!(
        r#"
ARG BASE_IMAGE={base_image}
FROM ${{BASE_IMAGE}}
ARG VERSION={version}
LABEL harness.version=${{VERSION}}
ENV PYTHON_VERSION=3.11
ENV PYTHONPATH=/function
ENV SCRIPT_FILE=/usr/local/bin/harness-server

RUN mkdir -p /function

# Copy function code
COPY function/ /function/

WORKDIR /function

# Install dependencies if a manifest exists
RUN if [ -f requirements.txt ]; then \
      pip install --no-cache-dir -r requirements.txt --target .; \
    fi

# Non-root runtime user; the entrypoint drops to it before exec
RUN groupadd -r harness && useradd -r -g harness harness \
    && chown -R harness:harness /function
ENV HARNESS_RUN_AS=harness
ENV HARNESS_FUNCTIONS_DIR=/function

# Harness entrypoint and server
COPY harness-entrypoint /usr/local/bin/harness-entrypoint
COPY harness-server /usr/local/bin/harness-server

ENTRYPOINT ["/usr/local/bin/harness-entrypoint"]
"#,
        base_image = base_image,
        version = options.version,
    )
}
