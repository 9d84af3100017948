use super::BuildOptions;

pub fn dockerfile(options: &BuildOptions) -> String {
    let base_image = options
        .base_image
        .as_deref()
        .unwrap_or("node:18-alpine");
    format!(
        r#"
ARG BASE_IMAGE={base_image}
FROM ${{BASE_IMAGE}}
ARG VERSION={version}
LABEL harness.version=${{VERSION}}
ENV NODE_ENV=production
ENV NODE_PATH=/function/node_modules
ENV SCRIPT_FILE=/usr/local/bin/harness-server

RUN mkdir -p /function

# Copy function code
COPY function/ /function/

WORKDIR /function

# Install dependencies if a manifest exists (prefer lockfiles)
RUN if [ -f package-lock.json ] || [ -f npm-shrinkwrap.json ]; then \
      npm ci --omit=dev; \
    elif [ -f package.json ]; then \
      npm install --omit=dev; \
    fi && npm cache clean --force

# Non-root runtime user; the entrypoint drops to it before exec
RUN addgroup -S harness && adduser -S -G harness harness \
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
