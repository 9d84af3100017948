pub mod image_builder;
pub mod installer;
pub mod runtimes;
pub mod zip_handler;

pub use image_builder::*;
pub use installer::*;
pub use runtimes::*;
pub use zip_handler::*;

#[cfg(test)]
mod tests {
    use super::*;
    use harness_models::HarnessError;
    use std::io::Write;

    fn sample_zip() -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_data));
            zip.start_file("handler.py", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(b"def handler(event): pass").unwrap();
            zip.finish().unwrap();
        }
        zip_data
    }

    #[test]
    fn test_zip_sha256_stable() {
        let handler = ZipHandler::new(1024 * 1024);
        let zip_data = sample_zip();

        let first = futures::executor::block_on(handler.process_zip(&zip_data)).unwrap();
        let second = futures::executor::block_on(handler.process_zip(&zip_data)).unwrap();

        assert_eq!(first.sha256, second.sha256);
        assert_eq!(first.files.len(), 1);
        assert_eq!(first.files[0].name, "handler.py");
    }

    #[test]
    fn test_zip_size_limit_enforced() {
        let handler = ZipHandler::new(8);
        let zip_data = sample_zip();

        let err = futures::executor::block_on(handler.process_zip(&zip_data)).unwrap_err();
        assert!(matches!(err, HarnessError::CodeTooLarge { .. }));
    }

    #[test]
    fn test_garbage_is_not_a_zip() {
        let handler = ZipHandler::new(1024);
        let err =
            futures::executor::block_on(handler.process_zip(b"definitely not a zip")).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidZipFile { .. }));
    }

    #[test]
    fn test_zip_extraction() {
        let handler = ZipHandler::new(1024 * 1024);
        let zip_data = sample_zip();

        let temp_dir = tempfile::tempdir().unwrap();
        futures::executor::block_on(handler.extract_to_directory(&zip_data, temp_dir.path()))
            .unwrap();

        let extracted = temp_dir.path().join("handler.py");
        assert!(extracted.exists());
        let content = std::fs::read_to_string(&extracted).unwrap();
        assert_eq!(content, "def handler(event): pass");
    }

    #[test]
    fn test_runtime_parsing() {
        assert_eq!(RuntimeKind::parse("nodejs").unwrap(), RuntimeKind::Node);
        assert_eq!(RuntimeKind::parse("node").unwrap(), RuntimeKind::Node);
        assert_eq!(RuntimeKind::parse("python").unwrap(), RuntimeKind::Python);
        assert!(matches!(
            RuntimeKind::parse("cobol"),
            Err(HarnessError::UnsupportedRuntime { .. })
        ));
    }

    #[test]
    fn test_node_dockerfile_contract() {
        let dockerfile = dockerfile_for(RuntimeKind::Node, &BuildOptions::default());

        assert!(dockerfile.contains("ARG BASE_IMAGE=node:18-alpine"));
        assert!(dockerfile.contains("ARG VERSION=latest"));
        assert!(dockerfile.contains("NODE_PATH=/function/node_modules"));
        assert!(dockerfile.contains("npm ci --omit=dev"));
        assert!(dockerfile.contains("ENTRYPOINT [\"/usr/local/bin/harness-entrypoint\"]"));
        assert!(dockerfile.contains("HARNESS_RUN_AS=harness"));
    }

    #[test]
    fn test_python_dockerfile_contract() {
        let options = BuildOptions {
            base_image: Some("python:3.12-slim".to_string()),
            version: "2".to_string(),
        };
        let dockerfile = dockerfile_for(RuntimeKind::Python, &options);

        assert!(dockerfile.contains("ARG BASE_IMAGE=python:3.12-slim"));
        assert!(dockerfile.contains("ARG VERSION=2"));
        assert!(dockerfile.contains("PYTHONPATH=/function"));
        assert!(dockerfile.contains("pip install --no-cache-dir -r requirements.txt --target ."));
        assert!(dockerfile.contains("ENTRYPOINT [\"/usr/local/bin/harness-entrypoint\"]"));
    }

    #[test]
    fn test_image_tag_computation() {
        let tag = image_tag(
            "dynamic-html",
            "abcdef0123456789abcdef0123456789abcdef0123456789",
        );
        assert_eq!(tag, "faas-harness/dynamic-html:abcdef012345");

        // Short digests are taken whole.
        assert_eq!(image_tag("fn", "abc"), "faas-harness/fn:abc");
    }

    #[tokio::test]
    async fn test_installer_skips_without_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = Installer::new();

        installer
            .install_dependencies(RuntimeKind::Python, temp_dir.path())
            .await
            .unwrap();
        installer
            .install_dependencies(RuntimeKind::Node, temp_dir.path())
            .await
            .unwrap();
    }
}
