use harness_models::HarnessError;
use sha2::{Digest, Sha256};
use std::io::Read;
use tracing::{info, instrument};
use zip::ZipArchive;

/// Validates and unpacks function code archives.
pub struct ZipHandler {
    max_zip_size: u64,
}

impl ZipHandler {
    pub fn new(max_zip_size: u64) -> Self {
        Self { max_zip_size }
    }

    #[instrument(skip(self, zip_data))]
    pub async fn process_zip(&self, zip_data: &[u8]) -> Result<ArchiveInfo, HarnessError> {
        if zip_data.len() as u64 > self.max_zip_size {
            return Err(HarnessError::CodeTooLarge {
                size: zip_data.len() as u64,
                max_size: self.max_zip_size,
            });
        }

        let mut hasher = Sha256::new();
        hasher.update(zip_data);
        let sha256 = format!("{:x}", hasher.finalize());

        let mut archive = ZipArchive::new(std::io::Cursor::new(zip_data))
            .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

        let mut files = Vec::new();
        let mut total_size = 0;

        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

            total_size += file.size();
            files.push(ArchiveFileInfo {
                name: file.name().to_string(),
                size: file.size(),
                is_executable: file.unix_mode().map_or(false, |mode| mode & 0o111 != 0),
            });
        }

        info!(
            files = files.len(),
            total_size = total_size,
            sha256 = %sha256,
            "processed function archive"
        );

        Ok(ArchiveInfo {
            sha256,
            files,
            total_size,
            zip_data: zip_data.to_vec(),
        })
    }

    #[instrument(skip(self, zip_data))]
    pub async fn extract_to_directory(
        &self,
        zip_data: &[u8],
        target_dir: &std::path::Path,
    ) -> Result<(), HarnessError> {
        let mut archive = ZipArchive::new(std::io::Cursor::new(zip_data))
            .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

            let file_path = target_dir.join(file.name());

            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;
            }

            if file.name().ends_with('/') {
                std::fs::create_dir_all(&file_path)
                    .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;
                continue;
            }

            let mut file_data = Vec::new();
            file.read_to_end(&mut file_data)
                .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

            std::fs::write(&file_path, file_data)
                .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;

            // Preserve executable bits on install scripts and shims.
            if let Some(mode) = file.unix_mode() {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = std::fs::Permissions::from_mode(mode);
                    std::fs::set_permissions(&file_path, permissions)
                        .map_err(|e| HarnessError::InvalidZipFile { reason: e.to_string() })?;
                }
            }
        }

        info!(target_dir = %target_dir.display(), "extracted function archive");
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ArchiveInfo {
    pub sha256: String,
    pub files: Vec<ArchiveFileInfo>,
    pub total_size: u64,
    pub zip_data: Vec<u8>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ArchiveFileInfo {
    pub name: String,
    pub size: u64,
    pub is_executable: bool,
}
