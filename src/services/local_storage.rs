use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

use crate::{
    application::services::StorageService,
    domain::{config::connection::LocalSettings, models::file::StoredObjectReference},
    services::error::StorageError,
};

/// Stores objects as files under `{root}/{container}/`.
pub struct LocalStorageService {
    root: PathBuf,
    container: String,
    public_url: Option<String>,
}

impl LocalStorageService {
    pub fn new(settings: LocalSettings, container: String) -> Self {
        Self {
            root: PathBuf::from(settings.path),
            container,
            public_url: settings.public_url,
        }
    }

    fn container_dir(&self) -> PathBuf {
        self.root.join(&self.container)
    }

    async fn object_url(&self, name: &str, path: &Path) -> String {
        match self.public_url {
            Some(ref base) => format!("{}/{}/{}", base, self.container, name),
            None => {
                let absolute = fs::canonicalize(path)
                    .await
                    .unwrap_or_else(|_| path.to_path_buf());
                format!("file://{}", absolute.display())
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(StorageError::InternalError(format!(
            "Invalid object name: {}",
            name
        )));
    }
    Ok(())
}

#[async_trait]
impl StorageService for LocalStorageService {
    fn container(&self) -> &str {
        &self.container
    }

    async fn create_object(
        &self,
        name: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<StoredObjectReference, StorageError> {
        validate_name(name)?;

        let dir = self.container_dir();
        fs::create_dir_all(&dir).await?;

        let path = dir.join(name);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
                _ => StorageError::from(e),
            })?;

        let written = async {
            file.write_all(&bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            warn!("Removing partially written object {}: {}", path.display(), e);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        info!("Stored {} bytes at {}", bytes.len(), path.display());

        Ok(StoredObjectReference {
            name: name.to_string(),
            container: self.container.clone(),
            url: self.object_url(name, &path).await,
        })
    }
}
