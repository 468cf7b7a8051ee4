use super::{bytes_part, path_part};
use crate::error::Result;
use crate::types::{File, RenameFileRequest};
use crate::QalpuchClient;
use reqwest::multipart;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Upload, inspection and download of stored files.
#[derive(Debug, Clone, Copy)]
pub struct Files<'a> {
    client: &'a QalpuchClient,
}

impl<'a> Files<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    /// Uploads in-memory contents as a multipart `file` field.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The file name reported to the server; also used to guess the mime type.
    /// * `contents` - The raw file contents.
    pub async fn upload(&self, file_name: &str, contents: impl Into<Vec<u8>>) -> Result<File> {
        let form = multipart::Form::new().part("file", bytes_part(file_name, contents.into())?);
        self.upload_form(form).await
    }

    /// Streams a local file to the server.
    ///
    /// `name`, when given, is sent as the `name` field and becomes the stored
    /// file name instead of the one on disk.
    pub async fn upload_path<P: AsRef<Path>>(&self, path: P, name: Option<&str>) -> Result<File> {
        let mut form = multipart::Form::new().part("file", path_part(path.as_ref()).await?);
        if let Some(name) = name {
            form = form.text("name", name.to_string());
        }
        self.upload_form(form).await
    }

    async fn upload_form(&self, form: multipart::Form) -> Result<File> {
        self.client.post_multipart("/files/upload", form).await
    }

    pub async fn get(&self, file_id: &str) -> Result<File> {
        self.client.get(&format!("/files/{}", file_id)).await
    }

    /// Lists the current user's files.
    pub async fn list(&self) -> Result<Vec<File>> {
        self.client.get("/files").await
    }

    pub async fn rename(&self, file_id: &str, new_name: &str) -> Result<File> {
        let request = RenameFileRequest { name: new_name };
        self.client.put(&format!("/files/{}", file_id), &request).await
    }

    pub async fn delete(&self, file_id: &str) -> Result<()> {
        self.client.delete(&format!("/files/{}", file_id)).await
    }

    /// Downloads the raw contents of a file.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        self.client
            .download(&format!("/files/{}/download", file_id))
            .await
    }

    /// Downloads a file and writes it to `dest`, creating parent directories.
    ///
    /// # Returns
    ///
    /// The path that was written.
    pub async fn download_to<P: AsRef<Path>>(&self, file_id: &str, dest: P) -> Result<PathBuf> {
        let dest = dest.as_ref();
        let content = self.download(file_id).await?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(dest).await?;
        file.write_all(&content).await?;
        file.flush().await?;

        Ok(dest.to_path_buf())
    }
}
