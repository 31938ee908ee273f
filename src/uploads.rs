/// Disk storage for uploaded images (profile pictures, doctor photos).
///
/// Files are written under the configured upload directory with a UUID
/// prefix and served back through the `/uploads` static route.
use crate::error::{ClinicError, ClinicResult};
use std::path::Path;
use uuid::Uuid;

/// Save uploaded bytes and return the public path (`/uploads/<file>`).
pub async fn save_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> ClinicResult<String> {
    tokio::fs::create_dir_all(dir).await?;

    let safe_name = sanitize_filename(original_name);
    let stored_name = format!("{}_{}", Uuid::new_v4(), safe_name);

    let path = dir.join(&stored_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ClinicError::Internal(format!("Failed to store upload: {}", e)))?;

    Ok(format!("/uploads/{}", stored_name))
}

/// Keep only filename-safe characters; path separators must not survive.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn save_writes_file_and_returns_public_path() {
        let tmp = tempfile::tempdir().unwrap();
        let public = save_upload(tmp.path(), "me.png", b"fake-png").await.unwrap();
        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with("me.png"));

        let stored = tmp.path().join(public.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), b"fake-png");
    }
}
