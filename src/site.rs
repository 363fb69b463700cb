use crate::errors::AppError;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Maps a request path onto a file below `root`. Returns `None` for paths
/// that try to leave the root.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let mut path = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if decoded.is_empty() || decoded.ends_with('/') {
        path.push("index.html");
    }
    Some(path)
}

/// Reads a site file, falling back to `index.html` for directories.
pub async fn load_file(path: &Path) -> Result<(PathBuf, Vec<u8>), AppError> {
    let path = match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => path.join("index.html"),
        Ok(_) => path.to_path_buf(),
        Err(err) => return Err(err.into()),
    };
    let bytes = fs::read(&path).await?;
    Ok((path, bytes))
}

pub fn is_html(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("html" | "htm"))
}

pub fn content_type(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_index_for_root_and_trailing_slash() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_request_path(root, "/"),
            Some(PathBuf::from("/srv/site/index.html"))
        );
        assert_eq!(
            resolve_request_path(root, "/blog/"),
            Some(PathBuf::from("/srv/site/blog/index.html"))
        );
        assert_eq!(
            resolve_request_path(root, "/about.html"),
            Some(PathBuf::from("/srv/site/about.html"))
        );
    }

    #[test]
    fn decodes_percent_escapes() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_request_path(root, "/my%20page.html"),
            Some(PathBuf::from("/srv/site/my page.html"))
        );
    }

    #[test]
    fn rejects_traversal() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_request_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/a/%2E%2E/%2E%2E/secret"), None);
    }

    #[test]
    fn picks_content_types() {
        assert!(is_html(Path::new("index.HTML")));
        assert!(!is_html(Path::new("style.css")));
        assert_eq!(content_type(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
