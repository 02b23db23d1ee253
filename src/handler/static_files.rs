//! Static file serving module
//!
//! Resolves request paths against the serve root, keeps resolution contained
//! within it, and serves files, index pages, or generated directory listings.

use crate::config::ServeConfig;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve the request path from the configured root.
///
/// Filesystem errors map to per-request status codes; nothing here can take
/// the server down.
pub async fn serve(
    config: &ServeConfig,
    request_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let decoded = percent_decode(request_path);
    let Some(fs_path) = resolve_path(&config.root, &decoded) else {
        return http::build_404_response();
    };

    let metadata = match fs::metadata(&fs_path).await {
        Ok(m) => m,
        Err(e) => return error_response(&fs_path, &e),
    };

    if metadata.is_dir() {
        // Relative links inside a listing or index page only resolve when the
        // directory URL ends with a slash
        if !decoded.ends_with('/') {
            return http::build_redirect_response(&format!("{request_path}/"));
        }
        serve_dir(&fs_path, &decoded, is_head).await
    } else {
        serve_file_at(&fs_path, is_head).await
    }
}

/// Resolve a request path against the serve root without escaping it.
///
/// `..` components are rejected before touching the filesystem; existing
/// paths are then canonicalized and must stay under the (already canonical)
/// root, which also blocks traversal through symlinks.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let candidate = Path::new(relative);

    let escapes = candidate.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return None;
    }

    let joined = root.join(candidate);
    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Some(canonical),
        Ok(canonical) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                canonical.display()
            ));
            None
        }
        // Path does not exist; `..` was already rejected, so it cannot point
        // outside the root. Metadata lookup turns it into a 404.
        Err(_) => Some(joined),
    }
}

async fn serve_file_at(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::content_type(path.extension().and_then(|e| e.to_str()));
            http::response::build_file_response(Bytes::from(content), content_type, is_head)
        }
        Err(e) => error_response(path, &e),
    }
}

async fn serve_dir(dir: &Path, request_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    for index in INDEX_FILES {
        let candidate = dir.join(index);
        if let Ok(meta) = fs::metadata(&candidate).await {
            if meta.is_file() {
                return serve_file_at(&candidate, is_head).await;
            }
        }
    }

    match render_listing(dir, request_path).await {
        Ok(html) => http::response::build_html_response(html, is_head),
        Err(e) => error_response(dir, &e),
    }
}

/// Map a filesystem error to the matching status code
fn error_response(path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        // InvalidInput covers malformed request paths (e.g. embedded NUL
        // bytes after percent-decoding); the client sent garbage, the
        // server is fine
        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {}", path.display(), err));
            http::build_500_response()
        }
    }
}

/// Generate an HTML index for a directory: name-sorted entries, trailing
/// slash on subdirectories, parent link above the root's children.
async fn render_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        if is_dir {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let title = format!("Directory listing for {}", escape_html(request_path));
    let mut html = String::with_capacity(512 + names.len() * 64);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    if request_path != "/" {
        html.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for name in &names {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_href(name),
            escape_html(name)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Decode %XX escapes in a request path; invalid sequences pass through
/// unchanged.
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a listing entry name for use in an href.
fn encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::fs as std_fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    /// Fresh serve root under the OS temp directory
    fn temp_root(label: &str) -> PathBuf {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "isoserve-test-{label}-{}-{seq}",
            std::process::id()
        ));
        std_fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    fn config_for(root: PathBuf) -> ServeConfig {
        ServeConfig { root, port: 8000 }
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn serves_existing_file_bytes() {
        let root = temp_root("file");
        std_fs::write(root.join("shader.wgsl"), b"@vertex fn vs() {}").unwrap();

        let resp = serve(&config_for(root), "/shader.wgsl", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/wgsl");
        assert_eq!(body_of(resp).await.as_ref(), b"@vertex fn vs() {}");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let root = temp_root("missing");
        let resp = serve(&config_for(root), "/nope.html", false).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn head_omits_body_but_keeps_length() {
        let root = temp_root("head");
        std_fs::write(root.join("app.js"), b"export {}").unwrap();

        let resp = serve(&config_for(root), "/app.js", true).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "9");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn traversal_cannot_escape_root() {
        let outer = temp_root("outer");
        std_fs::write(outer.join("secret.txt"), b"secret").unwrap();
        let root = outer.join("public");
        std_fs::create_dir_all(&root).unwrap();

        let cfg = config_for(root.canonicalize().unwrap());
        for path in ["/../secret.txt", "/../../etc/passwd", "/%2e%2e/secret.txt"] {
            let resp = serve(&cfg, path, false).await;
            assert_eq!(resp.status(), 404, "path {path} must not resolve");
        }
    }

    #[tokio::test]
    async fn directory_without_slash_redirects() {
        let root = temp_root("redirect");
        std_fs::create_dir_all(root.join("assets")).unwrap();

        let resp = serve(&config_for(root), "/assets", false).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["Location"], "/assets/");
    }

    #[tokio::test]
    async fn directory_listing_names_entries() {
        let root = temp_root("listing");
        std_fs::write(root.join("a.txt"), b"a").unwrap();
        std_fs::create_dir_all(root.join("sub")).unwrap();

        let resp = serve(&config_for(root), "/", false).await;
        assert_eq!(resp.status(), 200);
        let html = String::from_utf8(body_of(resp).await.to_vec()).unwrap();
        assert!(html.contains("a.txt"));
        assert!(html.contains("sub/"));
    }

    #[tokio::test]
    async fn index_html_takes_precedence_over_listing() {
        let root = temp_root("index");
        std_fs::write(root.join("index.html"), b"<p>home</p>").unwrap();
        std_fs::write(root.join("other.txt"), b"x").unwrap();

        let resp = serve(&config_for(root), "/", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_of(resp).await.as_ref(), b"<p>home</p>");
    }

    #[tokio::test]
    async fn nul_byte_in_path_is_a_client_error() {
        let root = temp_root("nul");
        let resp = serve(&config_for(root), "/%00", false).await;
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn fs_errors_map_to_matching_status_codes() {
        let path = Path::new("irrelevant");
        let cases = [
            (io::ErrorKind::NotFound, 404),
            (io::ErrorKind::InvalidInput, 404),
            (io::ErrorKind::PermissionDenied, 403),
            (io::ErrorKind::InvalidData, 500),
        ];
        for (kind, status) in cases {
            let resp = error_response(path, &io::Error::from(kind));
            assert_eq!(resp.status(), status, "{kind:?}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_403() {
        use std::os::unix::fs::PermissionsExt;

        let root = temp_root("perm");
        let file = root.join("locked.txt");
        std_fs::write(&file, b"hidden").unwrap();
        std_fs::set_permissions(&file, std_fs::Permissions::from_mode(0o000)).unwrap();

        // Root reads regardless of mode bits; nothing to assert there
        if std_fs::read(&file).is_ok() {
            return;
        }

        let resp = serve(&config_for(root), "/locked.txt", false).await;
        assert_eq!(resp.status(), 403);
    }

    #[test]
    fn resolve_rejects_parent_components() {
        let root = std::env::temp_dir().canonicalize().unwrap();
        assert!(resolve_path(&root, "/../etc/passwd").is_none());
        assert!(resolve_path(&root, "/a/../../b").is_none());
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("/a%20b.txt"), "/a b.txt");
        assert_eq!(percent_decode("/%2e%2e/x"), "/../x");
        assert_eq!(percent_decode("/literal%zz"), "/literal%zz");
        assert_eq!(percent_decode("/trailing%2"), "/trailing%2");
    }

    #[test]
    fn href_encoding_and_html_escaping() {
        assert_eq!(encode_href("a b/"), "a%20b/");
        assert_eq!(escape_html("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }
}
