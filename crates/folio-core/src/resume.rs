#![forbid(unsafe_code)]

//! Resume download link rewriting.

use std::sync::LazyLock;

use regex::Regex;

const DRIVE_HOST: &str = "drive.google.com";

static FILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([^/]+)").expect("file id pattern is a valid regex"));

/// File identifier embedded in a sharing link: the text between `/d/` and
/// the next `/` (or the end of the link).
#[must_use]
pub fn extract_file_id(link: &str) -> Option<&str> {
    FILE_ID_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Direct-download URL for a Drive sharing link.
#[must_use]
pub fn direct_download_url(link: &str) -> Option<String> {
    if !link.contains(DRIVE_HOST) {
        return None;
    }
    extract_file_id(link).map(|id| format!("https://{DRIVE_HOST}/uc?export=download&id={id}"))
}

/// URL to open for `link`: the direct-download form when the identifier can
/// be extracted, the original link otherwise.
#[must_use]
pub fn resolve_download_url(link: &str) -> String {
    match direct_download_url(link) {
        Some(url) => url,
        None => {
            tracing::debug!(target: "folio.resume", link, "no file id; opening link as-is");
            link.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_sharing_link() {
        assert_eq!(
            resolve_download_url(
                "https://drive.google.com/file/d/1mQsFi6SLc5CcW5IIb5jMJ9AoDXR1DCzs/view?usp=sharing"
            ),
            "https://drive.google.com/uc?export=download&id=1mQsFi6SLc5CcW5IIb5jMJ9AoDXR1DCzs"
        );
    }

    #[test]
    fn id_may_end_the_link() {
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/abc123"),
            Some("abc123")
        );
    }

    #[test]
    fn falls_back_to_original() {
        let link = "https://drive.google.com/drive/folders/xyz";
        assert_eq!(resolve_download_url(link), link);
        let other = "https://example.com/file/d/abc/view";
        assert_eq!(resolve_download_url(other), other);
    }

    #[test]
    fn empty_id_segment_does_not_match() {
        assert_eq!(extract_file_id("https://drive.google.com/file/d//view"), None);
    }
}
