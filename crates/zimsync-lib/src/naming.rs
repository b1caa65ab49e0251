use crate::error::EntryError;
use url::Url;

/// Vendor prefix carried by some published archive names.
pub const VENDOR_PREFIX: &str = "openZIM_";

/// Maps an archive URL to the name it is stored under locally.
///
/// Takes the last path segment as-is (no percent-decoding) and strips
/// [`VENDOR_PREFIX`] once if the name starts with it. Never fails; a URL
/// without a usable segment yields an empty string.
pub fn local_file_name(url: &Url) -> String {
    let raw = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    raw.strip_prefix(VENDOR_PREFIX).unwrap_or(raw).to_string()
}

/// Like [`local_file_name`], but rejects names that cannot safely be joined
/// onto the output directory.
pub fn checked_file_name(url: &Url) -> Result<String, EntryError> {
    let name = local_file_name(url);

    let degenerate = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if degenerate {
        return Err(EntryError::NormalizationAnomaly {
            url: url.clone(),
            name,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_strips_vendor_prefix() {
        assert_eq!(
            local_file_name(&url("https://example.org/download/openZIM_wikipedia_en_all.zim")),
            "wikipedia_en_all.zim"
        );
    }

    #[test]
    fn test_strips_prefix_only_once() {
        assert_eq!(
            local_file_name(&url("https://example.org/openZIM_openZIM_x.zim")),
            "openZIM_x.zim"
        );
    }

    #[test]
    fn test_other_names_are_unchanged() {
        for name in [
            "wikipedia_en_all.zim",
            "my_openZIM_archive.zim",
            "openzim_lowercase.zim",
            "openZIM.zim",
        ] {
            let u = url(&format!("https://example.org/files/{name}"));
            assert_eq!(local_file_name(&u), name);
        }
    }

    #[test]
    fn test_ignores_query_and_fragment() {
        assert_eq!(
            local_file_name(&url("https://example.org/a/b.zim?mirror=1#top")),
            "b.zim"
        );
    }

    #[test]
    fn test_keeps_percent_encoding() {
        assert_eq!(
            local_file_name(&url("https://example.org/a/my%20file.zim")),
            "my%20file.zim"
        );
    }

    #[test]
    fn test_trailing_slash_yields_empty_name() {
        assert_eq!(local_file_name(&url("https://example.org/dir/")), "");
        assert!(matches!(
            checked_file_name(&url("https://example.org/dir/")),
            Err(EntryError::NormalizationAnomaly { .. })
        ));
    }

    #[test]
    fn test_bare_prefix_is_an_anomaly() {
        let err = checked_file_name(&url("https://example.org/openZIM_")).unwrap_err();
        match err {
            EntryError::NormalizationAnomaly { name, .. } => assert_eq!(name, ""),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encoded_separators_stay_encoded() {
        assert_eq!(
            checked_file_name(&url("https://example.org/a%5C..%2Fb.zim")).unwrap(),
            "a%5C..%2Fb.zim"
        );
    }

    #[test]
    fn test_dot_segments_collapse_to_empty_name() {
        assert!(checked_file_name(&url("https://example.org/files/..")).is_err());
    }

    #[test]
    fn test_non_hierarchical_url() {
        assert_eq!(local_file_name(&url("mailto:someone@example.org")), "");
    }
}
