//! Finds archive links on an index page.

use crate::error::ZimSyncError;
use crate::remote::Remote;
use scraper::{Html, Selector};
use url::Url;

pub const ARCHIVE_SUFFIX: &str = ".zim";

/// Returns every `<a href>` on the page whose resolved path ends in
/// [`ARCHIVE_SUFFIX`], in document order. Duplicates are kept.
pub fn extract_archive_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&anchors)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| match base.join(href.trim()) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::debug!(href, error = %err, "Ignoring unresolvable link");
                None
            }
        })
        .filter(|url| url.path().ends_with(ARCHIVE_SUFFIX))
        .collect()
}

/// Fetches the index page and extracts its archive links.
///
/// Any failure here is fatal to the run: without a listing there is
/// nothing to reconcile.
pub async fn fetch_listing<R: Remote>(remote: &R, index_url: &Url) -> Result<Vec<Url>, ZimSyncError> {
    let html = remote
        .fetch_page(index_url)
        .await
        .map_err(|e| ZimSyncError::Discovery {
            url: index_url.clone(),
            reason: e.to_string(),
        })?;

    Ok(extract_archive_links(&html, index_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeRemote;

    const INDEX: &str = "https://mirror.example/download/";

    fn base() -> Url {
        Url::parse(INDEX).unwrap()
    }

    fn as_strings(urls: &[Url]) -> Vec<&str> {
        urls.iter().map(Url::as_str).collect()
    }

    #[test]
    fn test_resolves_relative_links_in_document_order() {
        let html = r#"
            <html><body>
              <a href="b.zim">b</a>
              <a href="/other/a.zim">a</a>
              <a href="https://cdn.example/c.zim">c</a>
              <a href="../up.zim">up</a>
            </body></html>
        "#;

        assert_eq!(
            as_strings(&extract_archive_links(html, &base())),
            vec![
                "https://mirror.example/download/b.zim",
                "https://mirror.example/other/a.zim",
                "https://cdn.example/c.zim",
                "https://mirror.example/up.zim",
            ]
        );
    }

    #[test]
    fn test_filters_non_archive_links() {
        let html = r#"
            <a href="readme.txt">readme</a>
            <a href="a.zim.torrent">torrent</a>
            <a href="a.zim.sha256">checksum</a>
            <a href="subdir/">dir</a>
            <a>no href</a>
            <link href="style.zim">
            <a href="keep.zim">keep</a>
        "#;

        assert_eq!(
            as_strings(&extract_archive_links(html, &base())),
            vec!["https://mirror.example/download/keep.zim"]
        );
    }

    #[test]
    fn test_query_string_does_not_hide_archive_path() {
        let html = r#"<a href="a.zim?download=1">a</a><a href="get?file=b.zim">b</a>"#;

        assert_eq!(
            as_strings(&extract_archive_links(html, &base())),
            vec!["https://mirror.example/download/a.zim?download=1"]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let html = r#"<a href="a.zim">a</a><a href="a.zim">again</a>"#;
        assert_eq!(extract_archive_links(html, &base()).len(), 2);
    }

    #[test]
    fn test_entities_in_href_are_decoded() {
        let html = r#"<a href="a.zim?x=1&amp;y=2">a</a>"#;
        assert_eq!(
            as_strings(&extract_archive_links(html, &base())),
            vec!["https://mirror.example/download/a.zim?x=1&y=2"]
        );
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        assert!(extract_archive_links("", &base()).is_empty());
        assert!(extract_archive_links("<html><p>nothing here</p></html>", &base()).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let remote = FakeRemote::new().with_page(INDEX, r#"<a href="openZIM_a.zim">a</a>"#);
        let listing = fetch_listing(&remote, &base()).await.unwrap();
        assert_eq!(
            as_strings(&listing),
            vec!["https://mirror.example/download/openZIM_a.zim"]
        );
    }

    #[tokio::test]
    async fn test_unreachable_index_is_a_discovery_failure() {
        let remote = FakeRemote::new();
        assert!(matches!(
            fetch_listing(&remote, &base()).await,
            Err(ZimSyncError::Discovery { .. })
        ));
    }
}
