//! Navigation tab discovery by label.

use serde::{Deserialize, Serialize};

use crate::dom::{text_of, PageDriver};
use crate::error::Result;

/// Accepted labels for one tab, compared trimmed and case-insensitively.
///
/// Locales are added by extending the label list in config, e.g.
/// `videos_tab = ["videos", "vídeos", "vidéos"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelMatcher {
    labels: Vec<String>,
}

impl LabelMatcher {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for label in labels {
            let label = normalize_label(label.as_ref());
            if !label.is_empty() && !normalized.contains(&label) {
                normalized.push(label);
            }
        }
        Self { labels: normalized }
    }

    /// Default matcher for the channel "About" tab.
    pub fn about() -> Self {
        Self::new(["about", "sobre"])
    }

    /// Default matcher for the channel "Videos" tab.
    pub fn videos() -> Self {
        Self::new(["videos", "vídeos"])
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = normalize_label(label);
        self.labels.iter().any(|l| *l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl From<Vec<String>> for LabelMatcher {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<LabelMatcher> for Vec<String> {
    fn from(matcher: LabelMatcher) -> Self {
        matcher.labels
    }
}

pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Find the first tab label element whose text satisfies `matcher`.
///
/// Returns the tab's position among all tab labels together with its handle.
pub async fn find_tab<P: PageDriver>(
    page: &P,
    tab_selector: &str,
    matcher: &LabelMatcher,
) -> Result<Option<(usize, P::Element)>> {
    let tabs = page.find_all(tab_selector).await?;
    for (index, tab) in tabs.into_iter().enumerate() {
        if let Some(label) = text_of(&tab).await? {
            if matcher.matches(&label) {
                return Ok(Some((index, tab)));
            }
        }
    }
    tracing::debug!("No tab labelled any of {:?}", matcher.labels());
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::{FakeNode, FakePage};

    #[test]
    fn matches_case_and_whitespace_insensitively() {
        let matcher = LabelMatcher::videos();
        assert!(matcher.matches("VIDEOS"));
        assert!(matcher.matches("  Vídeos\n"));
        assert!(!matcher.matches("Shorts"));
        assert!(!matcher.matches("video"));
    }

    #[test]
    fn extra_locale_can_be_added() {
        let matcher = LabelMatcher::new(["about", "sobre", "À propos"]);
        assert!(matcher.matches("à propos"));
        assert!(matcher.matches("Sobre"));
        assert_eq!(matcher.labels().len(), 3);
    }

    #[test]
    fn new_deduplicates_and_skips_blank() {
        let matcher = LabelMatcher::new(["About", "about ", "", "  "]);
        assert_eq!(matcher.labels().to_vec(), vec!["about".to_string()]);
    }

    #[test]
    fn deserializes_from_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            tab: LabelMatcher,
        }
        let wrapper: Wrapper = toml::from_str(r#"tab = ["Videos", "Vidéos"]"#).unwrap();
        assert!(wrapper.tab.matches("vidéos"));
    }

    #[tokio::test]
    async fn find_tab_reports_index() {
        let page = FakePage::builder()
            .tab(FakeNode::text("Home"))
            .tab(FakeNode::text("Videos"))
            .tab(FakeNode::text("About"))
            .build();
        let selectors = crate::scrape::Selectors::default();

        let (index, _) = find_tab(&page, &selectors.tab_labels, &LabelMatcher::about())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index, 2);

        let missing = find_tab(&page, &selectors.tab_labels, &LabelMatcher::new(["community"]))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
