//! The browser surface the scrape core depends on.
//!
//! [`PageDriver`] and [`ElementHandle`] cover everything the extractor and
//! collector need: navigation, CSS queries, text/attribute reads, clicks and a
//! scroll action. The chromiumoxide page implements them in
//! `crate::browser`; tests use the in-memory fake in [`fake`].

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub(crate) mod fake;

/// A handle to one live DOM element.
#[async_trait]
pub trait ElementHandle: Send + Sync + Sized {
    /// Rendered text of the element, `None` if the browser reports none.
    async fn inner_text(&self) -> Result<Option<String>>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// First descendant matching `selector`.
    async fn find(&self, selector: &str) -> Result<Option<Self>>;

    async fn click(&self) -> Result<()>;
}

/// A page that can be navigated, queried and scrolled.
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Element: ElementHandle;

    /// Navigate to `url` and wait until the network has gone quiet.
    async fn goto(&self, url: &str) -> Result<()>;

    /// First element matching `selector`.
    async fn find(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// All elements matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Scroll the document to its bottom edge.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Whether an element matching `selector` exists and is rendered visibly.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.find_all(selector).await?.len())
    }
}

/// Trimmed inner text, with empty or whitespace-only text treated as absent.
pub async fn text_of<E: ElementHandle>(element: &E) -> Result<Option<String>> {
    Ok(non_blank(element.inner_text().await?))
}

/// Trimmed attribute value, with empty values treated as absent.
pub async fn attribute_of<E: ElementHandle>(element: &E, name: &str) -> Result<Option<String>> {
    Ok(non_blank(element.attribute(name).await?))
}

/// Text of the first page element matching `selector`.
pub async fn page_text<P: PageDriver>(page: &P, selector: &str) -> Result<Option<String>> {
    match page.find(selector).await? {
        Some(element) => text_of(&element).await,
        None => Ok(None),
    }
}

/// Text of the first descendant of `element` matching `selector`.
pub async fn child_text<E: ElementHandle>(element: &E, selector: &str) -> Result<Option<String>> {
    match element.find(selector).await? {
        Some(child) => text_of(&child).await,
        None => Ok(None),
    }
}

/// Attribute of the first descendant of `element` matching `selector`.
pub async fn child_attribute<E: ElementHandle>(
    element: &E,
    selector: &str,
    name: &str,
) -> Result<Option<String>> {
    match element.find(selector).await? {
        Some(child) => attribute_of(&child, name).await,
        None => Ok(None),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  Title \n".to_string())), Some("Title".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(None), None);
    }
}
