//! Listing entry to [`VideoRecord`] conversion.
//!
//! Each field is read independently; a missing sub-element leaves that field
//! `None` and the remaining fields are still captured. Only browser protocol
//! failures are errors.

use futures::future::try_join_all;

use crate::dom::{child_attribute, child_text, ElementHandle};
use crate::error::Result;
use crate::models::VideoRecord;

use super::Selectors;

pub async fn map_item<E: ElementHandle>(item: &E, selectors: &Selectors) -> Result<VideoRecord> {
    Ok(VideoRecord {
        title: child_text(item, &selectors.item_title).await?,
        thumbnail: child_attribute(item, &selectors.item_thumbnail, "src").await?,
        url: child_attribute(item, &selectors.item_link, "href").await?,
        views: child_text(item, &selectors.item_views).await?,
        upload_date: child_text(item, &selectors.item_upload_date).await?,
    })
}

/// Map every entry concurrently, preserving listing order.
pub async fn map_items<E: ElementHandle>(items: &[E], selectors: &Selectors) -> Result<Vec<VideoRecord>> {
    try_join_all(items.iter().map(|item| map_item(item, selectors))).await
}
