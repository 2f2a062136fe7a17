/*
 * rss.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::{Accumulator, ElementValue};
use serde::Serialize;

/// One `<item>` of an RSS 2.0 feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub comments: String,
    pub description: String,
}

impl RssItem {
    /// Path of the items in a feed.
    pub const PATH: &'static str = "rss/channel/item";
}

/// Builds [`RssItem`]s. Items missing any of the five fields are skipped.
#[derive(Debug, Default)]
pub struct RssItemAccumulator {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    comments: Option<String>,
    description: Option<String>,
    /// An `<item>` closed; the next visit belongs to a new item.
    item_closed: bool,
}

impl RssItemAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accumulator for RssItemAccumulator {
    type Record = RssItem;

    fn visit(&mut self, element: ElementValue) {
        if self.item_closed {
            self.reset();
        }

        let slot = match element.name.as_str() {
            "item" => {
                self.item_closed = true;
                return;
            }
            "title" => &mut self.title,
            "link" => &mut self.link,
            "pubDate" => &mut self.pub_date,
            "comments" => &mut self.comments,
            "description" => &mut self.description,
            _ => return,
        };
        *slot = element.text;
    }

    fn can_produce(&self) -> bool {
        self.title.is_some()
            && self.link.is_some()
            && self.pub_date.is_some()
            && self.comments.is_some()
            && self.description.is_some()
    }

    fn produce(&mut self) -> RssItem {
        RssItem {
            title: self.title.take().unwrap_or_default(),
            link: self.link.take().unwrap_or_default(),
            pub_date: self.pub_date.take().unwrap_or_default(),
            comments: self.comments.take().unwrap_or_default(),
            description: self.description.take().unwrap_or_default(),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
