//! Scraping *spec* for the listing (directory) page.
//!
//! Purpose:
//! - Find the table whose class equals `DirectoryContract::table_class`.
//! - For every `<tbody>` row holding a link, emit `(absolute url, link text)`.
//!
//! Rows without an `<a href>` are skipped. A listing with no link rows at all is
//! treated as a structure failure: the page changed, not "zero entities".

use crate::core::html::{attr_value, elements_ci, find_by_class, opener, text_of};
use crate::core::net::{absolute_url, PageSource};
use crate::error::{Error, Result};

use super::DirectoryContract;

/// One tracked entity and the page holding its history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityLink {
    pub url: String,
    pub name: String,
}

pub fn fetch(
    source: &dyn PageSource,
    url: &str,
    origin: &str,
    contract: &DirectoryContract,
) -> Result<Vec<EntityLink>> {
    let doc = source.get(url)?;
    let t = std::time::Instant::now();
    let links = parse_doc(&doc, url, origin, contract)?;
    logd!("Directory: parsed {} links in {:?}", links.len(), t.elapsed());
    Ok(links)
}

/// Split out for unit tests. `url` is only used in error messages.
pub fn parse_doc(
    doc: &str,
    url: &str,
    origin: &str,
    contract: &DirectoryContract,
) -> Result<Vec<EntityLink>> {
    let table = find_by_class(doc, "table", &contract.table_class)
        .ok_or_else(|| Error::missing("directory table", url))?;
    let tbody = elements_ci(table, "tbody")
        .into_iter()
        .next()
        .ok_or_else(|| Error::missing("directory table body", url))?;

    let mut out = Vec::new();
    for tr in elements_ci(tbody, "tr") {
        let Some(a) = elements_ci(tr, "a").into_iter().next() else { continue };
        let Some(href) = attr_value(opener(a), "href") else { continue };
        if href.trim().is_empty() { continue; }

        out.push(EntityLink {
            url: absolute_url(origin, &href),
            name: text_of(a),
        });
    }

    if out.is_empty() {
        return Err(Error::missing("directory link rows", url));
    }
    Ok(out)
}
