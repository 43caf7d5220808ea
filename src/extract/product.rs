//! Product detail page extraction

use super::packaging::extract_packaging;
use super::{full_text, resolve_link, select_all, select_first, stripped_text};
use crate::model::ProductAttributes;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use url::Url;

const LABEL_CAS: &str = "CAS number:";
const LABEL_SMILES: &str = "Smiles:";
const LABEL_DESCRIPTION: &str = "Description:";
const LABEL_MOLECULAR_WEIGHT: &str = "Molecular weight:";
const SYNONYMS_LABEL: &str = "Synonyms:";
const STRUCTURE_ALT_PREFIX: &str = "Structural formula of ";

/// Extracts all product attributes from a detail page
///
/// Extraction never fails: anything the page does not carry is left absent.
/// Running it twice on the same body yields the same attributes.
///
/// # Arguments
///
/// * `html` - The detail page body
/// * `source_url` - URL the page was fetched from; relative asset links are
///   resolved against it
pub fn extract_product(html: &str, source_url: &str) -> ProductAttributes {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let base_url = Url::parse(source_url).ok();

    let mut properties = extract_properties(root);
    let structure_img = select_first(root, ".prod-structure img");

    ProductAttributes {
        id: select_first(root, "span.sku").map(|e| full_text(e).trim().to_string()),
        name: select_first(root, "h1.product-title").map(|e| full_text(e).trim().to_string()),
        cas: properties.remove(LABEL_CAS),
        structure: structure_img
            .and_then(|img| img.value().attr("alt"))
            .map(|alt| alt.strip_prefix(STRUCTURE_ALT_PREFIX).unwrap_or(alt).to_string()),
        smiles: properties.remove(LABEL_SMILES),
        description: properties.remove(LABEL_DESCRIPTION),
        molecular_weight: properties.remove(LABEL_MOLECULAR_WEIGHT),
        url: source_url.to_string(),
        image_url: structure_img
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_link(src, base_url.as_ref())),
        safety_sheet_url: select_first(root, r#"a[href*=".pdf"]"#)
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(href, base_url.as_ref())),
        synonyms: select_first(root, "div.product-prop.product-prop-synonyms")
            .map(|block| parse_synonyms(&stripped_text(block)))
            .unwrap_or_default(),
        packaging: extract_packaging(root),
    }
}

/// Builds the label -> value map from every `div.product-prop`
fn extract_properties(root: ElementRef<'_>) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for prop in select_all(root, "div.product-prop") {
        let Some(label) = select_first(prop, "span.prop-label") else {
            continue;
        };
        let label = full_text(label).trim().to_string();
        let value = stripped_text(prop)
            .replace(&label, "")
            .trim_matches(':')
            .trim()
            .to_string();
        properties.insert(label, value);
    }

    properties
}

/// Splits the synonyms block into individual names
///
/// The `Synonyms:` label is removed, the rest is split on commas and every
/// piece is trimmed; empty pieces are dropped.
pub fn parse_synonyms(text: &str) -> Vec<String> {
    text.replace(SYNONYMS_LABEL, "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
