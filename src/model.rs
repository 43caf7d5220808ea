//! Product data model
//!
//! `ProductAttributes` is what the extractor reads off a detail page, with
//! every scalar kept as present or absent. `ProductRecord` is the flattened
//! output unit written to the JSON document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Size label -> price; `None` when the page shows no price for that size
pub type Packaging = BTreeMap<String, Option<f64>>;

/// Attributes extracted from a single product detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub cas: Option<String>,
    pub structure: Option<String>,
    pub smiles: Option<String>,
    pub description: Option<String>,
    pub molecular_weight: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub safety_sheet_url: Option<String>,
    pub synonyms: Vec<String>,
    pub packaging: Packaging,
}

impl ProductAttributes {
    /// Identifier, or an empty string when the page carried none
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Collapses the attribute bag and the asset results into an output record
    pub fn into_record(self, image_path: Option<&Path>, un_number: Option<String>) -> ProductRecord {
        ProductRecord {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            cas: self.cas.unwrap_or_default(),
            structure: self.structure.unwrap_or_default(),
            smiles: self.smiles.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            molecular_weight: self.molecular_weight.unwrap_or_default(),
            url: self.url,
            image_path: image_path
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            img: self.image_url.unwrap_or_default(),
            pdf_msds: self.safety_sheet_url.unwrap_or_default(),
            synonyms: self.synonyms,
            packaging: self.packaging,
            un_number,
        }
    }
}

/// One product as written to the products document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "CAS")]
    pub cas: String,
    pub structure: String,
    pub smiles: String,
    pub description: String,
    pub molecular_weight: String,
    pub url: String,
    pub image_path: String,
    pub img: String,
    pub pdf_msds: String,
    pub synonyms: Vec<String>,
    pub packaging: Packaging,
    pub un_number: Option<String>,
}
