use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::EffectError;

const PRODUCTS_ASSET: &str = include_str!("../assets/products.json");

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

/// `description` paragraphs are trusted markup and are rendered without
/// sanitizing; they must never come from user input.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub specs: Vec<SpecRow>,
}

#[derive(Deserialize)]
struct CatalogFile {
    products: Vec<ProductEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductCatalog {
    entries: Vec<ProductEntry>,
    by_name: HashMap<String, usize>,
}

impl ProductCatalog {
    pub fn load() -> Result<Self, EffectError> {
        Self::from_json(PRODUCTS_ASSET)
    }

    pub fn from_json(raw: &str) -> Result<Self, EffectError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_entries(file.products)
    }

    pub fn from_entries(entries: Vec<ProductEntry>) -> Result<Self, EffectError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(EffectError::Catalog("product with empty name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(EffectError::Catalog(format!("duplicate product {}", entry.name)));
            }
            if entry.images.iter().any(|path| path.trim().is_empty()) {
                return Err(EffectError::Catalog(format!("empty image path in {}", entry.name)));
            }
        }

        let by_name = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.name.clone(), index))
            .collect();

        Ok(Self { entries, by_name })
    }

    /// Card titles come from element text, so surrounding whitespace is ignored.
    pub fn get(&self, display_title: &str) -> Option<&ProductEntry> {
        self.by_name
            .get(display_title.trim())
            .and_then(|index| self.entries.get(*index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ProductEntry {
        ProductEntry {
            name: name.to_string(),
            images: vec!["a.jpg".to_string()],
            description: Vec::new(),
            specs: Vec::new(),
        }
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = ProductCatalog::load().expect("bundled catalog is valid");

        assert_eq!(catalog.len(), 7);
        assert!(catalog.names().any(|name| name == "Cattle Guard"));
    }

    #[test]
    fn green_guard_has_configured_content() {
        let catalog = ProductCatalog::load().expect("bundled catalog is valid");
        let product = catalog
            .get("Green Guard-Mosquito Trapper")
            .expect("product exists");

        assert_eq!(product.images.len(), 5);
        assert_eq!(product.description.len(), 7);
        assert!(product.specs.is_empty());
    }

    #[test]
    fn spec_rows_keep_their_order() {
        let catalog = ProductCatalog::from_json(
            r#"{ "products": [{ "name": "Bench Rig", "specs": [
                { "label": "Voltage", "value": "5 V" },
                { "label": "Weight", "value": "120 g" }
            ] }] }"#,
        )
        .expect("specs parse");
        let product = catalog.get("Bench Rig").expect("product exists");

        let labels: Vec<&str> = product.specs.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, ["Voltage", "Weight"]);
    }

    #[test]
    fn lookup_ignores_title_whitespace() {
        let catalog = ProductCatalog::load().expect("bundled catalog is valid");

        assert!(catalog.get("\n  Smart Socket  ").is_some());
        assert!(catalog.get("Hover Board").is_none());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = ProductCatalog::from_json(r#"{ "products": [{ "name": "Solo" }] }"#)
            .expect("sections are optional");
        let product = catalog.get("Solo").expect("product exists");

        assert!(product.images.is_empty());
        assert!(product.description.is_empty());
        assert!(product.specs.is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = ProductCatalog::from_entries(vec![entry("Herd-I-Tech"), entry("Herd-I-Tech")]);

        assert!(matches!(result, Err(EffectError::Catalog(_))));
    }

    #[test]
    fn blank_image_paths_are_rejected() {
        let mut broken = entry("Travel Friend");
        broken.images.push("  ".to_string());

        assert!(ProductCatalog::from_entries(vec![broken]).is_err());
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        let result = ProductCatalog::from_json("{ products: ");

        assert!(matches!(result, Err(EffectError::CatalogFormat(_))));
    }
}
