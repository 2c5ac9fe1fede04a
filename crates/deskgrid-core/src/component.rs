//! Component catalog supplied by the host.
//!
//! Components are read-only catalog entries. Widgets reference them by id and
//! may outlive them, in which case the widget renders as missing.

use serde::{Deserialize, Serialize};

/// Usage tag for components that may be placed on the desktop surface.
pub const DESKTOP_USAGE: &str = "desktop";

/// Size used when a component does not recommend one.
pub const DEFAULT_COMPONENT_SIZE: RecommendedSize = RecommendedSize {
    width: 300,
    height: 200,
};

/// Identifier of a catalog component.
pub type ComponentId = String;

/// Preferred widget size for a component, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSize {
    pub width: i32,
    pub height: i32,
}

/// A catalog entry describing embeddable widget content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    /// Content locator loaded into the widget's web view.
    #[serde(default)]
    pub url: Option<String>,
    /// Alternate locator used by older component manifests.
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub recommended_size: Option<RecommendedSize>,
    /// JSON schema handed to the settings surface, passed through untouched.
    #[serde(default)]
    pub config_schema: Option<serde_json::Value>,
    /// Surface the component is meant for (e.g. `"desktop"`).
    #[serde(default)]
    pub usage: Option<String>,
    /// Place one instance automatically the first time this component is seen.
    #[serde(default)]
    pub auto_insert: bool,
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            entry: None,
            recommended_size: None,
            config_schema: None,
            usage: Some(DESKTOP_USAGE.to_string()),
            auto_insert: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.recommended_size = Some(RecommendedSize { width, height });
        self
    }

    pub fn with_usage(mut self, usage: Option<&str>) -> Self {
        self.usage = usage.map(str::to_string);
        self
    }

    pub fn with_auto_insert(mut self, auto_insert: bool) -> Self {
        self.auto_insert = auto_insert;
        self
    }

    /// Recommended size, or `fallback` when the component declares none.
    pub fn size_or(&self, fallback: RecommendedSize) -> RecommendedSize {
        self.recommended_size.unwrap_or(fallback)
    }

    /// Locator for the content, preferring `url` over `entry`.
    pub fn locator(&self) -> Option<&str> {
        self.url.as_deref().or(self.entry.as_deref())
    }

    pub fn is_for_desktop(&self) -> bool {
        self.usage.as_deref() == Some(DESKTOP_USAGE)
    }
}

/// Sort order offered by the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Order in which the host listed the components.
    #[default]
    Catalog,
    NameAscending,
    NameDescending,
}

impl SortOrder {
    /// Cycle to the next sort order.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Catalog => SortOrder::NameAscending,
            SortOrder::NameAscending => SortOrder::NameDescending,
            SortOrder::NameDescending => SortOrder::Catalog,
        }
    }
}

/// The components offered on the desktop surface.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    components: Vec<Component>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a host listing, keeping desktop components only.
    pub fn from_listing(listing: Vec<Component>) -> Self {
        let total = listing.len();
        let components: Vec<Component> = listing.into_iter().filter(Component::is_for_desktop).collect();
        log::debug!("Catalog: {} of {} components are for the desktop", components.len(), total);
        Self { components }
    }

    /// Resolve a widget's component reference, by id first and then by name.
    pub fn resolve(&self, id: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.components.iter().find(|c| c.name == id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components whose name contains `query` (case-insensitive), in `order`.
    pub fn search(&self, query: &str, order: SortOrder) -> Vec<&Component> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<&Component> = self
            .components
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect();
        match order {
            SortOrder::Catalog => {}
            SortOrder::NameAscending => found.sort_by_key(|c| c.name.to_lowercase()),
            SortOrder::NameDescending => {
                found.sort_by_key(|c| c.name.to_lowercase());
                found.reverse();
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Component> {
        vec![
            Component::new("clock", "Clock").with_size(200, 100),
            Component::new("notes", "Notes"),
            Component::new("tray", "Tray").with_usage(Some("sidebar")),
            Component::new("weather", "Weather").with_usage(None),
        ]
    }

    #[test]
    fn test_catalog_keeps_desktop_components() {
        let catalog = ComponentCatalog::from_listing(listing());
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("clock"));
        assert!(!catalog.contains("tray"));
        assert!(!catalog.contains("weather"));
    }

    #[test]
    fn test_resolve_by_id_then_name() {
        let catalog = ComponentCatalog::from_listing(listing());
        assert_eq!(catalog.resolve("notes").map(|c| c.name.as_str()), Some("Notes"));
        assert_eq!(catalog.resolve("Clock").map(|c| c.id.as_str()), Some("clock"));
        assert!(catalog.resolve("missing").is_none());
    }

    #[test]
    fn test_size_falls_back() {
        let catalog = ComponentCatalog::from_listing(listing());
        let clock = catalog.resolve("clock").unwrap();
        assert_eq!(
            clock.size_or(DEFAULT_COMPONENT_SIZE),
            RecommendedSize { width: 200, height: 100 }
        );
        let notes = catalog.resolve("notes").unwrap();
        assert_eq!(notes.size_or(DEFAULT_COMPONENT_SIZE), DEFAULT_COMPONENT_SIZE);
    }

    #[test]
    fn test_search_and_sort() {
        let catalog = ComponentCatalog::from_listing(vec![
            Component::new("b", "beta"),
            Component::new("a", "Alpha"),
            Component::new("c", "gamma"),
        ]);
        let names = |v: Vec<&Component>| v.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(names(catalog.search("", SortOrder::Catalog)), vec!["b", "a", "c"]);
        assert_eq!(names(catalog.search("", SortOrder::NameAscending)), vec!["a", "b", "c"]);
        assert_eq!(names(catalog.search("", SortOrder::NameDescending)), vec!["c", "b", "a"]);
        assert_eq!(names(catalog.search("ALP", SortOrder::Catalog)), vec!["a"]);
    }

    #[test]
    fn test_deserialize_manifest() {
        let json = r#"{
            "id": "clock",
            "name": "Clock",
            "entry": "clock/index.html",
            "recommendedSize": { "width": 250, "height": 150 },
            "configSchema": { "type": "object" },
            "usage": "desktop"
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.locator(), Some("clock/index.html"));
        assert_eq!(component.size_or(DEFAULT_COMPONENT_SIZE).width, 250);
        assert!(component.is_for_desktop());
        assert!(!component.auto_insert);
    }
}
