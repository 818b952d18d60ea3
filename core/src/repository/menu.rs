use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use tracing::{info, warn};

use crate::model::menu::{DayMenu, ExtraItem, MenuCatalog};
use crate::time::parse_weekday_str;

pub const DEFAULT_MENU_FILE: &str = "day-menu.yaml";
const EXTRA_ITEMS_KEY: &str = "extra_items";

pub fn load_catalog(path: &Path) -> Result<MenuCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read menu file {}", path.display()))?;
    let catalog = parse_catalog(&content)
        .with_context(|| format!("Malformed menu file {}", path.display()))?;

    info!(
        path = %path.display(),
        days = catalog.day_count(),
        extra_items = catalog.extra_items().len(),
        "menu loaded"
    );
    Ok(catalog)
}

pub fn parse_catalog(content: &str) -> Result<MenuCatalog> {
    let raw: RawCatalog = serde_yaml::from_str(content)?;
    Ok(raw.0)
}

// The menu file is edited by hand and repeats weekdays now and then. Maps are
// walked entry by entry so the first occurrence of a key is kept.
struct RawCatalog(MenuCatalog);

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor).map(RawCatalog)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = MenuCatalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of weekday names to day menus")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MenuCatalog, A::Error> {
        let mut days = HashMap::new();
        let mut extras: Option<Vec<ExtraItem>> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == EXTRA_ITEMS_KEY {
                if extras.is_some() {
                    warn!("duplicate extra_items section ignored");
                    map.next_value::<IgnoredAny>()?;
                } else {
                    extras = Some(map.next_value::<ExtraItemList>()?.0);
                }
                continue;
            }

            match parse_weekday_str(&key) {
                Ok(day) if days.contains_key(&day) => {
                    warn!(day = %key, "duplicate weekday in menu, keeping first occurrence");
                    map.next_value::<IgnoredAny>()?;
                }
                Ok(day) => {
                    let menu = map.next_value::<Option<DayMenu>>()?.unwrap_or_default();
                    days.insert(day, menu);
                }
                Err(_) => {
                    warn!(key = %key, "skipping unknown menu key");
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(MenuCatalog::new(days, extras.unwrap_or_default()))
    }
}

#[derive(serde::Deserialize)]
struct RawExtraItem {
    cost: u32,
    #[serde(default)]
    days: Option<Vec<String>>,
}

struct ExtraItemList(Vec<ExtraItem>);

impl<'de> Deserialize<'de> for ExtraItemList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(ExtraItemVisitor).map(ExtraItemList)
    }
}

struct ExtraItemVisitor;

impl<'de> Visitor<'de> for ExtraItemVisitor {
    type Value = Vec<ExtraItem>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of extra item names to {cost, days}")
    }

    fn visit_none<E: de::Error>(self) -> Result<Vec<ExtraItem>, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<ExtraItem>, E> {
        Ok(Vec::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<ExtraItem>, D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<ExtraItem>, A::Error> {
        let mut items: Vec<ExtraItem> = Vec::new();

        while let Some(name) = map.next_key::<String>()? {
            if items.iter().any(|i| i.name == name) {
                warn!(item = %name, "duplicate extra item in menu, keeping first occurrence");
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            let raw: RawExtraItem = map.next_value()?;
            let mut days = Vec::new();
            for day in raw.days.unwrap_or_default() {
                let day = parse_weekday_str(&day).map_err(<A::Error as de::Error>::custom)?;
                if !days.contains(&day) {
                    days.push(day);
                }
            }
            items.push(ExtraItem { name, cost: raw.cost, days });
        }
        Ok(items)
    }
}
