use std::collections::HashMap;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSize {
    Full,
    Half,
}

impl MealSize {
    pub fn label(&self) -> &'static str {
        match self {
            MealSize::Full => "Full Tiffin",
            MealSize::Half => "Half Tiffin",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TiffinOffer {
    pub cost: u32,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DayMenu {
    #[serde(default)]
    pub full_tiffin: Option<TiffinOffer>,
    #[serde(default)]
    pub half_tiffin: Option<TiffinOffer>,
}

impl DayMenu {
    pub fn offer(&self, size: MealSize) -> Option<&TiffinOffer> {
        match size {
            MealSize::Full => self.full_tiffin.as_ref(),
            MealSize::Half => self.half_tiffin.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_tiffin.is_none() && self.half_tiffin.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtraItem {
    pub name: String,
    pub cost: u32,
    /// Days the item is sold on. Empty means every day.
    pub days: Vec<Weekday>,
}

impl ExtraItem {
    pub fn is_offered_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }
}

/// Read-only weekly menu. Built once per session by the catalog loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuCatalog {
    days: HashMap<Weekday, DayMenu>,
    extra_items: Vec<ExtraItem>,
}

impl MenuCatalog {
    pub fn new(days: HashMap<Weekday, DayMenu>, extra_items: Vec<ExtraItem>) -> Self {
        Self { days, extra_items }
    }

    pub fn day(&self, day: Weekday) -> Option<&DayMenu> {
        self.days.get(&day).filter(|m| !m.is_empty())
    }

    pub fn offer(&self, day: Weekday, size: MealSize) -> Option<&TiffinOffer> {
        self.days.get(&day).and_then(|m| m.offer(size))
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// All extra items, in the order they appear in the menu file.
    pub fn extra_items(&self) -> &[ExtraItem] {
        &self.extra_items
    }

    pub fn extras_for(&self, day: Weekday) -> impl Iterator<Item = &ExtraItem> {
        self.extra_items.iter().filter(move |e| e.is_offered_on(day))
    }

    pub fn extra_item(&self, name: &str) -> Option<&ExtraItem> {
        self.extra_items.iter().find(|e| e.name == name)
    }
}
