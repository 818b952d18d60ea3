use serde::{Deserialize, Serialize};

use crate::model::features::{BreadChoice, FormFeatures, MealSlot};
use crate::model::menu::{MealSize, MenuCatalog};
use crate::model::order::{LineSelection, OrderSelections, MAX_QUANTITY};
use crate::time::WeekDate;

/// Separator between per-date descriptions in the order sheet.
pub const DETAILS_DELIMITER: &str = "; ";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtraLine {
    pub name: String,
    pub quantity: u32,
    pub unit_cost: u32,
}

/// Priced view of one delivery date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LineQuote {
    pub date: WeekDate,
    pub full: u32,
    pub half: u32,
    pub extras: Vec<ExtraLine>,
    pub bread: Option<BreadChoice>,
    pub zero_masala: bool,
    pub slot: Option<MealSlot>,
    pub total: u64,
}

impl LineQuote {
    pub fn description(&self) -> String {
        let mut parts = vec![
            format!("{} half tiffins", self.half),
            format!("{} full tiffins", self.full),
        ];

        if let Some(bread) = self.bread {
            parts.push(format!("Bread: {}", bread));
        }
        if self.zero_masala {
            parts.push("Zero masala".to_string());
        }
        if let Some(slot) = self.slot {
            parts.push(format!("Slot: {}", slot));
        }

        let extras: Vec<String> = self.extras.iter()
            .filter(|e| e.quantity > 0)
            .map(|e| format!("{} x{}", e.name, e.quantity))
            .collect();
        parts.push(format!("Extra items: {}", extras.join(", ")));

        format!("{} ({}): {}", self.date.label(), self.date.day_name(), parts.join(", "))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct OrderTotals {
    pub grand_total: u64,
    pub lines: Vec<LineQuote>,
}

impl OrderTotals {
    pub fn descriptions(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.description()).collect()
    }

    /// All per-date descriptions joined for the "Tiffin Details" column.
    pub fn details(&self) -> String {
        self.descriptions().join(DETAILS_DELIMITER)
    }
}

pub fn price_line(
    menu: &MenuCatalog,
    date: &WeekDate,
    selection: &LineSelection,
    features: &FormFeatures,
) -> LineQuote {
    // Money is summed in u64 so a line of 20 at any u32 price cannot overflow
    let mut total: u64 = 0;
    let mut quantities = [0u32; 2];

    // A meal size missing from the day's menu forces its quantity to 0
    for (slot, size) in [MealSize::Full, MealSize::Half].into_iter().enumerate() {
        if let Some(offer) = menu.offer(date.weekday, size) {
            let qty = selection.quantity(size).min(MAX_QUANTITY);
            total += u64::from(qty) * u64::from(offer.cost);
            quantities[slot] = qty;
        }
    }

    // Only extras sold on this weekday are priced; stale entries for other items are ignored
    let mut extras = Vec::new();
    if features.extra_items {
        for item in menu.extras_for(date.weekday) {
            let qty = selection.extra(&item.name).min(MAX_QUANTITY);
            total += u64::from(qty) * u64::from(item.cost);
            extras.push(ExtraLine {
                name: item.name.clone(),
                quantity: qty,
                unit_cost: item.cost,
            });
        }
    }

    LineQuote {
        date: date.clone(),
        full: quantities[0],
        half: quantities[1],
        extras,
        bread: features.bread_choice.then_some(selection.bread),
        zero_masala: features.zero_masala && selection.zero_masala,
        slot: features.meal_slot.then_some(selection.slot),
        total,
    }
}

pub fn aggregate(menu: &MenuCatalog, selections: &OrderSelections, features: &FormFeatures) -> OrderTotals {
    let lines: Vec<LineQuote> = selections.iter()
        .map(|(date, sel)| price_line(menu, date, sel, features))
        .collect();
    let grand_total = lines.iter().map(|l| l.total).sum();

    OrderTotals { grand_total, lines }
}
