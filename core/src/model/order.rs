use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::features::{BreadChoice, MealSlot};
use crate::model::menu::MealSize;
use crate::time::WeekDate;

/// Largest quantity accepted for any single line.
pub const MAX_QUANTITY: u32 = 20;

pub const NAME_MAX_CHARS: usize = 100;
pub const CONTACT_MAX_CHARS: usize = 20;
pub const ADDRESS_MAX_CHARS: usize = 300;
pub const INSTRUCTIONS_MAX_CHARS: usize = 500;

pub mod fields {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const ORDER_ID: &str = "Order ID";
    pub const NAME: &str = "Name";
    pub const CONTACT_NUMBER: &str = "Contact Number";
    pub const ADDRESS: &str = "Address";
    pub const TIFFIN_DETAILS: &str = "Tiffin Details";
    pub const SPECIAL_INSTRUCTIONS: &str = "Special Instructions";
    pub const TOTAL_PRICE: &str = "Total Price";

    /// Header row written when a new worksheet is initialised.
    pub const STANDARD_HEADERS: [&str; 7] = [
        TIMESTAMP,
        NAME,
        CONTACT_NUMBER,
        ADDRESS,
        TIFFIN_DETAILS,
        SPECIAL_INSTRUCTIONS,
        TOTAL_PRICE,
    ];
}

/// What the customer picked for one delivery date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LineSelection {
    #[serde(default)]
    pub full: u32,
    #[serde(default)]
    pub half: u32,
    #[serde(default)]
    pub extras: HashMap<String, u32>,
    #[serde(default)]
    pub bread: BreadChoice,
    #[serde(default)]
    pub zero_masala: bool,
    #[serde(default)]
    pub slot: MealSlot,
}

impl LineSelection {
    pub fn quantity(&self, size: MealSize) -> u32 {
        match size {
            MealSize::Full => self.full,
            MealSize::Half => self.half,
        }
    }

    pub fn set_quantity(&mut self, size: MealSize, qty: u32) {
        let qty = qty.min(MAX_QUANTITY);
        match size {
            MealSize::Full => self.full = qty,
            MealSize::Half => self.half = qty,
        }
    }

    pub fn extra(&self, name: &str) -> u32 {
        self.extras.get(name).copied().unwrap_or(0)
    }

    pub fn set_extra(&mut self, name: &str, qty: u32) {
        let qty = qty.min(MAX_QUANTITY);
        if qty == 0 {
            self.extras.remove(name);
        } else {
            self.extras.insert(name.to_string(), qty);
        }
    }
}

/// Per-date selections in the order the dates were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSelections {
    entries: Vec<(WeekDate, LineSelection)>,
}

impl OrderSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the selection for a date. A date that is already present keeps
    /// its position and its selection is replaced.
    pub fn set(&mut self, date: WeekDate, selection: LineSelection) {
        if let Some(pos) = self.position(&date) {
            self.entries[pos].1 = selection;
        } else {
            self.entries.push((date, selection));
        }
    }

    /// Returns the selection for a date, adding an empty one if it was not picked yet.
    pub fn select(&mut self, date: WeekDate) -> &mut LineSelection {
        let pos = match self.position(&date) {
            Some(pos) => pos,
            None => {
                self.entries.push((date, LineSelection::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    pub fn deselect(&mut self, date: &WeekDate) -> Option<LineSelection> {
        self.position(date).map(|pos| self.entries.remove(pos).1)
    }

    /// Adds the date if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, date: WeekDate) -> bool {
        if self.deselect(&date).is_some() {
            false
        } else {
            self.select(date);
            true
        }
    }

    pub fn get(&self, date: &WeekDate) -> Option<&LineSelection> {
        self.position(date).map(|pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, date: &WeekDate) -> Option<&mut LineSelection> {
        self.position(date).map(move |pos| &mut self.entries[pos].1)
    }

    pub fn contains(&self, date: &WeekDate) -> bool {
        self.position(date).is_some()
    }

    pub fn dates(&self) -> Vec<WeekDate> {
        self.entries.iter().map(|(d, _)| d.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekDate, &LineSelection)> {
        self.entries.iter().map(|(d, s)| (d, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, date: &WeekDate) -> Option<usize> {
        self.entries.iter().position(|(d, _)| d.date == date.date)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Customer {
    pub name: String,
    pub contact: String,
    pub address: String,
    #[serde(default)]
    pub instructions: String,
}

impl Customer {
    /// Trims every field and cuts it to the form's length limit.
    pub fn normalized(&self) -> Self {
        Self {
            name: clip(&self.name, NAME_MAX_CHARS),
            contact: clip(&self.contact, CONTACT_MAX_CHARS),
            address: clip(&self.address, ADDRESS_MAX_CHARS),
            instructions: clip(&self.instructions, INSTRUCTIONS_MAX_CHARS),
        }
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    value.trim().chars().take(max_chars).collect()
}

/// One submitted order, flattened for the order sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub timestamp: String,
    pub customer: Customer,
    pub tiffin_details: String,
    pub total_price: u64,
}

impl OrderRecord {
    pub fn new(timestamp: String, customer: Customer, tiffin_details: String, total_price: u64) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            timestamp,
            customer: customer.normalized(),
            tiffin_details,
            total_price,
        }
    }

    pub fn to_row_map(&self) -> BTreeMap<String, String> {
        let mut row = BTreeMap::new();
        row.insert(fields::TIMESTAMP.to_string(), self.timestamp.clone());
        row.insert(fields::ORDER_ID.to_string(), self.order_id.to_string());
        row.insert(fields::NAME.to_string(), self.customer.name.clone());
        row.insert(fields::CONTACT_NUMBER.to_string(), self.customer.contact.clone());
        row.insert(fields::ADDRESS.to_string(), self.customer.address.clone());
        row.insert(fields::TIFFIN_DETAILS.to_string(), self.tiffin_details.clone());
        row.insert(fields::SPECIAL_INSTRUCTIONS.to_string(), self.customer.instructions.clone());
        row.insert(fields::TOTAL_PRICE.to_string(), self.total_price.to_string());
        row
    }
}
