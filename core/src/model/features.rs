use std::fmt;
use std::str::FromStr;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Minimum order value (in rupees) enforced by the current order form.
pub const DEFAULT_MINIMUM_ORDER: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreadChoice {
    #[default]
    Chapati,
    Bhakri,
}

impl BreadChoice {
    pub const ALL: [BreadChoice; 2] = [BreadChoice::Chapati, BreadChoice::Bhakri];

    pub fn next(self) -> Self {
        match self {
            BreadChoice::Chapati => BreadChoice::Bhakri,
            BreadChoice::Bhakri => BreadChoice::Chapati,
        }
    }
}

impl fmt::Display for BreadChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreadChoice::Chapati => write!(f, "Chapati"),
            BreadChoice::Bhakri => write!(f, "Bhakri"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealSlot {
    #[default]
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn next(self) -> Self {
        match self {
            MealSlot::Lunch => MealSlot::Dinner,
            MealSlot::Dinner => MealSlot::Lunch,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSlot::Lunch => write!(f, "Lunch"),
            MealSlot::Dinner => write!(f, "Dinner"),
        }
    }
}

/// Optional parts of the order form. Every variant of the form is one
/// configuration of these switches over the same pricer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FormFeatures {
    pub extra_items: bool,
    pub bread_choice: bool,
    pub zero_masala: bool,
    pub meal_slot: bool,
    pub minimum_order_value: Option<u32>,
}

impl Default for FormFeatures {
    fn default() -> Self {
        Self {
            extra_items: true,
            bread_choice: false,
            zero_masala: false,
            meal_slot: false,
            minimum_order_value: Some(DEFAULT_MINIMUM_ORDER),
        }
    }
}

impl FormFeatures {
    /// Everything off: tiffins only, no minimum.
    pub fn basic() -> Self {
        Self {
            extra_items: false,
            bread_choice: false,
            zero_masala: false,
            meal_slot: false,
            minimum_order_value: None,
        }
    }

    /// Parses a comma separated feature list such as "extras,bread".
    /// The minimum order value is left untouched.
    pub fn with_list(mut self, list: &str) -> Result<Self> {
        self.extra_items = false;
        self.bread_choice = false;
        self.zero_masala = false;
        self.meal_slot = false;

        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_lowercase().as_str() {
                "extras" | "extra_items" => self.extra_items = true,
                "bread" | "bread_choice" => self.bread_choice = true,
                "zero_masala" | "masala" => self.zero_masala = true,
                "meal_slot" | "slot" => self.meal_slot = true,
                _ => return Err(anyhow!("Unknown form feature: '{}'", name)),
            }
        }
        Ok(self)
    }
}

impl FromStr for FormFeatures {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        FormFeatures::default().with_list(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_latest_form() {
        let f = FormFeatures::default();
        assert!(f.extra_items);
        assert!(!f.bread_choice);
        assert_eq!(f.minimum_order_value, Some(100));
    }

    #[test]
    fn test_parse_feature_list() {
        let f: FormFeatures = "extras, bread,slot".parse().unwrap();
        assert!(f.extra_items);
        assert!(f.bread_choice);
        assert!(f.meal_slot);
        assert!(!f.zero_masala);

        let none: FormFeatures = "".parse().unwrap();
        assert!(!none.extra_items);

        assert!("extras,dessert".parse::<FormFeatures>().is_err());
    }

    #[test]
    fn test_choice_cycling() {
        assert_eq!(BreadChoice::Chapati.next(), BreadChoice::Bhakri);
        assert_eq!(MealSlot::Dinner.next(), MealSlot::Lunch);
        assert_eq!(BreadChoice::Bhakri.to_string(), "Bhakri");
    }
}
