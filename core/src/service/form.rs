use chrono::Weekday;

use crate::model::features::FormFeatures;
use crate::model::menu::{MealSize, MenuCatalog};
use crate::model::order::{LineSelection, MAX_QUANTITY};

/// One input offered for a delivery date.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Meal(MealSize),
    Extra(String),
    Bread,
    ZeroMasala,
    Slot,
}

/// Inputs shown for a weekday, in display order. Meal sizes missing from
/// the day's menu and extras not sold that day are left out.
pub fn offered_fields(menu: &MenuCatalog, features: &FormFeatures, day: Weekday) -> Vec<FormField> {
    let mut fields = Vec::new();
    for size in [MealSize::Full, MealSize::Half] {
        if menu.offer(day, size).is_some() {
            fields.push(FormField::Meal(size));
        }
    }
    if features.extra_items {
        fields.extend(menu.extras_for(day).map(|e| FormField::Extra(e.name.clone())));
    }
    if features.bread_choice {
        fields.push(FormField::Bread);
    }
    if features.zero_masala {
        fields.push(FormField::ZeroMasala);
    }
    if features.meal_slot {
        fields.push(FormField::Slot);
    }
    fields
}

/// Moves a quantity field up or down by `delta`, or flips a choice field.
pub fn adjust_field(selection: &mut LineSelection, field: &FormField, delta: i32) {
    let step = |qty: u32| (qty as i64 + delta as i64).clamp(0, MAX_QUANTITY as i64) as u32;
    match field {
        FormField::Meal(size) => {
            let qty = step(selection.quantity(*size));
            selection.set_quantity(*size, qty);
        }
        FormField::Extra(name) => {
            let qty = step(selection.extra(name));
            selection.set_extra(name, qty);
        }
        FormField::Bread => selection.bread = selection.bread.next(),
        FormField::ZeroMasala => selection.zero_masala = !selection.zero_masala,
        FormField::Slot => selection.slot = selection.slot.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::features::BreadChoice;
    use crate::repository::menu::parse_catalog;

    fn menu() -> MenuCatalog {
        parse_catalog(
            "Monday:\n  half_tiffin: { cost: 70 }\nextra_items:\n  Chapati: { cost: 10 }\n  Ukdiche Modak: { cost: 50, days: [Friday] }\n",
        ).unwrap()
    }

    #[test]
    fn test_offered_fields_skip_unavailable() {
        let fields = offered_fields(&menu(), &FormFeatures::default(), Weekday::Mon);
        assert_eq!(fields, vec![FormField::Meal(MealSize::Half), FormField::Extra("Chapati".to_string())]);

        let friday = offered_fields(&menu(), &FormFeatures::default(), Weekday::Fri);
        assert_eq!(friday, vec![
            FormField::Extra("Chapati".to_string()),
            FormField::Extra("Ukdiche Modak".to_string()),
        ]);
    }

    #[test]
    fn test_optional_fields() {
        let features: FormFeatures = "bread,zero_masala,slot".parse().unwrap();
        let fields = offered_fields(&menu(), &features, Weekday::Mon);
        assert_eq!(fields, vec![
            FormField::Meal(MealSize::Half),
            FormField::Bread,
            FormField::ZeroMasala,
            FormField::Slot,
        ]);
    }

    #[test]
    fn test_adjust_field_bounds() {
        let mut sel = LineSelection::default();
        let half = FormField::Meal(MealSize::Half);
        adjust_field(&mut sel, &half, -1);
        assert_eq!(sel.half, 0);
        for _ in 0..25 {
            adjust_field(&mut sel, &half, 1);
        }
        assert_eq!(sel.half, MAX_QUANTITY);

        adjust_field(&mut sel, &FormField::Bread, 1);
        assert_eq!(sel.bread, BreadChoice::Bhakri);
        adjust_field(&mut sel, &FormField::ZeroMasala, 1);
        assert!(sel.zero_masala);
    }
}
