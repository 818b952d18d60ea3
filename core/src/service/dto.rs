use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::order::{Customer, LineSelection, OrderSelections, MAX_QUANTITY};
use crate::time::WeekDate;

/// One date of an order written out as a file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub selection: LineSelection,
}

impl DraftLine {
    fn check_quantities(&self) -> Result<()> {
        let sel = &self.selection;
        let mut counts = vec![("full", sel.full), ("half", sel.half)];
        let mut extras: Vec<(&str, u32)> = sel.extras.iter().map(|(name, qty)| (name.as_str(), *qty)).collect();
        extras.sort();
        counts.extend(extras);

        match counts.into_iter().find(|(_, qty)| *qty > MAX_QUANTITY) {
            Some((field, qty)) => Err(anyhow!(
                "{}: quantity {} for {} is above the maximum of {}",
                self.date, qty, field, MAX_QUANTITY
            )),
            None => Ok(()),
        }
    }
}

/// An order prepared outside the interactive form, e.g.
///
/// ```yaml
/// customer:
///   name: Asha
///   contact: "9876543210"
///   address: Kothrud, Pune
/// dates:
///   - date: 2026-10-19
///     full: 1
///     half: 2
///     extras: { Chapati: 2 }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct OrderDraft {
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub dates: Vec<DraftLine>,
}

impl OrderDraft {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read order file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Malformed order file {}", path.display()))
    }

    /// Places each line on its week-window date, keeping file order.
    /// A date listed twice keeps its first position and its last selection.
    /// Quantities above the per-line maximum are rejected, not capped.
    pub fn to_selections(&self, window: &[WeekDate]) -> Result<OrderSelections> {
        let mut selections = OrderSelections::new();
        for line in &self.dates {
            let date = window.iter()
                .find(|w| w.date == line.date)
                .ok_or_else(|| {
                    let first = window.first().map(|w| w.key()).unwrap_or_default();
                    let last = window.last().map(|w| w.key()).unwrap_or_default();
                    anyhow!("{} is outside this week's delivery window ({} to {})", line.date, first, last)
                })?;
            line.check_quantities()?;
            selections.set(date.clone(), line.selection.clone());
        }
        Ok(selections)
    }
}
