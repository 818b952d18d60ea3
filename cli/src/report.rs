use chrono::Weekday;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use tiffin_core::service::form::{offered_fields, FormField};
use tiffin_core::time::weekday_name;
use tiffin_core::{FormFeatures, MenuCatalog, OrderTotals, WeekDate};

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Key")]
    key: String,
}

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Offer")]
    offer: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Items")]
    items: String,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Half")]
    half: u32,
    #[tabled(rename = "Full")]
    full: u32,
    #[tabled(rename = "Extras")]
    extras: String,
    #[tabled(rename = "Line Total")]
    total: String,
}

const WEEK: [Weekday; 6] = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat];

fn styled(table: &mut Table) -> &mut Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
}

pub fn print_week(window: &[WeekDate]) {
    let rows: Vec<WeekRow> = window.iter()
        .map(|d| WeekRow { date: d.label(), day: d.day_name().to_string(), key: d.key() })
        .collect();
    println!("{}", styled(&mut Table::new(rows)));
}

pub fn print_menu(catalog: &MenuCatalog, features: &FormFeatures, only: Option<Weekday>) {
    let days: Vec<Weekday> = match only {
        Some(day) => vec![day],
        None => WEEK.to_vec(),
    };

    let mut rows = Vec::new();
    for day in days {
        let mut fields = offered_fields(catalog, features, day);
        let has_menu = catalog.day(day).is_some();
        if !has_menu {
            rows.push(MenuRow {
                day: weekday_name(day).to_string(),
                offer: "-".to_string(),
                price: "-".to_string(),
                items: "Menu not available for this day.".to_string(),
            });
            // Extras sold that day are still listed below the notice
            fields.retain(|f| matches!(f, FormField::Extra(_)));
        }

        for (i, field) in fields.iter().enumerate() {
            let day_col = if i == 0 && has_menu { weekday_name(day).to_string() } else { String::new() };
            let row = match field {
                FormField::Meal(size) => {
                    let Some(offer) = catalog.offer(day, *size) else { continue };
                    MenuRow { day: day_col, offer: size.label().to_string(), price: format!("₹{}", offer.cost), items: offer.items.join(", ") }
                }
                FormField::Extra(name) => {
                    let Some(item) = catalog.extra_item(name) else { continue };
                    MenuRow { day: day_col, offer: name.clone(), price: format!("₹{} each", item.cost), items: "Extra item".to_string() }
                }
                FormField::Bread => MenuRow { day: day_col, offer: "Bread".into(), price: "-".into(), items: "Chapati or Bhakri".into() },
                FormField::ZeroMasala => MenuRow { day: day_col, offer: "Zero masala".into(), price: "-".into(), items: "On request".into() },
                FormField::Slot => MenuRow { day: day_col, offer: "Slot".into(), price: "-".into(), items: "Lunch or Dinner".into() },
            };
            rows.push(row);
        }
    }

    println!("{}", styled(&mut Table::new(rows)));
}

pub fn print_quote(totals: &OrderTotals) {
    if totals.lines.is_empty() {
        println!("No dates selected.");
        return;
    }

    let rows: Vec<QuoteRow> = totals.lines.iter().map(|line| {
        let extras: Vec<String> = line.extras.iter()
            .filter(|e| e.quantity > 0)
            .map(|e| format!("{} x{}", e.name, e.quantity))
            .collect();
        QuoteRow {
            date: line.date.option_label(),
            half: line.half,
            full: line.full,
            extras: if extras.is_empty() { "-".to_string() } else { extras.join(", ") },
            total: format!("₹{}", line.total),
        }
    }).collect();

    println!("{}", styled(&mut Table::new(rows)));
    println!("Total Price: ₹{}", totals.grand_total);
    println!("Tiffin Details: {}", totals.details());
}
