use ratatui::widgets::ListState;
use tiffin_core::model::order::{ADDRESS_MAX_CHARS, CONTACT_MAX_CHARS, INSTRUCTIONS_MAX_CHARS, NAME_MAX_CHARS};
use tiffin_core::service::form::{adjust_field, offered_fields, FormField};
use tiffin_core::{Customer, OrderService, OrderSelections, OrderSink, OrderTotals, SubmitOutcome, WeekDate};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Dates,
    Lines,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailField {
    Name,
    Contact,
    Address,
    Instructions,
}

impl DetailField {
    pub const ALL: [DetailField; 4] = [DetailField::Name, DetailField::Contact, DetailField::Address, DetailField::Instructions];

    pub fn label(&self) -> &'static str {
        match self {
            DetailField::Name => "Full Name *",
            DetailField::Contact => "Contact Number *",
            DetailField::Address => "Delivery Address *",
            DetailField::Instructions => "Special Instructions",
        }
    }

    pub fn max_chars(&self) -> usize {
        match self {
            DetailField::Name => NAME_MAX_CHARS,
            DetailField::Contact => CONTACT_MAX_CHARS,
            DetailField::Address => ADDRESS_MAX_CHARS,
            DetailField::Instructions => INSTRUCTIONS_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

pub struct App<S: OrderSink> {
    pub service: OrderService<S>,
    pub window: Vec<WeekDate>,
    pub selections: OrderSelections,
    pub customer: Customer,
    pub totals: OrderTotals,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub date_state: ListState,
    pub line_date: usize,
    pub line_field: usize,
    pub detail_field: usize,
    pub cursor_position: usize,
    pub notice: Option<Notice>,
    pub submitting: bool,
}

impl<S: OrderSink> App<S> {
    pub fn new(service: OrderService<S>, window: Vec<WeekDate>) -> App<S> {
        let mut date_state = ListState::default();
        if !window.is_empty() {
            date_state.select(Some(0));
        }
        let mut app = App {
            service,
            window,
            selections: OrderSelections::new(),
            customer: Customer::default(),
            totals: OrderTotals::default(),
            focus: Focus::Dates,
            input_mode: InputMode::Normal,
            date_state,
            line_date: 0,
            line_field: 0,
            detail_field: 0,
            cursor_position: 0,
            notice: None,
            submitting: false,
        };
        app.recalculate();
        app
    }

    // Totals are rebuilt from scratch after every change
    fn recalculate(&mut self) {
        self.totals = self.service.quote(&self.selections);
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Dates => Focus::Lines,
            Focus::Lines => Focus::Details,
            Focus::Details => Focus::Dates,
        };
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::Dates => {
                if self.window.is_empty() { return; }
                let i = self.date_state.selected().map(|i| (i + 1) % self.window.len()).unwrap_or(0);
                self.date_state.select(Some(i));
            }
            Focus::Lines => {
                let count = self.current_fields().len();
                if count > 0 {
                    self.line_field = (self.line_field + 1) % count;
                }
            }
            Focus::Details => {
                self.detail_field = (self.detail_field + 1) % DetailField::ALL.len();
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Dates => {
                if self.window.is_empty() { return; }
                let len = self.window.len();
                let i = self.date_state.selected().map(|i| (i + len - 1) % len).unwrap_or(0);
                self.date_state.select(Some(i));
            }
            Focus::Lines => {
                let count = self.current_fields().len();
                if count > 0 {
                    self.line_field = (self.line_field + count - 1) % count;
                }
            }
            Focus::Details => {
                let len = DetailField::ALL.len();
                self.detail_field = (self.detail_field + len - 1) % len;
            }
        }
    }

    pub fn toggle_date(&mut self) {
        if let Some(date) = self.date_state.selected().and_then(|i| self.window.get(i)).cloned() {
            self.selections.toggle(date);
            self.clamp_line_cursor();
            self.recalculate();
        }
    }

    /// Moves between selected dates in the quantities panel.
    pub fn switch_line_date(&mut self, forward: bool) {
        let count = self.selections.len();
        if count == 0 { return; }
        self.line_date = if forward {
            (self.line_date + 1) % count
        } else {
            (self.line_date + count - 1) % count
        };
        self.line_field = 0;
    }

    pub fn current_line_date(&self) -> Option<WeekDate> {
        self.selections.dates().get(self.line_date).cloned()
    }

    pub fn current_fields(&self) -> Vec<FormField> {
        match self.current_line_date() {
            Some(date) => offered_fields(self.service.catalog(), self.service.features(), date.weekday),
            None => Vec::new(),
        }
    }

    pub fn adjust(&mut self, delta: i32) {
        let Some(date) = self.current_line_date() else { return };
        let fields = self.current_fields();
        let Some(field) = fields.get(self.line_field) else { return };
        if let Some(selection) = self.selections.get_mut(&date) {
            adjust_field(selection, field, delta);
        }
        self.recalculate();
    }

    fn clamp_line_cursor(&mut self) {
        let count = self.selections.len();
        if count == 0 {
            self.line_date = 0;
        } else if self.line_date >= count {
            self.line_date = count - 1;
        }
        let fields = self.current_fields().len();
        if self.line_field >= fields {
            self.line_field = 0;
        }
    }

    pub fn current_detail(&self) -> DetailField {
        DetailField::ALL[self.detail_field]
    }

    pub fn detail_value(&self, field: DetailField) -> &str {
        match field {
            DetailField::Name => &self.customer.name,
            DetailField::Contact => &self.customer.contact,
            DetailField::Address => &self.customer.address,
            DetailField::Instructions => &self.customer.instructions,
        }
    }

    fn detail_value_mut(&mut self) -> &mut String {
        match self.current_detail() {
            DetailField::Name => &mut self.customer.name,
            DetailField::Contact => &mut self.customer.contact,
            DetailField::Address => &mut self.customer.address,
            DetailField::Instructions => &mut self.customer.instructions,
        }
    }

    pub fn enter_edit_mode(&mut self) {
        if self.focus == Focus::Details {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.detail_value(self.current_detail()).chars().count();
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Inserts at the cursor. Input stops once the field is at its length limit.
    pub fn input_char(&mut self, c: char) {
        let limit = self.current_detail().max_chars();
        if self.detail_value(self.current_detail()).chars().count() >= limit {
            return;
        }
        let cursor = self.cursor_position;
        let value = self.detail_value_mut();
        let byte_index = value.chars().take(cursor).map(|c| c.len_utf8()).sum();
        value.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor = self.cursor_position;
            let value = self.detail_value_mut();
            let byte_index: usize = value.chars().take(cursor - 1).map(|c| c.len_utf8()).sum();
            value.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.detail_value(self.current_detail()).chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Display width of the text before the cursor, for placing the terminal cursor.
    pub fn cursor_offset(&self) -> u16 {
        let value: String = self.detail_value(self.current_detail()).chars().take(self.cursor_position).collect();
        value.width() as u16
    }

    pub fn request_submit(&mut self) {
        self.submitting = true;
        self.notice = Some(Notice::Info("Submitting your order to the kitchen...".to_string()));
    }

    pub fn submit(&mut self) {
        self.submitting = false;
        let outcome = self.service.submit(&self.customer, &self.selections);
        self.notice = Some(match outcome {
            SubmitOutcome::Submitted(record) => {
                // The order is out; start a fresh one
                self.selections = OrderSelections::new();
                self.customer = Customer::default();
                self.line_date = 0;
                self.line_field = 0;
                self.recalculate();
                Notice::Success(format!(
                    "Order submitted successfully! Your tiffin order has been sent to the kitchen. (₹{}, {})",
                    record.total_price, record.order_id
                ))
            }
            SubmitOutcome::Rejected(err) => Notice::Error(err.to_string()),
            SubmitOutcome::SinkFailed(_) => Notice::Error(
                "Failed to submit order. Please try again or contact support if the problem persists.".to_string(),
            ),
        });
    }
}
