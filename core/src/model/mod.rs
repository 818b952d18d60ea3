pub mod features;
pub mod menu;
pub mod order;
