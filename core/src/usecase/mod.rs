pub mod weekly_order;
mod weekly_order_test;
