pub mod dto;
pub mod form;
pub mod order_service;
pub mod pricing;
pub mod validation;
