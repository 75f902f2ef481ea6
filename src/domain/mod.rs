// Domain layer: identifier validation, form rules, models and ports.

pub mod cnpj;
pub mod form;
pub mod model;
pub mod ports;
