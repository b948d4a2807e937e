pub mod contract_text;
pub mod pdf;
pub mod preview;
