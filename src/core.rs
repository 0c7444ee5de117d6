pub mod aggregate;
pub mod breakdown;
pub mod comparison;
pub mod detail;
pub mod interval;
pub mod reading;
pub mod source;
pub mod tariff;
