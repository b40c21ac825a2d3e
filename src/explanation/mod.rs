//! Per-crop explanation attached to ranked results: cultivation tips,
//! weather-stress notes, yield and investment estimates.

pub mod estimates;
pub mod special_notes;

pub use estimates::{estimate_investment, estimate_yield, InvestmentEstimate, YieldEstimate};
pub use special_notes::{crop_tips, generate_special_notes, weather_notes};
