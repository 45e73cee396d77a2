mod chart;
mod price_client;
mod report;
mod store;

pub use chart::{generate_chart, render_trend};
pub use price_client::{Bar, PriceClient};
pub use report::{Indicator, REPORT_HEADER, ReportBuilder, classify, percent_change};
pub use store::Database;
