mod overview;
mod portfolio;
pub mod views;

pub use overview::ProgramOverview;
pub use portfolio::PortfolioOverview;
