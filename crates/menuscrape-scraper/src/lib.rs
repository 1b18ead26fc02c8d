pub mod addons;
pub mod classify;
mod dom;
pub mod error;
pub mod extract;
pub mod locator;
pub mod output;
pub mod page;
pub mod parse;
pub mod pipeline;
pub mod reconcile;
mod retry;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{PageError, ScraperError};
pub use locator::{locate, LocatedMenu};
pub use output::{read_menu, write_menu, StoredMenu};
pub use page::{HttpPage, HttpPageLoader, LoadOptions, PageHandle, PageLoader};
pub use pipeline::{
    run_pipeline, scrape_and_save, scrape_to_file, CategorySummary, MenuRun, PipelineReport,
    PipelineStage, RunSettings, SavedMenu,
};
pub use types::{RawCategory, RawItem, RawOptions, RestaurantInfo};
