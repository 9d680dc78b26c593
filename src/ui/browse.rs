//! Interactive page browser
//!
//! Presents the navigation sidebar as a selection menu and renders the
//! chosen page until the user quits. The survey file is read through a
//! [`DatasetCache`], so it is only parsed again when it changes on disk.

use std::path::PathBuf;

use dialoguer::{Select, theme::ColorfulTheme};
use log::debug;

use crate::core::error::Result;
use crate::data::{DatasetCache, SurveySource};
use crate::report::pages::{Page, ReportGenerator};
use crate::ui::color::{Colors, colorize};
use crate::ui::output::display_payload;

const QUIT_LABEL: &str = "Quit";

/// Menu entries in display order, the quit entry last
pub fn menu_items(economy: &str) -> Vec<String> {
    Page::ALL
        .iter()
        .map(|page| page.label(economy))
        .chain(std::iter::once(QUIT_LABEL.to_string()))
        .collect()
}

/// Page behind a menu index, `None` for the quit entry
pub fn page_for_selection(index: usize) -> Option<Page> {
    Page::ALL.get(index).copied()
}

pub struct Browser<S: SurveySource> {
    cache: DatasetCache<S>,
    generator: ReportGenerator,
    data_path: PathBuf,
    output_format: String,
    theme: ColorfulTheme,
}

impl<S: SurveySource> Browser<S> {
    pub fn new(
        source: S,
        generator: ReportGenerator,
        data_path: PathBuf,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            cache: DatasetCache::new(source),
            generator,
            data_path,
            output_format: output_format.into(),
            theme: ColorfulTheme::default(),
        }
    }

    /// Loop until the user picks quit or dismisses the menu.
    /// Returns the number of pages rendered.
    pub fn run(&mut self, start: Page) -> Result<usize> {
        let items = menu_items(self.generator.economy());
        let mut current = start;
        let mut shown = 0;

        loop {
            let default = Page::ALL.iter().position(|p| *p == current).unwrap_or(0);
            let selection = Select::with_theme(&self.theme)
                .with_prompt("Navigation")
                .items(&items)
                .default(default)
                .interact_opt()?;

            let Some(page) = selection.and_then(page_for_selection) else {
                break;
            };
            println!();
            self.show(page)?;
            println!("{}", colorize(&"─".repeat(60), Colors::DIM));
            current = page;
            shown += 1;
        }

        debug!("Browse session ended after {shown} page(s)");
        Ok(shown)
    }

    /// Render one page, reloading the survey file only if it changed
    pub fn show(&mut self, page: Page) -> Result<()> {
        let dataset = self.cache.get(&self.data_path)?;
        let payload = self.generator.generate(page, dataset);
        display_payload(&payload, dataset, &self.output_format, false)
    }

    pub fn loads(&self) -> usize {
        self.cache.loads()
    }
}
