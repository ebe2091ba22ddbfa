//! Display backend with no hardware attached. Validates and paces exactly
//! like the real driver, but renders to the log. Used for development and
//! acceptance-testing on machines without an LED chain.

use async_trait::async_trait;
use log::info;

use crate::config::Config;
use crate::display::{Display, DisplayError, ScrollOptions, ensure_renderable, rasterize};

pub struct HeadlessDisplay {
    display_columns: usize,
}

impl HeadlessDisplay {
    pub fn new(config: &Config) -> Self {
        Self {
            display_columns: config.cascaded_devices * 8,
        }
    }
}

#[async_trait]
impl Display for HeadlessDisplay {
    async fn render(
        &mut self,
        text: &str,
        options: &ScrollOptions,
    ) -> Result<(), DisplayError> {
        ensure_renderable(text)?;
        info!("displaying: {text:?}");
        // sleep for as long as the scroll would have taken on hardware
        let steps = rasterize(text).columns().len() + self.display_columns + 1;
        tokio::time::sleep(options.scroll_delay * steps as u32).await;
        Ok(())
    }
}
