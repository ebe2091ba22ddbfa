//! Display backends and the loop that drives them.
//!
//! A backend renders one full scroll cycle per call and returns only when
//! the cycle completes or fails. The loop re-reads the message board between
//! cycles, so a new message is picked up at the next cycle boundary; nothing
//! preempts a render in flight.

use std::time::Duration;

use async_trait::async_trait;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::{error, info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use dotnote::store::MessageBoard;

use crate::config::Config;

pub mod headless;
pub mod max7219;

/// Shown on the hardware after a failed render so viewers can tell the
/// message did not just disappear.
pub const ERROR_MESSAGE: &str = "Error: Unsupported character   ";

/// Pause between cycles so an empty or failed render does not busy-spin.
const IDLE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("unsupported character {0:?}")]
    UnsupportedCharacter(char),
    #[error("SPI transfer failed: {0}")]
    Spi(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug)]
pub struct ScrollOptions {
    /// Pause between one-pixel scroll steps; lower is faster.
    pub scroll_delay: Duration,
}

impl ScrollOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scroll_delay: Duration::from_millis(config.scroll_delay_ms),
        }
    }
}

#[async_trait]
pub trait Display: Send {
    /// Render one full scroll cycle of `text`. Returns once the cycle has
    /// completed or failed; the call's duration grows with the pixel width
    /// of the text.
    async fn render(
        &mut self,
        text: &str,
        options: &ScrollOptions,
    ) -> Result<(), DisplayError>;
}

/// Reject characters outside the font's coverage before anything is pushed
/// to the hardware.
pub(crate) fn ensure_renderable(text: &str) -> Result<(), DisplayError> {
    match text.chars().find(|c| !(' '..='~').contains(c)) {
        Some(c) => Err(DisplayError::UnsupportedCharacter(c)),
        None => Ok(()),
    }
}

/// Off-screen 1-bit raster of a message, one byte per pixel column with bit 0
/// as the top row.
pub(crate) struct ColumnFrame {
    width: u32,
    columns: Vec<u8>,
}

impl ColumnFrame {
    fn new(width: u32) -> Self {
        Self {
            width,
            columns: vec![0; width as usize],
        }
    }

    pub(crate) fn columns(&self) -> &[u8] {
        &self.columns
    }
}

impl OriginDimensions for ColumnFrame {
    fn size(&self) -> Size {
        Size::new(self.width, 8)
    }
}

impl DrawTarget for ColumnFrame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..self.width as i32).contains(&point.x) && (0..8).contains(&point.y) {
                let bit = 1u8 << point.y;
                if color.is_on() {
                    self.columns[point.x as usize] |= bit;
                } else {
                    self.columns[point.x as usize] &= !bit;
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn rasterize(text: &str) -> ColumnFrame {
    let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    let glyph_width = FONT_5X8.character_size.width + FONT_5X8.character_spacing;
    let mut frame = ColumnFrame::new(glyph_width * text.chars().count() as u32);
    Text::with_baseline(text, Point::zero(), style, Baseline::Top)
        .draw(&mut frame)
        .ok();
    frame
}

/// Run the display loop until shutdown: snapshot the board, render it, and on
/// a failed render substitute [`ERROR_MESSAGE`] so the next cycle shows the
/// failure on the hardware itself. The loop never exits on render errors.
pub fn run_render_loop(
    task_tracker: &TaskTracker,
    mut display: Box<dyn Display>,
    board: MessageBoard,
    options: ScrollOptions,
    shutdown_token: CancellationToken,
) {
    task_tracker.spawn(async move {
        info!("starting display loop");
        loop {
            let message = board.get().await;
            tokio::select! {
                _ = shutdown_token.cancelled() => {
                    info!("received display loop shutdown");
                    break;
                }
                result = display.render(&message, &options) => {
                    if let Err(e) = result {
                        error!("error displaying message: {e}");
                        board.set(ERROR_MESSAGE).await;
                    }
                }
            }
            tokio::select! {
                _ = shutdown_token.cancelled() => {
                    info!("received display loop shutdown");
                    break;
                }
                _ = tokio::time::sleep(IDLE_PAUSE) => {}
            }
        }
    });
}
