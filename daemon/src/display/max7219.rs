//! MAX7219 cascade driver over spidev.
//!
//! The chain is a daisy-chained shift register: one 16-bit register/data pair
//! per cascaded block, latched together when chip select rises. A whole frame
//! is eight such writes, one per row register.

use std::io::Write;

use anyhow::Context;
use async_trait::async_trait;
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};

use crate::config::Config;
use crate::display::{Display, DisplayError, ScrollOptions, ensure_renderable, rasterize};

const REG_DECODE_MODE: u8 = 0x09;
const REG_INTENSITY: u8 = 0x0A;
const REG_SCAN_LIMIT: u8 = 0x0B;
const REG_SHUTDOWN: u8 = 0x0C;
const REG_DISPLAY_TEST: u8 = 0x0F;
/// Digit registers are 0x01..=0x08, one per row.
const REG_DIGIT_BASE: u8 = 0x01;

pub struct Max7219Display {
    spi: Spidev,
    cascaded_devices: usize,
    block_orientation: i16,
    rotate: u8,
}

impl Max7219Display {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut spi = Spidev::open(&config.spi_path)
            .with_context(|| format!("opening SPI device {}", config.spi_path))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(10_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("configuring SPI")?;

        let mut display = Self {
            spi,
            cascaded_devices: config.cascaded_devices,
            block_orientation: config.block_orientation,
            rotate: config.rotate,
        };
        display
            .init(config.brightness)
            .context("initializing MAX7219 chain")?;
        Ok(display)
    }

    fn init(&mut self, brightness: u8) -> Result<(), std::io::Error> {
        self.write_all_blocks(REG_DISPLAY_TEST, 0)?;
        self.write_all_blocks(REG_SCAN_LIMIT, 7)?;
        self.write_all_blocks(REG_DECODE_MODE, 0)?;
        self.write_all_blocks(REG_INTENSITY, brightness)?;
        self.clear()?;
        // release shutdown mode last so no garbage is ever visible
        self.write_all_blocks(REG_SHUTDOWN, 1)
    }

    /// Send the same register/data pair to every block in the chain.
    fn write_all_blocks(&mut self, register: u8, data: u8) -> Result<(), std::io::Error> {
        let mut buf = Vec::with_capacity(self.cascaded_devices * 2);
        for _ in 0..self.cascaded_devices {
            buf.extend_from_slice(&[register, data]);
        }
        self.spi.write_all(&buf)
    }

    fn clear(&mut self) -> Result<(), std::io::Error> {
        for row in 0..8 {
            self.write_all_blocks(REG_DIGIT_BASE + row, 0)?;
        }
        Ok(())
    }

    /// Push one window of `8 * cascaded_devices` columns to the chain. The
    /// first pair shifted out ends up in the block farthest from the SPI
    /// input, which is the leftmost block of the window.
    fn write_frame(&mut self, window: &[u8]) -> Result<(), std::io::Error> {
        let blocks: Vec<[u8; 8]> = window
            .chunks_exact(8)
            .map(|columns| orient_block(columns, self.block_orientation))
            .collect();
        for row in 0..8 {
            let mut buf = Vec::with_capacity(self.cascaded_devices * 2);
            for block in &blocks {
                buf.extend_from_slice(&[REG_DIGIT_BASE + row as u8, block[row]]);
            }
            self.spi.write_all(&buf)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Display for Max7219Display {
    async fn render(
        &mut self,
        text: &str,
        options: &ScrollOptions,
    ) -> Result<(), DisplayError> {
        ensure_renderable(text)?;
        let frame = rasterize(text);
        let display_width = self.cascaded_devices * 8;

        // Lead-in and lead-out padding so the text scrolls in from the right
        // edge and fully out the left before the cycle ends.
        let mut strip = vec![0u8; display_width];
        strip.extend_from_slice(frame.columns());
        strip.resize(strip.len() + display_width, 0);

        for offset in 0..=strip.len() - display_width {
            let mut window = strip[offset..offset + display_width].to_vec();
            if self.rotate == 2 {
                window = rotate_half_turn(&window);
            }
            self.write_frame(&window)?;
            tokio::time::sleep(options.scroll_delay).await;
        }
        self.clear()?;
        Ok(())
    }
}

/// Map eight columns of one block (bit 0 = top row) onto the eight digit
/// registers, compensating for how the block is mounted on the board.
/// Upright blocks put row `r` in digit `r` with bit 7 as the leftmost column.
fn orient_block(columns: &[u8], orientation: i16) -> [u8; 8] {
    let mut rows = [0u8; 8];
    for (c, &column) in columns.iter().take(8).enumerate() {
        for r in 0..8 {
            if column >> r & 1 != 0 {
                let (digit, bit) = match orientation {
                    0 => (r, 7 - c),
                    -90 => (c, r),
                    90 => (7 - c, 7 - r),
                    _ => (7 - r, c),
                };
                rows[digit] |= 1 << bit;
            }
        }
    }
    rows
}

/// Half-turn of the whole chain: reverse the column order and flip each
/// column top-to-bottom.
fn rotate_half_turn(window: &[u8]) -> Vec<u8> {
    window.iter().rev().map(|col| col.reverse_bits()).collect()
}
