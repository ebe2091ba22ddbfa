//! Audible feedback on accepted messages.
//!
//! The beep pattern runs on its own task; the request that triggered it
//! never waits for it. A buzzer that fails to come up degrades to a no-op
//! instead of failing daemon startup.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::CdevPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use log::warn;
use tokio::sync::Mutex;

use crate::config::Config;

pub struct Buzzer {
    pin: Option<Arc<Mutex<CdevPin>>>,
    beep_duration: Duration,
    beep_count: u32,
}

impl Buzzer {
    pub fn from_config(config: &Config) -> Self {
        let pin = if config.buzzer_enabled {
            match open_pin(&config.gpio_chip, config.buzzer_pin) {
                Ok(pin) => Some(Arc::new(Mutex::new(pin))),
                Err(e) => {
                    warn!(
                        "buzzer on {} line {} unavailable: {e:#}",
                        config.gpio_chip, config.buzzer_pin
                    );
                    None
                }
            }
        } else {
            None
        };
        Self {
            pin,
            beep_duration: Duration::from_millis(config.beep_duration_ms),
            beep_count: config.beep_count,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_some()
    }

    /// Fire the beep pattern on its own task and return immediately. Write
    /// failures are reported to the operator log and abandoned.
    pub fn spawn_beep(&self) {
        let Some(pin) = self.pin.clone() else { return };
        let on_duration = self.beep_duration;
        let count = self.beep_count;
        tokio::spawn(async move {
            // overlapping beeps from concurrent requests serialize here
            let mut pin = pin.lock().await;
            for _ in 0..count {
                if let Err(e) = pin.set_high() {
                    warn!("buzzer write failed: {e:?}");
                    return;
                }
                tokio::time::sleep(on_duration).await;
                if let Err(e) = pin.set_low() {
                    warn!("buzzer write failed: {e:?}");
                    return;
                }
                tokio::time::sleep(on_duration).await;
            }
        });
    }
}

fn open_pin(gpio_chip: &str, line: u32) -> anyhow::Result<CdevPin> {
    let mut chip = Chip::new(gpio_chip)
        .with_context(|| format!("opening GPIO chip {gpio_chip}"))?;
    let handle = chip
        .get_line(line)
        .context("getting buzzer line")?
        .request(LineRequestFlags::OUTPUT, 0, "dotnote-buzzer")
        .context("requesting buzzer line")?;
    CdevPin::new(handle).context("creating buzzer pin")
}
