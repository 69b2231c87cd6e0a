use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::{AnyPin, Input, Pull};
use esp_rmt_nec::NecTransmitter;
use nec_codec::{timing::REPEAT_PERIOD_MS, ScanCode};

const DEBOUNCE: Duration = Duration::from_millis(20);
const REPEAT_PERIOD: Duration = Duration::from_millis(REPEAT_PERIOD_MS as u64);

/// Sends `code` every `interval_secs` seconds and whenever the boot key is pressed.
///
/// Holding the key sends repeat frames until it is released. An interval of zero leaves
/// only the key.
#[embassy_executor::task]
pub async fn transmit_task(
    mut tx: NecTransmitter,
    key: AnyPin,
    code: ScanCode,
    interval_secs: u32,
) {
    let mut key = Input::new(key, Pull::Up);
    let interval = (interval_secs != 0).then(|| Duration::from_secs(interval_secs.into()));
    match interval {
        Some(_) => log::info!("transmitting {code} every {interval_secs} s and on key press"),
        None => log::info!("transmitting {code} on key press"),
    }

    loop {
        let pressed = match interval {
            Some(interval) => {
                match select(Timer::after(interval), key.wait_for_falling_edge()).await {
                    Either::First(()) => false,
                    Either::Second(()) => true,
                }
            }
            None => {
                key.wait_for_falling_edge().await;
                true
            }
        };

        if pressed {
            Timer::after(DEBOUNCE).await;
            if key.is_high() {
                continue;
            }
        }

        // Repeats are spaced from the start of the previous frame
        let mut next_frame = Instant::now() + REPEAT_PERIOD;
        match tx.send(code).await {
            Ok(()) => log::info!("sent {code}"),
            Err(e) => {
                log::error!("could not send {code}: {e}");
                continue;
            }
        }

        while pressed && key.is_low() {
            Timer::at(next_frame).await;
            next_frame += REPEAT_PERIOD;
            if key.is_high() {
                break;
            }
            if let Err(e) = tx.send_repeat().await {
                log::error!("could not send repeat: {e}");
                break;
            }
            log::debug!("sent repeat");
        }
    }
}
