use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::{with_timeout, Duration, TimeoutError, Timer};
use esp_hal::{
    gpio::{AnyPin, Level, Output},
    peripherals::TIMG0,
};
use esp_rmt_nec::NecReceiver;
use nec_codec::{Decoder, Frame, Outcome, RearmAction, RearmPolicy};

use crate::{watchdog::Watchdog, RESET_DELAY};

const FRAME_QUEUE_DEPTH: usize = 2;
const DECODE_WAIT: Duration = Duration::from_secs(1);

/// Captured frames on their way from the capture task to the decode task.
static FRAME_QUEUE: Channel<CriticalSectionRawMutex, Frame, FRAME_QUEUE_DEPTH> = Channel::new();

/// Keeps the receive channel armed and hands every capture to the decode task.
///
/// Never waits on the queue. A capture that arrives while the queue is full is dropped, as
/// is one too long for the receive memory.
#[embassy_executor::task]
pub async fn capture_task(mut rx: NecReceiver) {
    let mut policy = RearmPolicy::default();
    loop {
        match rx.receive().await {
            Ok(frame) => {
                policy.record_success();
                if FRAME_QUEUE.try_send(frame).is_err() {
                    log::debug!("frame queue full; dropping capture");
                }
            }
            Err(e) => match policy.on_fault(e.receive_fault()) {
                RearmAction::Rearm => log::warn!("IR capture dropped: {e}"),
                RearmAction::RetryAfter(delay_ms) => {
                    log::warn!("IR receive failed: {e}; re-arming in {delay_ms} ms");
                    Timer::after_millis(delay_ms.into()).await;
                }
                RearmAction::Escalate => {
                    log::error!(
                        "IR receiver failed {} times in a row: {e}; resetting",
                        policy.failures()
                    );
                    Timer::after(RESET_DELAY).await;
                    esp_hal::reset::software_reset();
                }
            },
        }
    }
}

#[embassy_executor::task]
pub async fn decode_task(mut decoder: Decoder, led: AnyPin, wdt: &'static Watchdog<TIMG0>) {
    let mut led = Output::new(led, Level::Low);
    log::info!("decoding with {} mapped keys", decoder.keymap().len());
    loop {
        wdt.feed().await;
        let frame = match with_timeout(DECODE_WAIT, FRAME_QUEUE.receive()).await {
            Ok(frame) => frame,
            Err(TimeoutError) => continue,
        };

        for (i, s) in frame.iter().enumerate() {
            log::trace!("symbol {i:2}: {:5} {:5}", s.high, s.low);
        }

        let outcome = decoder.dispatch(&frame);
        match outcome {
            Outcome::Key { code, .. } => {
                log::info!("{code} key=0x{:02X}: {outcome}", code.key());
                led.toggle();
            }
            Outcome::Repeat {
                last: Some(code), ..
            } => {
                log::info!("{outcome} {code}");
                led.toggle();
            }
            Outcome::Repeat { last: None, .. } => log::info!("{outcome} with no previous key"),
            Outcome::ParseFailed(_) | Outcome::Unrecognized | Outcome::Unknown { .. } => {
                log::warn!("{outcome}")
            }
        }
    }
}
