use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use esp_hal::{
    peripherals::TIMG0,
    timer::timg::{MwdtStage, TimerGroupInstance, Wdt},
};
use fugit::ExtU64;
use static_cell::StaticCell;

/// Several decode timeouts in a row must pass before the chip resets.
const WATCHDOG_TIMEOUT_US: u64 = 5_000_000;

static WATCHDOG0: StaticCell<Watchdog<TIMG0>> = StaticCell::new();

pub fn watchdog_init(wdt0: Wdt<TIMG0>) -> &'static Watchdog<TIMG0> {
    WATCHDOG0.init(Watchdog::new(wdt0))
}

pub struct Watchdog<TIMG> {
    wdt: Mutex<CriticalSectionRawMutex, Wdt<TIMG>>,
}

impl<TIMG> Watchdog<TIMG>
where
    TIMG: TimerGroupInstance,
{
    pub fn new(mut wdt: Wdt<TIMG>) -> Watchdog<TIMG> {
        wdt.set_timeout(MwdtStage::Stage0, WATCHDOG_TIMEOUT_US.micros());
        wdt.enable();
        wdt.feed();
        Watchdog {
            wdt: Mutex::new(wdt),
        }
    }

    pub async fn feed(&self) {
        self.wdt.lock().await.feed();
    }
}
