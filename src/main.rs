#![no_std]
#![no_main]
#![feature(impl_trait_in_assoc_type)]

mod built;
mod error;
mod tasks;
mod watchdog;

use board_defs::BoardDef;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    peripherals::{RMT, TIMG0},
    timer::timg::TimerGroup,
};
use esp_hal_embassy::main;
use esp_rmt_nec::NecTransceiver;
use esp_storage::FlashStorage;
use log::info;
use nec_codec::Decoder;
use parameter_store::{EmbeddedStorageIO, ParameterStore, ParameterStoreError, Parameters};

use crate::{error::InitError, watchdog::Watchdog};

/// Offset of the parameter block in flash, the start of the `nvs` partition in the default
/// partition table.
const PARAMETER_ADDRESS: u32 = 0x9000;
/// Time given to the logger to drain before a reset.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

#[main]
async fn main(spawner: Spawner) {
    // Initialize peripherals
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    let board_def = board_defs::board_def!(peripherals);

    // Initialize embassy timer groups
    let timer_g0 = TimerGroup::new(peripherals.TIMG0);
    let timer_g1 = TimerGroup::new(peripherals.TIMG1);
    esp_hal_embassy::init(timer_g1.timer0);

    esp_alloc::heap_allocator!(32 * 1024);

    esp_println::logger::init_logger_from_env();
    info!("Embassy initialized!");

    let wdt0 = watchdog::watchdog_init(timer_g0.wdt);
    info!("Watchdog initialized");

    if let Err(e) = init(spawner, board_def, peripherals.RMT, wdt0) {
        log::error!("initialization failed: {e}");
        log::error!("resetting in {} s", RESET_DELAY.as_secs());
        Timer::after(RESET_DELAY).await;
        esp_hal::reset::software_reset();
    }
}

fn init(
    spawner: Spawner,
    board_def: BoardDef,
    rmt: RMT,
    wdt0: &'static Watchdog<TIMG0>,
) -> Result<(), InitError> {
    let parameters = load_parameters()?;
    info!(
        "parameters: transmit {} every {} s, {} keys",
        parameters.transmit,
        parameters.transmit_interval_secs,
        parameters.keymap.len()
    );

    let transceiver = NecTransceiver::new(rmt, board_def.ir.tx, board_def.ir.rx)?;
    let (tx, rx) = transceiver.split();

    spawner.spawn(tasks::ir_rx::capture_task(rx))?;
    spawner.spawn(tasks::ir_rx::decode_task(
        Decoder::new(parameters.keymap),
        board_def.status_led,
        wdt0,
    ))?;
    spawner.spawn(tasks::ir_tx::transmit_task(
        tx,
        board_def.boot_key,
        parameters.transmit,
        parameters.transmit_interval_secs,
    ))?;
    spawner.spawn(tasks::heap_report())?;
    Ok(())
}

/// Read the parameters from flash, replacing a missing or unreadable block with the built
/// defaults.
fn load_parameters() -> Result<Parameters, InitError> {
    let io = EmbeddedStorageIO::new(FlashStorage::new(), PARAMETER_ADDRESS);
    let mut store = ParameterStore::new(io);
    match store.fetch() {
        Ok(p) => Ok(p),
        Err(e @ (ParameterStoreError::Corrupt | ParameterStoreError::Postcard(_))) => {
            info!("Parameters unusable ({e}); writing defaults");
            let defaults = built::default_parameters()?;
            match store.store(&defaults) {
                Ok(p) => Ok(p),
                Err(e) => {
                    log::warn!("could not store default parameters: {e}");
                    Ok(defaults)
                }
            }
        }
        Err(e) => Err(e.into()),
    }
}
