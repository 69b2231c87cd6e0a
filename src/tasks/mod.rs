pub mod ir_rx;
pub mod ir_tx;

use embassy_time::Timer;

#[embassy_executor::task]
pub async fn heap_report() {
    loop {
        let stats = esp_alloc::HEAP.stats();
        log::info!("{}", stats);
        Timer::after_secs(60).await;
    }
}
