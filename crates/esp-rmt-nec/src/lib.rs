#![no_std]

use embassy_time::{with_timeout, Duration};
use esp_hal::{
    gpio::{
        interconnect::{PeripheralInput, PeripheralOutput},
        Level,
    },
    peripheral::Peripheral,
    peripherals::RMT,
    rmt::{
        Channel, PulseCode, Rmt, RxChannelAsync, RxChannelConfig, RxChannelCreatorAsync,
        TxChannelAsync, TxChannelConfig, TxChannelCreatorAsync,
    },
    Async,
};
use fugit::RateExtU32 as _;
use nec_codec::{
    encode_repeat, encode_scan_code,
    timing::{MAX_FRAME_SYMBOLS, TRANSMIT_TIMEOUT_MS},
    Frame, ReceiveFault, ScanCode, Symbol,
};

const RMT_CLOCK_MHZ: u32 = 80;
/// Divides the RMT source clock down to one tick per microsecond.
const RMT_CLOCK_DIVIDER: u8 = RMT_CLOCK_MHZ as u8;

const CARRIER_HZ: u32 = 38_000;
const CARRIER_DUTY_PERCENT: u32 = 33;
// The carrier counters run on the undivided source clock.
const CARRIER_PERIOD: u32 = RMT_CLOCK_MHZ * 1_000_000 / CARRIER_HZ;
const CARRIER_HIGH: u16 = (CARRIER_PERIOD * CARRIER_DUTY_PERCENT / 100) as u16;
const CARRIER_LOW: u16 = (CARRIER_PERIOD - CARRIER_PERIOD * CARRIER_DUTY_PERCENT / 100) as u16;

/// A space longer than this ends a reception, in ticks. Longer than any NEC space, shorter
/// than the gap between a frame and its first repeat.
const RX_IDLE_THRESHOLD: u16 = 12_000;
/// Pulses shorter than this many source clock cycles are glitches.
const RX_FILTER_THRESHOLD: u8 = 100;

const TX_TIMEOUT: Duration = Duration::from_millis(TRANSMIT_TIMEOUT_MS as u64);

#[derive(Debug, thiserror::Error)]
pub enum NecError {
    #[error("Rmt error: {0:?}")]
    Rmt(esp_hal::rmt::Error),
    #[error("transmission timed out")]
    Timeout,
    #[error("capture overran the receive memory")]
    Overrun,
}

impl NecError {
    /// How the receive loop should treat this error.
    pub fn receive_fault(&self) -> ReceiveFault {
        match self {
            NecError::Overrun => ReceiveFault::Overrun,
            NecError::Rmt(_) | NecError::Timeout => ReceiveFault::Arm,
        }
    }
}

impl From<esp_hal::rmt::Error> for NecError {
    fn from(value: esp_hal::rmt::Error) -> Self {
        NecError::Rmt(value)
    }
}

/// Owns the RMT peripheral with one transmit channel driving the IR LED and one receive
/// channel attached to the demodulating IR receiver.
pub struct NecTransceiver {
    tx: NecTransmitter,
    rx: NecReceiver,
}

impl NecTransceiver {
    pub fn new<'d>(
        rmt: impl Peripheral<P = RMT> + 'd,
        tx: impl Peripheral<P = impl PeripheralOutput> + 'd,
        rx: impl Peripheral<P = impl PeripheralInput> + 'd,
    ) -> Result<NecTransceiver, NecError> {
        let rmt = Rmt::new(rmt, RMT_CLOCK_MHZ.MHz())?.into_async();

        let tx_config = TxChannelConfig {
            clk_divider: RMT_CLOCK_DIVIDER,
            idle_output_level: Level::Low,
            idle_output: true,
            carrier_modulation: true,
            carrier_high: CARRIER_HIGH,
            carrier_low: CARRIER_LOW,
            carrier_level: Level::High,
            ..TxChannelConfig::default()
        };
        let tx_channel = rmt.channel0.configure(tx, tx_config)?;

        let rx_config = RxChannelConfig {
            clk_divider: RMT_CLOCK_DIVIDER,
            idle_threshold: RX_IDLE_THRESHOLD,
            filter_threshold: RX_FILTER_THRESHOLD,
            ..RxChannelConfig::default()
        };
        let rx_channel = rmt.channel4.configure(rx, rx_config)?;

        log::info!(
            "NEC transceiver ready: carrier {CARRIER_HZ} Hz ({CARRIER_HIGH}/{CARRIER_LOW})"
        );
        Ok(NecTransceiver {
            tx: NecTransmitter {
                channel: tx_channel,
            },
            rx: NecReceiver {
                channel: rx_channel,
            },
        })
    }

    pub fn split(self) -> (NecTransmitter, NecReceiver) {
        (self.tx, self.rx)
    }
}

pub struct NecTransmitter {
    channel: Channel<Async, 0>,
}

impl NecTransmitter {
    /// Send a full frame carrying `code`.
    pub async fn send(&mut self, code: ScanCode) -> Result<(), NecError> {
        self.transmit(&encode_scan_code(code)).await
    }

    /// Send a repeat frame.
    pub async fn send_repeat(&mut self) -> Result<(), NecError> {
        self.transmit(&encode_repeat()).await
    }

    async fn transmit(&mut self, symbols: &[Symbol]) -> Result<(), NecError> {
        let mut signal: heapless::Vec<u32, MAX_FRAME_SYMBOLS> = heapless::Vec::new();
        for s in symbols.iter().take(MAX_FRAME_SYMBOLS - 1) {
            // SAFETY: take() leaves room for the end marker
            signal.push(PulseCode::new(true, s.high, false, s.low)).ok();
        }
        signal.push(0).ok(); // empty pulse; end of pulse train

        with_timeout(TX_TIMEOUT, self.channel.transmit(&signal))
            .await
            .map_err(|_| NecError::Timeout)??;
        Ok(())
    }
}

pub struct NecReceiver {
    channel: Channel<Async, 4>,
}

impl NecReceiver {
    /// Arm the receive channel and wait for one complete reception.
    ///
    /// A burst longer than the channel memory fails with [`NecError::Overrun`]; the channel
    /// can be armed again immediately.
    pub async fn receive(&mut self) -> Result<Frame, NecError> {
        let mut buffer = [0u32; MAX_FRAME_SYMBOLS];
        match self.channel.receive(&mut buffer).await {
            Ok(()) => (),
            // Raised by the channel error interrupt when the RAM block fills up
            Err(esp_hal::rmt::Error::ReceiverError) => return Err(NecError::Overrun),
            Err(e) => return Err(e.into()),
        }
        Ok(Frame::from_durations(
            buffer.iter().map(|code| (code.length1(), code.length2())),
        ))
    }
}
