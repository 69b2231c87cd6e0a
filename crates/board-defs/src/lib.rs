#![no_std]

mod boards;

pub use esp_hal;
use esp_hal::gpio::AnyPin;

pub struct IrPinDef {
    /// Drives the IR LED.
    pub tx: AnyPin,
    /// Output of the demodulating IR receiver.
    pub rx: AnyPin,
}

pub struct BoardDef {
    /// Active-low push button.
    pub boot_key: AnyPin,
    pub status_led: AnyPin,
    pub ir: IrPinDef,
}

#[cfg(not(any(feature = "atk-dnesp32s3", feature = "adafruit-feather-s3")))]
compile_error!("select a board feature");

#[cfg(all(feature = "atk-dnesp32s3", feature = "adafruit-feather-s3"))]
compile_error!("select exactly one board feature; add --no-default-features for a non-default board");
