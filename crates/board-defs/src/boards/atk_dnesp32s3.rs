#![cfg(feature = "atk-dnesp32s3")]

#[macro_export]
macro_rules! board_def {
    ($peripherals:ident) => {{
        use $crate::esp_hal::gpio::Pin;
        $crate::BoardDef {
            boot_key: $peripherals.GPIO0.degrade(),
            status_led: $peripherals.GPIO1.degrade(),
            ir: $crate::IrPinDef {
                tx: $peripherals.GPIO8.degrade(),
                rx: $peripherals.GPIO2.degrade(),
            },
        }
    }};
}
