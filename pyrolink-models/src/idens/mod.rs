pub mod command;
pub mod device;
pub mod telemetry;

const INIT_DEVICE_ORDER: i32 = 0;
const INIT_COMMAND_ORDER: i32 = INIT_DEVICE_ORDER + 1;
const INIT_TELEMETRY_ORDER: i32 = INIT_COMMAND_ORDER + 1;
