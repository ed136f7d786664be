//! Pin and channel-id assignments of the two shipped boards.
//!
//! These tables only seed the [`ModuleConfig`](crate::config::ModuleConfig)
//! presets; drivers take their pins from the config.

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// Channel of the device identity grammar on every board.
pub const ADMIN_CHANNEL: &str = "0001";

// ---------------------------------------------------------------------------
// Heater board: 4 zones, DS18B20 probe + PWM fan per zone
// ---------------------------------------------------------------------------

pub const HEATER_NAMES: [&str; 4] = ["heater_0", "heater_1", "heater_2", "heater_3"];
pub const HEATER_CHANNELS: [&str; 4] = ["0002", "0003", "0004", "0005"];
/// One-wire data line per zone.
pub const HEATER_SENSOR_GPIOS: [i32; 4] = [4, 5, 13, 15];
/// LEDC PWM output per zone; LEDC channel = zone index.
pub const HEATER_FAN_GPIOS: [i32; 4] = [16, 17, 18, 19];

pub const ENVIRONMENT_CHANNEL: &str = "0006";
/// Exterior DS18B20 one-wire line.
pub const EXTERIOR_SENSOR_GPIO: i32 = 25;
/// BME280 on I²C0.
pub const BME280_SDA_GPIO: i32 = 21;
pub const BME280_SCL_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Water board: two ultrasonic tanks, one grey-water valve relay
// ---------------------------------------------------------------------------

pub const CLEAN_TANK_CHANNEL: &str = "0002";
pub const GREY_TANK_CHANNEL: &str = "0003";
pub const GREY_VALVE_CHANNEL: &str = "0004";

/// Sensor TX (white wire) → ESP RX.
pub const CLEAN_TANK_UART_RX_GPIO: i32 = 4;
pub const CLEAN_TANK_UART_TX_GPIO: i32 = 5;
pub const GREY_TANK_UART_RX_GPIO: i32 = 16;
pub const GREY_TANK_UART_TX_GPIO: i32 = 17;

/// Grey-water valve relay, active HIGH.
pub const GREY_VALVE_RELAY_GPIO: i32 = 23;
