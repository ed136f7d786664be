//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one module preset end
//! to end through [`NodeService::from_config`](vanmodule::app::service::NodeService::from_config)
//! against mock hardware.  All tests run on the host with no real
//! hardware required.

mod heater_tests;
mod mock_hw;
mod transport_tests;
mod water_tests;
