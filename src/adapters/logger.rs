//! Log backend selection.
//!
//! On ESP-IDF the `log` facade is routed to the IDF console through
//! `esp_idf_logger`.  On the host nothing is installed; test binaries
//! that want output install their own logger.

/// Install the platform logger.  Call once at boot.
#[cfg(target_os = "espidf")]
pub fn init() -> anyhow::Result<()> {
    esp_idf_logger::init()?;
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init() -> anyhow::Result<()> {
    Ok(())
}
