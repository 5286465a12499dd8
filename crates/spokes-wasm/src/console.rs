//! Browser console output for `log` records and panics.

use std::sync::Once;

/// Route `log` to the browser console and report panics through
/// `console.error`. Safe to call more than once; a logger installed by the
/// host wins. Off wasm32 this does nothing and native hosts keep their own
/// logger.
pub fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = console_log::init_with_level(log::Level::Info);
            console_error_panic_hook::set_once();
            log::debug!("console logging installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_twice_is_harmless() {
        install();
        install();
        log::info!("still logging after repeated install");
    }
}
