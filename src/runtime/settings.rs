use m3usync::config;

/// Load settings, falling back to defaults when the config cannot be read.
/// Logging is not up yet, so problems go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => s,
        Err(e) => {
            // Config is optional; flags can still supply everything a job needs.
            eprintln!("m3usync: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
