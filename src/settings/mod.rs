use crate::io::download::backend::TransferBackend;
use clap::Parser;
use clap::builder::FalseyValueParser;

#[cfg(not(target_arch = "wasm32"))]
pub use crate::io::download::threaded::DEFAULT_ORIGIN;
#[cfg(target_arch = "wasm32")]
pub const DEFAULT_ORIGIN: &str = "game/";

#[derive(Parser, Debug)]
#[command(name = "asset-reload")]
#[command(version)]
#[command(about = "Loads images, downloading the ones that are missing locally")]
pub struct CliArgs {
    #[arg(long, env = "ASSET_RELOAD_ROOT", default_value_t = default_asset_root())]
    pub asset_root: String,

    #[arg(
        long,
        env = "ASSET_RELOAD_SIMULATE_DOWNLOAD",
        value_parser = FalseyValueParser::new(),
        help = "Download missing assets from --origin on a background thread, like a web build would"
    )]
    pub simulate_download: bool,

    #[arg(long, env = "ASSET_RELOAD_ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    #[arg(long, default_value_t = 256, help = "How many scaled renderings to keep around")]
    pub derived_cache_capacity: usize,

    #[arg(long, default_value_t = 16, help = "Milliseconds between two polls of the download queue")]
    pub tick_ms: u64,

    /// Images to load, relative to the asset root
    pub images: Vec<String>,
}

pub fn default_asset_root() -> String {
    std::env::current_dir()
        .map(|dir| dir.join("game"))
        .unwrap_or_else(|_| "game".into())
        .to_string_lossy()
        .to_string()
}

impl CliArgs {
    /// Picks the one way missing assets are fetched for the rest of the run.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn transfer_backend(&self) -> anyhow::Result<TransferBackend> {
        use crate::io::download::threaded::ThreadedHttpBackend;
        use anyhow::Context;

        if !self.simulate_download {
            return Ok(TransferBackend::Disabled);
        }

        let origin = reqwest::Url::parse(&self.origin).with_context(|| format!("Invalid origin {}", self.origin))?;
        Ok(TransferBackend::ThreadedHttp(ThreadedHttpBackend::new(
            origin,
            &self.asset_root,
        )?))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn transfer_backend(&self) -> anyhow::Result<TransferBackend> {
        use crate::io::download::browser::BrowserBackend;

        Ok(TransferBackend::Browser(BrowserBackend::new(
            self.origin.clone(),
            &self.asset_root,
        )))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use crate::io::download::backend::TransferBackend;
    use crate::settings::{CliArgs, DEFAULT_ORIGIN};
    use clap::Parser;
    use std::sync::Mutex;

    const SIMULATE_DOWNLOAD: &str = "ASSET_RELOAD_SIMULATE_DOWNLOAD";
    const ORIGIN: &str = "ASSET_RELOAD_ORIGIN";

    // Every test parses the arguments, and parsing reads the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parse_with_env(env: &[(&str, &str)], args: &[&str]) -> Result<CliArgs, clap::Error> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // SAFETY: only ever touched while holding ENV_LOCK, and nothing else in this crate reads
        // these variables.
        unsafe {
            std::env::remove_var(SIMULATE_DOWNLOAD);
            std::env::remove_var(ORIGIN);
            for (key, value) in env {
                std::env::set_var(key, value);
            }
        }

        let result = CliArgs::try_parse_from(std::iter::once("asset-reload").chain(args.iter().copied()));

        // SAFETY: see above.
        unsafe {
            for (key, _) in env {
                std::env::remove_var(key);
            }
        }
        result
    }

    #[test]
    pub fn downloads_are_disabled_by_default() {
        let args = parse_with_env(&[], &["--asset-root", "/tmp/game", "images/bg.png"]).unwrap();
        assert!(!args.simulate_download);
        assert_eq!(args.origin, DEFAULT_ORIGIN);
        assert_eq!(args.images, vec!["images/bg.png".to_string()]);
        assert!(matches!(
            args.transfer_backend().unwrap(),
            TransferBackend::Disabled
        ));
    }

    #[test]
    pub fn simulated_downloads_use_threaded_http() {
        let args = parse_with_env(
            &[],
            &[
                "--asset-root",
                "/tmp/game",
                "--simulate-download",
                "--origin",
                "http://localhost:9000/game/",
            ],
        )
        .unwrap();
        assert!(args.simulate_download);

        match args.transfer_backend().unwrap() {
            TransferBackend::ThreadedHttp(backend) => {
                assert_eq!(backend.origin().as_str(), "http://localhost:9000/game/")
            }
            other => panic!("Expected the threaded backend, got {:?}", other),
        }
    }

    #[test]
    pub fn environment_enables_simulated_downloads() {
        for value in ["1", "true", "yes", "on", "TRUE"] {
            let args = parse_with_env(&[(SIMULATE_DOWNLOAD, value)], &["--asset-root", "/tmp/game"]).unwrap();
            assert!(args.simulate_download, "{} should enable downloads", value);
            assert!(matches!(
                args.transfer_backend().unwrap(),
                TransferBackend::ThreadedHttp(_)
            ));
        }
    }

    #[test]
    pub fn falsey_environment_keeps_downloads_disabled() {
        for value in ["0", "false", "no", "off", "n", "f", "False"] {
            let args = parse_with_env(&[(SIMULATE_DOWNLOAD, value)], &["--asset-root", "/tmp/game"]).unwrap();
            assert!(!args.simulate_download, "{} should not enable downloads", value);
            assert!(matches!(
                args.transfer_backend().unwrap(),
                TransferBackend::Disabled
            ));
        }
    }

    #[test]
    pub fn environment_sets_the_origin() {
        let args = parse_with_env(
            &[(SIMULATE_DOWNLOAD, "1"), (ORIGIN, "http://example.com:8000/web/")],
            &["--asset-root", "/tmp/game"],
        )
        .unwrap();

        match args.transfer_backend().unwrap() {
            TransferBackend::ThreadedHttp(backend) => {
                assert_eq!(backend.origin().as_str(), "http://example.com:8000/web/")
            }
            other => panic!("Expected the threaded backend, got {:?}", other),
        }
    }

    #[test]
    pub fn invalid_origin_is_rejected() {
        let args = parse_with_env(&[], &["--simulate-download", "--origin", "not a url"]).unwrap();
        assert!(args.transfer_backend().is_err());
    }
}
