use asset_reload::game::assets::AssetSystem;
use asset_reload::settings::CliArgs;
use clap::Parser;
use log::{info, warn};
use std::time::Duration;

const THUMBNAIL_SIZE: u32 = 64;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let backend = args.transfer_backend()?;
    let mut assets = AssetSystem::new(&args.asset_root, backend, args.derived_cache_capacity);

    let images = args
        .images
        .iter()
        .map(|path| assets.image(path))
        .collect::<Vec<_>>();

    for image in &images {
        let texture = assets.load_image(image)?;
        let thumbnail = assets.cache().get_scaled(image, THUMBNAIL_SIZE, THUMBNAIL_SIZE)?;
        info!(
            "{}: {}x{} (thumbnail {}x{})",
            image.relative_path(),
            texture.width,
            texture.height,
            thumbnail.width,
            thumbnail.height
        );
    }

    if assets.pending_downloads() > 0 {
        info!("Waiting for {} download(s)", assets.pending_downloads());
    }

    // The frame loop: download errors are fatal and end up at the top level.
    while assets.pending_downloads() > 0 {
        std::thread::sleep(Duration::from_millis(args.tick_ms));
        assets.tick()?;
    }

    for image in &images {
        match assets.load_image(image) {
            Ok(texture) => info!(
                "{}: {}x{} (derived renderings purged {} time(s))",
                image.relative_path(),
                texture.width,
                texture.height,
                assets.cache().derived().purge_count()
            ),
            Err(err) => warn!("{}: {}", image.relative_path(), err),
        }
    }

    Ok(())
}
