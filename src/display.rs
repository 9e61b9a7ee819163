use anyhow::{anyhow, Result};
use viuer::{print, Config as ViuerConfig};
use crate::cli::Args;
use crate::image::ConvertedImage;
use std::io::{IsTerminal, Write};

/// Default width in terminal columns when neither width nor height is given
const DEFAULT_COLUMNS: u32 = 48;

pub fn print_image(image: &ConvertedImage, args: &Args) -> Result<()> {
    let is_tty = std::io::stdout().is_terminal();

    let (config_width, config_height) = match (args.width, args.height) {
        (Some(w), ..) => (Some(w), None),
        (None, Some(h)) => (None, Some(h)),
        (None, None) => (Some(DEFAULT_COLUMNS), None),
    };

    let config = ViuerConfig {
        width: config_width,
        height: config_height,
        absolute_offset: false,
        use_kitty: is_tty,
        use_iterm: is_tty,
        use_sixel: is_tty,
        ..Default::default()
    };

    let dynamic = image.to_dynamic_image()?;

    std::io::stdout().flush()
        .map_err(|e| anyhow!("Failed to flush stdout: {e}"))?;

    print(&dynamic, &config)
        .map_err(|e| anyhow!("Failed to display image: {e}"))?;

    Ok(())
}
