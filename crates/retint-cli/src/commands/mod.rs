//! CLI command implementations

pub mod apply;
pub mod color;
pub mod fit;

use std::path::Path;

use anyhow::{Context, Result, bail};
use retint_core::{Color, Rect, TextureImage};

/// Load image from path
pub fn load_image(path: &Path) -> Result<TextureImage> {
    TextureImage::open(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &TextureImage) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Substitute `{id}` in a file name pattern.
pub fn expand_pattern(pattern: &str, id: &str) -> String {
    pattern.replace("{id}", id)
}

fn parse_u32_list<const N: usize>(s: &str, what: &str) -> Result<[u32; N]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        bail!("{what} needs {N} comma-separated values, got '{s}'");
    }
    let mut out = [0u32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid {what} component '{part}'"))?;
    }
    Ok(out)
}

/// `L,T,R,B`
pub fn parse_rect(s: &str) -> Result<Rect> {
    let rect = Rect::from(parse_u32_list::<4>(s, "rectangle")?);
    rect.validate()?;
    Ok(rect)
}

/// `X,Y`
pub fn parse_point(s: &str) -> Result<(u32, u32)> {
    let [x, y] = parse_u32_list::<2>(s, "point")?;
    Ok((x, y))
}

/// `R,G,B` with each component in 0..=255
pub fn parse_color(s: &str) -> Result<Color> {
    let [r, g, b] = parse_u32_list::<3>(s, "color")?;
    let channel = |v: u32| u8::try_from(v).with_context(|| format!("color component {v} exceeds 255"));
    Ok(Color::new(channel(r)?, channel(g)?, channel(b)?))
}
