//! Apply command: recolor every configured texture region.

use std::path::Path;

use anyhow::{Context, Result, bail};
use retint_core::TRANSPARENCY_TOLERANCE;
use retint_core::region::{RegionConfig, TextureRegions, apply_regions, draw_region_preview};
use tracing::{error, info, warn};

use super::{expand_pattern, load_image, save_image};
use crate::ApplyArgs;

pub fn run(args: ApplyArgs) -> Result<()> {
    let config = RegionConfig::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;

    let ids: Vec<String> = if args.textures.is_empty() {
        config.texture_ids().map(str::to_owned).collect()
    } else {
        args.textures.clone()
    };
    if ids.is_empty() {
        bail!("No textures configured in {}", args.config.display());
    }

    let mut success = 0;
    let mut failed = 0;
    for id in &ids {
        let Some(regions) = config.texture(id) else {
            warn!("texture {id} not found in config, skipping");
            failed += 1;
            continue;
        };
        match process_texture(&args, id, regions) {
            Ok(()) => success += 1,
            Err(e) => {
                failed += 1;
                error!("texture {id}: {e:#}");
            }
        }
    }

    info!(success, failed, "apply complete");
    println!("Processed: {success} success, {failed} failed");

    if success == 0 {
        bail!("All {failed} textures failed");
    }
    Ok(())
}

fn process_texture(args: &ApplyArgs, id: &str, regions: &TextureRegions) -> Result<()> {
    let dir: &Path = &args.dir;
    let input = dir.join(expand_pattern(&args.input_pattern, id));
    let output = dir.join(expand_pattern(&args.output_pattern, id));

    info!("texture {id}: {} region(s) from {}", regions.len(), input.display());
    let source = load_image(&input)?;
    let (result, reports) = apply_regions(&source, regions, TRANSPARENCY_TOLERANCE);
    save_image(&output, &result)?;

    for report in &reports {
        println!(
            "  {id} / {}: {} rect(s), {} pixel(s)",
            report.name, report.rects, report.pixels
        );
    }
    println!("Saved {}", output.display());

    if !args.no_preview {
        let preview_path = dir.join(expand_pattern(&args.preview_pattern, id));
        let preview = draw_region_preview(&source, regions.values().flat_map(|r| &r.rects));
        save_image(&preview_path, &preview)?;
        info!("region preview written to {}", preview_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retint_core::TextureImage;

    const CONFIG: &str = r#"{
        "1": { "Body": { "params": [0, 0, -50], "rects": [[0, 0, 2, 2]] } },
        "2": { "Body": { "params": [0, 0, -50], "rects": [[0, 0, 2, 2]] } }
    }"#;

    fn args(dir: &Path, textures: Vec<String>) -> ApplyArgs {
        ApplyArgs {
            config: dir.join("regions.json"),
            textures,
            dir: dir.to_path_buf(),
            input_pattern: "texture_{id}_decolored.png".into(),
            output_pattern: "texture_{id}_transformed.png".into(),
            preview_pattern: "texture_{id}_regions_preview.png".into(),
            no_preview: false,
        }
    }

    #[test]
    fn test_missing_texture_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("regions.json"), CONFIG).unwrap();
        TextureImage::new(4, 4, [200, 200, 200, 255])
            .save(&dir.path().join("texture_1_decolored.png"))
            .unwrap();

        run(args(dir.path(), Vec::new())).unwrap();

        let out = TextureImage::open(&dir.path().join("texture_1_transformed.png")).unwrap();
        assert_eq!(out.get(0, 0), Some([100, 100, 100, 255]));
        assert_eq!(out.get(3, 3), Some([200, 200, 200, 255]));
        assert!(dir.path().join("texture_1_regions_preview.png").exists());
        assert!(!dir.path().join("texture_2_transformed.png").exists());
    }

    #[test]
    fn test_all_failed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("regions.json"), CONFIG).unwrap();
        assert!(run(args(dir.path(), vec!["2".into(), "99".into()])).is_err());
    }
}
