use std::io::Cursor;

use bitmap_hues::{
    AnalysisError, AnalysisOptions, BUCKET_SIZE, MinAlpha, palette_from_bytes, palette_from_file,
    palette_from_pixels,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

fn png(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn every_pixel() -> AnalysisOptions {
    AnalysisOptions { quality: 1, ..Default::default() }
}

#[test]
fn red_blue_png_report() {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

    let report = palette_from_bytes("red-blue.png", &png(img), &every_pixel(), &MinAlpha::default()).unwrap();
    assert_eq!(report.path, "red-blue.png");
    let peaks: Vec<&str> = report.hues.bins.iter().map(|b| b.peak.hex.as_str()).collect();
    assert_eq!(peaks, vec!["#ff0000", "#0000ff"]);
    assert!(report.hues.is_dark_compatible);

    let mut palette = report.palette.clone();
    palette.sort();
    assert_eq!(palette, vec!["#0000ff".to_string(), "#ff0000".to_string()]);
}

#[test]
fn json_matches_published_shape() {
    let img = RgbaImage::from_pixel(4, 4, Rgba([0, 200, 100, 255]));
    let report = palette_from_bytes("green.png", &png(img), &every_pixel(), &MinAlpha::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["path"], "green.png");
    assert_eq!(json["hues"]["isDarkCompatible"], true);
    let bin = &json["hues"]["bins"][0];
    for key in ["peakHue", "firstHue", "lastHue", "allHueTotals", "peakTotals", "peak", "left", "right"] {
        assert!(bin.get(key).is_some(), "missing {key}");
    }
    assert_eq!(bin["peakTotals"]["px"], 16);
    assert_eq!(json["palette"].as_array().unwrap().len(), 1);
}

#[test]
fn transparent_png_has_no_bins() {
    let img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 0]));
    let report = palette_from_bytes("clear.png", &png(img), &every_pixel(), &MinAlpha::default()).unwrap();
    assert!(report.hues.bins.is_empty());
    assert!(report.hues.is_dark_compatible);
    assert!(report.palette.is_empty());
}

#[test]
fn gradient_bins_are_contiguous_and_significant() {
    let img = RgbaImage::from_fn(360, 4, |x, y| {
        let hslc_h = x as f64 / 360.0;
        let [r, g, b] = bitmap_hues::hsl_to_rgb(hslc_h, 0.9, 0.3 + 0.1 * y as f64);
        Rgba([r.round() as u8, g.round() as u8, b.round() as u8, 255])
    });
    let pixels = img.into_raw();
    let report = palette_from_pixels("rainbow", &pixels, &every_pixel(), &MinAlpha::default()).unwrap();
    assert!(!report.hues.bins.is_empty());

    for summary in &report.hues.bins {
        let bin = summary.bin;
        let run: Vec<u16> = bin.hues().collect();
        assert!(run.contains(&bin.peak_hue));
        for pair in run.windows(2) {
            assert_eq!((pair[0] + BUCKET_SIZE) % 360, pair[1]);
        }
        assert_eq!(summary.peak.h, bin.peak_hue);
        assert_eq!(summary.left.h, bin.first_hue);
        assert_eq!(summary.right.h, bin.last_hue);
    }
}

#[test]
fn white_image_is_not_dark_compatible() {
    let img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
    let report = palette_from_bytes("white.png", &png(img), &AnalysisOptions::default(), &MinAlpha::default()).unwrap();
    assert!(report.hues.bins.is_empty());
    assert!(!report.hues.is_dark_compatible);
    assert_eq!(report.palette, vec!["#ffffff".to_string()]);
}

#[test]
fn errors_surface_to_the_caller() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
    let bad_quality = AnalysisOptions { quality: -1, ..Default::default() };
    assert!(matches!(
        palette_from_bytes("x.png", &png(img), &bad_quality, &MinAlpha::default()),
        Err(AnalysisError::InvalidQuality(-1))
    ));
    assert!(matches!(
        palette_from_bytes("x.png", b"not a png", &AnalysisOptions::default(), &MinAlpha::default()),
        Err(AnalysisError::Decode(_))
    ));
}

#[test]
fn file_report_matches_bytes_report() {
    let img = RgbaImage::from_fn(6, 3, |x, _| {
        if x < 3 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 160, 255, 255]) }
    });
    let bytes = png(img);
    let path = std::env::temp_dir().join(format!("bitmap_hues_report_{}.png", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();

    let from_file = palette_from_file(&path, &every_pixel(), &MinAlpha::default());
    std::fs::remove_file(&path).unwrap();
    let from_file = from_file.unwrap();
    let from_bytes =
        palette_from_bytes(path.display().to_string(), &bytes, &every_pixel(), &MinAlpha::default()).unwrap();

    assert_eq!(from_file, from_bytes);
    assert_eq!(from_file.hues.bins.len(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = palette_from_file("/nonexistent/bitmap_hues/none.png", &every_pixel(), &MinAlpha::default())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Io(_)));
}
