use qrstudio::{
    Background, BrandLogo, Color, ColorMode, ContentKind, ExportFormat, Exporter, Field, Logo, ObjectUrlStore,
    RenderedQr, Resolution, Session, StyleRecord,
};

fn url_session(url: &str) -> Session {
    let mut session = Session::new(ContentKind::Url);
    session.set_field(Field::Url, url).unwrap();
    session
}

/// Pixel center of the first dark module of the top-left finder pattern.
fn finder_pixel(rendered: &RenderedQr, canvas: u32) -> (u32, u32) {
    let cells = rendered
        .svg
        .split("viewBox=\"0 0 ")
        .nth(1)
        .and_then(|rest| rest.split(' ').next())
        .and_then(|n| n.parse::<f32>().ok())
        .unwrap();
    let px = (4.5 * canvas as f32 / cells) as u32;
    (px, px)
}

#[test]
fn test_every_format_is_written() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let session = url_session("https://example.com");
    let dir = tempfile::tempdir().unwrap();

    for (format, magic) in [
        (ExportFormat::Png, &b"\x89PNG"[..]),
        (ExportFormat::Jpg, &b"\xFF\xD8"[..]),
        (ExportFormat::Svg, &b"<svg"[..]),
        (ExportFormat::Pdf, &b"%PDF"[..]),
    ] {
        let file = session
            .export(&exporter, &store, format, Resolution::Small)
            .unwrap()
            .unwrap();
        let path = exporter.download(&file, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), format!("qrcode.{}", format.extension()).as_str());
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(magic), "{format}");
        assert!(store.is_empty(), "object URLs left behind after {format}");
    }
}

#[test]
fn test_raster_exports_match_resolution() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let session = url_session("https://example.com");

    for resolution in Resolution::ALL {
        let file = session
            .export(&exporter, &store, ExportFormat::Jpg, resolution)
            .unwrap()
            .unwrap();
        let img = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!(img.width(), resolution.pixels());
        assert_eq!(img.height(), resolution.pixels());
    }
}

#[test]
fn test_empty_payload_exports_nothing() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let session = Session::new(ContentKind::Wifi);
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(session.export(&exporter, &store, ExportFormat::Png, Resolution::Large).unwrap(), None);

    let rendered = RenderedQr {
        payload: String::new(),
        svg: String::new(),
        size: 280,
    };
    let path = exporter
        .export_to(&rendered, &session.style, ExportFormat::Pdf, Resolution::Small, dir.path())
        .unwrap();
    assert_eq!(path, None);
    assert!(store.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_broken_markup_aborts_and_releases_urls() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let rendered = RenderedQr {
        payload: "https://example.com".to_string(),
        svg: "<svg><unclosed".to_string(),
        size: 280,
    };

    let file = exporter
        .export(&rendered, &StyleRecord::default(), ExportFormat::Png, Resolution::Small)
        .unwrap();
    assert_eq!(file, None);
    assert!(store.is_empty());
}

#[test]
fn test_missing_logo_still_exports() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let mut session = url_session("https://example.com");
    session.style.logo = Logo::Custom("/no/such/logo.png".to_string());

    let file = session
        .export(&exporter, &store, ExportFormat::Png, Resolution::Small)
        .unwrap();
    assert!(file.is_some());
    assert!(store.is_empty());
}

#[test]
fn test_undecodable_logo_still_exports() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let url = store.create(b"not an image".to_vec(), "image/png");
    let mut session = url_session("https://example.com");
    session.style.logo = Logo::Custom(url.clone());

    assert!(session
        .export(&exporter, &store, ExportFormat::Svg, Resolution::Small)
        .unwrap()
        .is_some());
    assert!(store.revoke(&url));
    assert!(store.is_empty());
}

#[test]
fn test_png_keeps_colors_and_transparency() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let mut session = url_session("https://example.com");
    session.style.fg_color = Color::INDIGO;
    session.style.background = Background::Transparent;

    let rendered = session.render(&store).unwrap().unwrap();
    let file = exporter
        .export(&rendered, &session.style, ExportFormat::Png, Resolution::Medium)
        .unwrap()
        .unwrap();
    let img = image::load_from_memory(&file.bytes).unwrap().to_rgba8();

    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    let (x, y) = finder_pixel(&rendered, 1000);
    assert_eq!(img.get_pixel(x, y).0, [0x4F, 0x46, 0xE5, 0xFF]);
}

#[test]
fn test_jpg_flattens_transparency_to_white() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let mut session = url_session("https://example.com");
    session.style.background = Background::Transparent;

    let file = session
        .export(&exporter, &store, ExportFormat::Jpg, Resolution::Small)
        .unwrap()
        .unwrap();
    let img = image::load_from_memory(&file.bytes).unwrap().to_rgb8();
    let [r, g, b] = img.get_pixel(2, 2).0;
    assert!(r > 245 && g > 245 && b > 245);
}

#[test]
fn test_gradient_brand_logo_export() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let mut session = url_session("https://www.linkedin.com/in/someone");
    session.style.color_mode = ColorMode::Gradient;
    session.style.logo = Logo::Brand(BrandLogo::Linkedin);

    let rendered = session.render(&store).unwrap().unwrap();
    assert!(rendered.svg.contains("linearGradient"));
    let file = exporter
        .export(&rendered, &session.style, ExportFormat::Png, Resolution::Small)
        .unwrap()
        .unwrap();
    let img = image::load_from_memory(&file.bytes).unwrap().to_rgba8();
    // 100px logo centered on a 500px canvas; (215, 215) is inside its blue tile
    assert_eq!(img.get_pixel(215, 215).0, [0x0A, 0x66, 0xC2, 0xFF]);
}

#[test]
fn test_pdf_has_one_a4_page() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let file = url_session("https://example.com")
        .export(&exporter, &store, ExportFormat::Pdf, Resolution::Small)
        .unwrap()
        .unwrap();

    let doc = lopdf::Document::load_mem(&file.bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page_id = *pages.values().next().unwrap();

    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let media_box: Vec<f64> = page
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(number)
        .collect();
    assert_close(&media_box, &[0.0, 0.0, 595.28, 841.89]);

    // square raster scaled to the full page width, hanging from the top edge
    let content = lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let cm = content
        .operations
        .iter()
        .find(|op| op.operator == "cm")
        .unwrap();
    let matrix: Vec<f64> = cm.operands.iter().map(number).collect();
    assert_close(&matrix, &[595.28, 0.0, 0.0, 595.28, 0.0, 841.89 - 595.28]);
    assert!(content.operations.iter().any(|op| op.operator == "Do"));
}

fn number(object: &lopdf::Object) -> f64 {
    match object {
        lopdf::Object::Integer(i) => *i as f64,
        lopdf::Object::Real(r) => *r as f64,
        other => panic!("expected a number, got {other:?}"),
    }
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_download_creates_missing_directory() {
    let store = ObjectUrlStore::new();
    let exporter = Exporter::new(&store);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out");

    let rendered = url_session("https://example.com").render(&store).unwrap().unwrap();
    let path = exporter
        .export_to(&rendered, &StyleRecord::default(), ExportFormat::Png, Resolution::Small, &target)
        .unwrap()
        .unwrap();
    assert_eq!(path, target.join("qrcode.png"));
    assert!(path.exists());
    assert!(store.is_empty());
}
