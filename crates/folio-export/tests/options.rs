use std::path::{Path, PathBuf};

use folio_export::error::ExportError;
use folio_export::pdf::{Length, Margin, RenderOptions, paper_size};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn defaults_to_a4_at_destination() {
    let options = RenderOptions::default().with_defaults(Path::new("/out/x.pdf"));
    assert_eq!(options.format.as_deref(), Some("A4"));
    assert_eq!(options.path, Some(PathBuf::from("/out/x.pdf")));
}

#[test]
fn supplied_format_and_path_are_kept() {
    let options = RenderOptions {
        format: Some("letter".to_string()),
        path: Some(PathBuf::from("/elsewhere.pdf")),
        ..Default::default()
    }
    .with_defaults(Path::new("/out/x.pdf"));

    assert_eq!(options.format.as_deref(), Some("letter"));
    assert_eq!(options.path, Some(PathBuf::from("/elsewhere.pdf")));
}

#[test]
fn a4_paper_size() {
    let params = RenderOptions::default()
        .with_defaults(Path::new("x.pdf"))
        .to_print_params()
        .unwrap();
    assert_eq!(params.paper_width, Some(8.27));
    assert_eq!(params.paper_height, Some(11.7));
    assert_eq!(params.margin_top, Some(0.0));
}

#[test]
fn formats_are_case_insensitive() {
    assert_eq!(paper_size("Letter"), Some((8.5, 11.0)));
    assert_eq!(paper_size("LEGAL"), Some((8.5, 14.0)));
    assert_eq!(paper_size("a3"), Some((11.7, 16.54)));
    assert_eq!(paper_size("B5"), None);
}

#[test]
fn unknown_format_is_rejected() {
    let options = RenderOptions {
        format: Some("napkin".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        options.to_print_params(),
        Err(ExportError::InvalidOptions(_))
    ));
}

#[test]
fn lengths_convert_to_inches() {
    assert!(close(Length::Pixels(96.0).to_inches().unwrap(), 1.0));
    assert!(close(Length::Text("2in".into()).to_inches().unwrap(), 2.0));
    assert!(close(Length::Text("48px".into()).to_inches().unwrap(), 0.5));
    assert!(close(Length::Text("192".into()).to_inches().unwrap(), 2.0));
    assert!(close(Length::Text("2.54cm".into()).to_inches().unwrap(), 2.54 * 37.8 / 96.0));
    assert!(close(Length::Text("10mm".into()).to_inches().unwrap(), 10.0 * 3.78 / 96.0));
    assert!(Length::Text("wide".into()).to_inches().is_err());
}

#[test]
fn explicit_size_and_margins() {
    let options = RenderOptions {
        width: Some(Length::Text("5in".into())),
        height: Some(Length::Pixels(960.0)),
        landscape: Some(true),
        margin: Some(Margin {
            top: Some(Length::Text("1in".into())),
            left: Some(Length::Pixels(48.0)),
            ..Default::default()
        }),
        ..Default::default()
    };

    let params = options.to_print_params().unwrap();
    assert_eq!(params.paper_width, Some(5.0));
    assert_eq!(params.paper_height, Some(10.0));
    assert_eq!(params.landscape, Some(true));
    assert_eq!(params.margin_top, Some(1.0));
    assert_eq!(params.margin_left, Some(0.5));
    assert_eq!(params.margin_bottom, Some(0.0));
}

#[test]
fn deserializes_from_json() {
    let options: RenderOptions = serde_json::from_value(serde_json::json!({
        "format": "Letter",
        "print_background": true,
        "margin": { "top": "1cm", "bottom": 20 }
    }))
    .unwrap();

    assert_eq!(options.format.as_deref(), Some("Letter"));
    assert_eq!(options.print_background, Some(true));
    let margin = options.margin.unwrap();
    assert_eq!(margin.top, Some(Length::Text("1cm".into())));
    assert_eq!(margin.bottom, Some(Length::Pixels(20.0)));
    assert!(options.path.is_none());
}
