use thunder::http::mime::{Category, ContentType, TransferMode};

#[test]
fn test_text_extensions_resolve_to_text_category() {
    for ext in ["html", "css", "txt"] {
        let ct = ContentType::from_extension(ext);
        assert_eq!(ct.category, Category::Text, "extension {ext}");
    }
}

#[test]
fn test_txt_maps_to_plain_subtype() {
    let ct = ContentType::from_extension("txt");
    assert_eq!(ct.subtype, "plain");
    assert_eq!(ct.to_string(), "text/plain");
}

#[test]
fn test_image_extensions_resolve_to_image_category() {
    for ext in ["png", "jpg", "jpeg", "gif", "svg+xml", "webp"] {
        let ct = ContentType::from_extension(ext);
        assert_eq!(ct.category, Category::Image, "extension {ext}");
        assert_eq!(ct.subtype, ext);
    }
}

#[test]
fn test_unknown_extension_falls_through_to_application() {
    for ext in ["pdf", "zip", "wasm", "tar"] {
        let ct = ContentType::from_extension(ext);
        assert_eq!(ct.category, Category::Application, "extension {ext}");
        assert_eq!(ct.subtype, ext);
        assert_eq!(ct.to_string(), format!("application/{ext}"));
    }
}

#[test]
fn test_display_is_category_slash_subtype() {
    assert_eq!(ContentType::from_extension("html").to_string(), "text/html");
    assert_eq!(ContentType::from_extension("png").to_string(), "image/png");
}

#[test]
fn test_parse_text_and_image_categories() {
    let ct = ContentType::parse("text/plain").unwrap();
    assert_eq!(ct.category, Category::Text);
    assert_eq!(ct.subtype, "plain");

    let ct = ContentType::parse("image/png").unwrap();
    assert_eq!(ct.category, Category::Image);
    assert_eq!(ct.subtype, "png");
}

#[test]
fn test_parse_unknown_category_normalizes_to_application() {
    let ct = ContentType::parse("video/mp4").unwrap();
    assert_eq!(ct.category, Category::Application);
    assert_eq!(ct.subtype, "mp4");
}

#[test]
fn test_parse_without_separator_is_none() {
    assert!(ContentType::parse("plain").is_none());
    assert!(ContentType::parse("").is_none());
}

#[test]
fn test_transfer_mode_binary_only_for_images() {
    assert_eq!(
        ContentType::from_extension("png").transfer_mode(),
        TransferMode::Binary
    );
    assert_eq!(
        ContentType::from_extension("html").transfer_mode(),
        TransferMode::Text
    );
    assert_eq!(
        ContentType::from_extension("zip").transfer_mode(),
        TransferMode::Text
    );
}

#[test]
fn test_storage_extension_inverts_plain_to_txt() {
    assert_eq!(
        ContentType::parse("text/plain").unwrap().storage_extension(),
        "txt"
    );
    assert_eq!(
        ContentType::parse("image/png").unwrap().storage_extension(),
        "png"
    );
    assert_eq!(
        ContentType::parse("text/html").unwrap().storage_extension(),
        "html"
    );
}
