use std::fs;

use glaze_glass::prelude::*;

#[test]
fn surface_config_loads_from_file() {
    let path = std::env::temp_dir().join(format!("glaze-surface-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
        variant = "subtle"

        [overrides]
        frost = 0.9

        [attributes]
        class_names = ["card"]
        "#,
    )
    .unwrap();

    let config = SurfaceConfig::from_file(&path);
    let _ = fs::remove_file(&path);
    let config = config.unwrap();

    let allocator = FilterIdAllocator::new();
    let surface = GlassSurface::mount(&allocator, config, Layer::empty());
    assert_eq!(surface.variant(), VariantName::Subtle);
    assert_eq!(surface.config().frost, 0.9);
    assert_eq!(
        surface.render().props().class_names.as_slice(),
        ["card".to_string()]
    );
}

#[test]
fn parse_errors_name_the_problem() {
    let err = SurfaceConfig::from_toml_str("[overrides]\nfrost = \"lots\"").unwrap_err();
    assert!(matches!(err, GlassError::Config(_)));
    assert!(err.to_string().starts_with("config parse error"), "{err}");
}
