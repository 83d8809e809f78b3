use std::fs;
use std::path::PathBuf;

use coolbox::{ConfigError, PaletteConfig, Tool, ToolStrip};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coolbox-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_palette_from_file() {
    let path = scratch_file(
        "palette.json",
        r#"{
            "long_press_ms": 400,
            "tools": [
                { "display_name": "Crop", "icon_id": "tool_crop", "action_id": "KisToolCrop" },
                { "display_name": "Brush", "icon_id": "krita_tool_freehand",
                  "action_id": "KritaShape/KisToolBrush",
                  "sub_tools": [
                    { "display_name": "Line", "icon_id": "krita_tool_line",
                      "action_id": "KritaShape/KisToolLine" }
                  ] }
            ]
        }"#,
    );

    let config = PaletteConfig::load(&path).unwrap();
    assert_eq!(config.long_press_ms, 400);

    let strip = ToolStrip::from_config(&config);
    assert_eq!(strip.tools().len(), 2);
    assert!(!strip.tools()[0].has_sub_tools());
    let names: Vec<&str> = strip.tools()[1]
        .sub_tools()
        .iter()
        .map(Tool::display_name)
        .collect();
    assert_eq!(names, vec!["Line"]);
    assert!(strip.tools().iter().all(|tool| !tool.is_activated()));
}

#[test]
fn test_broken_file_reports_parse_error() {
    let path = scratch_file("broken.json", "{ \"tools\": [ ");
    assert!(matches!(
        PaletteConfig::load(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_round_trip_through_serde_keeps_nesting() {
    let config = PaletteConfig::builtin().unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let reparsed = PaletteConfig::from_json_str(&json).unwrap();
    assert_eq!(config, reparsed);
}
