// SPDX-License-Identifier: MIT

use super::*;

fn display(x: i32, y: i32, w: u32, h: u32) -> DisplayBounds {
    DisplayBounds { x, y, width: w, height: h }
}

#[test]
fn missing_position_is_invalid() {
    let record = WindowStateRecord { width: 800, height: 600, ..Default::default() };
    assert!(!record.is_valid_for(&[display(0, 0, 1920, 1080)]));
}

#[test]
fn exact_display_bounds_match_is_valid() {
    let bounds = display(0, 0, 1920, 1080);
    let record = WindowStateRecord {
        x: Some(100),
        y: Some(100),
        width: 800,
        height: 600,
        display_bounds: Some(bounds),
        ..Default::default()
    };
    assert!(record.is_valid_for(&[bounds]));
}

#[test]
fn intersecting_rectangle_without_display_bounds_is_valid() {
    let record = WindowStateRecord { x: Some(50), y: Some(50), width: 800, height: 600, ..Default::default() };
    assert!(record.is_valid_for(&[display(0, 0, 1920, 1080)]));
}

#[test]
fn off_screen_rectangle_is_invalid() {
    let record = WindowStateRecord { x: Some(5000), y: Some(5000), width: 800, height: 600, ..Default::default() };
    assert!(!record.is_valid_for(&[display(0, 0, 1920, 1080)]));
}

#[test]
fn state_file_serializes_as_name_keyed_map() {
    let mut file: WindowStateFile = WindowStateFile::new();
    file.insert("main".to_string(), WindowStateRecord {
        x: Some(0),
        y: Some(0),
        width: 1024,
        height: 768,
        ..Default::default()
    });
    let json = serde_json::to_value(&file).unwrap();
    assert_eq!(json["main"]["width"], 1024);
}
