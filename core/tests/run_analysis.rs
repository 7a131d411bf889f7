// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

use std::fs;

use congestion_core::io::json::read_json;
use serde_json::Value;

const NETWORK: &str = r#"{
    "segments": [
        {"id": "A", "name": "Ring road", "length": 2.0, "lanes": 3, "road_type": "highway",
         "speed_limit": 90.0},
        {"id": "B", "name": "Main street", "length": 1.0, "lanes": 2, "capacity": 3600.0,
         "speed_limit": 60.0},
        {"id": "C", "length": 0.5, "lanes": 1, "road_type": "local", "speed_limit": 30.0}
    ],
    "volume_profiles": {
        "B": [300, 200, 150, 150, 200, 600, 1500, 2600, 3000, 2400, 1800, 1700,
              1800, 1700, 1700, 1900, 2400, 2900, 2800, 2000, 1400, 1000, 700, 400]
    },
    "routes": {"R1": ["A", "B", "C"], "R2": ["B"]}
}"#;

const PARAMETERS: &str = r#"{
    "input_files": {"network": "network.json"},
    "output_directory": "output",
    "analysis": {
        "time": "2024-03-04T08:15:00",
        "weather": "rain",
        "routes": ["R1", "R2"]
    },
    "model": {"nb_threads": 2}
}"#;

#[test]
fn run_analysis_test() {
    let dir = std::env::temp_dir().join("congestion_core_run_analysis");
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("network.json"), NETWORK).unwrap();
    fs::write(dir.join("parameters.json"), PARAMETERS).unwrap();

    congestion_core::run_analysis(&dir.join("parameters.json")).unwrap();

    let output = dir.join("output");
    assert!(output.join("log.txt").is_file());
    let predictions: Value = read_json(&output.join("predictions.json")).unwrap();
    let predictions = predictions.as_array().unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[1]["segment_id"], "B");
    assert_eq!(predictions[1]["time_slot"], "2024-03-04 08:00");
    // 3000 * 1.3 (peak) * 1.1 (Monday) * 1.4 (rain).
    let volume = predictions[1]["predicted_volume"].as_f64().unwrap();
    assert!((volume - 6006.0).abs() < 1e-6);
    assert_eq!(predictions[1]["level"], "severe");
    assert_eq!(predictions[1]["confidence"], 90);
    assert_eq!(
        predictions[1]["factors"],
        serde_json::json!([
            "Peak hour traffic",
            "Rainy weather conditions",
            "Monday/Friday traffic pattern",
            "Road capacity constraints"
        ])
    );

    let impact: Value = read_json(&output.join("system_impact.json")).unwrap();
    assert_eq!(impact["nb_segments"], 3);
    assert!(impact["average_speed"].as_f64().unwrap() > 0.0);

    let optimization: Value = read_json(&output.join("route_optimization.json")).unwrap();
    assert_eq!(optimization["optimized_routes"], serde_json::json!(["R1", "R2"]));
    assert_eq!(optimization["route_scores"].as_array().unwrap().len(), 2);
}
