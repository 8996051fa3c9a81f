// ABOUTME: Portable layout record exchanged with persistence backends.
// ABOUTME: JSON schema with camelCase keys; optional fields degrade gracefully.

use serde::{Deserialize, Serialize};

/// Persisted form of a whole collage: grid, track weights, cells and photos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    #[serde(default)]
    pub name: String,
    pub grid_rows: u32,
    pub grid_cols: u32,
    #[serde(default, alias = "columnWidths")]
    pub column_weights: Vec<f64>,
    #[serde(default, alias = "rowHeights")]
    pub row_weights: Vec<f64>,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

fn unit_span() -> u32 {
    1
}

/// One visible cell. Photo fields are absent for empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub id: String,
    pub row: u32,
    pub col: u32,
    #[serde(default = "unit_span")]
    pub row_span: u32,
    #[serde(default = "unit_span")]
    pub col_span: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_position: Option<PositionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_rotation: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub filename: String,
    #[serde(alias = "dataUrl")]
    pub image_data: String,
}

impl LayoutRecord {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_keys() {
        let json = r#"{
            "name": "Trip",
            "gridRows": 1,
            "gridCols": 2,
            "columnWidths": [1.5, 0.5],
            "rowHeights": [1],
            "cells": [
                { "id": "cell-0", "row": 1, "col": 1, "rowSpan": 1, "colSpan": 2,
                  "photoId": "p1", "photoPosition": { "x": 40, "y": 60, "scale": 1.2 } }
            ],
            "photos": [ { "id": "p1", "filename": "a.jpg", "dataUrl": "data:image/jpeg;base64,AA==" } ]
        }"#;
        let record = LayoutRecord::from_json(json).unwrap();
        assert_eq!(record.column_weights, vec![1.5, 0.5]);
        assert_eq!(record.row_weights, vec![1.0]);
        assert_eq!(record.cells[0].col_span, 2);
        assert_eq!(record.cells[0].photo_rotation, None);
        assert_eq!(record.photos[0].image_data, "data:image/jpeg;base64,AA==");
    }

    #[test]
    fn empty_cells_omit_photo_fields() {
        let record = LayoutRecord {
            name: "x".into(),
            grid_rows: 1,
            grid_cols: 1,
            column_weights: vec![1.0],
            row_weights: vec![1.0],
            cells: vec![CellRecord {
                id: "cell-0".into(),
                row: 1,
                col: 1,
                row_span: 1,
                col_span: 1,
                photo_id: None,
                photo_position: None,
                photo_rotation: None,
            }],
            photos: Vec::new(),
        };
        let json = record.to_json_pretty().unwrap();
        assert!(json.contains("\"columnWeights\""));
        assert!(!json.contains("photoId"));
    }

    #[test]
    fn missing_spans_default_to_one() {
        let json = r#"{ "gridRows": 1, "gridCols": 1,
            "cells": [ { "id": "c", "row": 1, "col": 1 } ] }"#;
        let record = LayoutRecord::from_json(json).unwrap();
        assert_eq!((record.cells[0].row_span, record.cells[0].col_span), (1, 1));
        assert!(record.photos.is_empty());
    }
}
