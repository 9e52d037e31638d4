use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::spec::{ChartKind, NormalizedChartSpec};
use crate::errors::{ChartError, ChartResult};
use crate::ingest::Row;

/// Shaped series data ready for a rendering library.
///
/// The lossy numeric fallback (unparseable cells become `0`) is preserved for
/// compatibility with existing clients, but each numeric series reports how
/// many cells were substituted so a client can flag misleading charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ChartSeries {
    /// Frequency table for pie charts, in first-seen category order.
    Pie { categories: IndexMap<String, u64> },
    /// Parallel label/value sequences for 2D charts, one entry per row.
    Xy {
        labels: Vec<String>,
        values: Vec<f64>,
        dropped: usize,
    },
    /// Parallel coordinate sequences for 3D charts, one entry per row.
    Xyz {
        xs: Vec<f64>,
        ys: Vec<f64>,
        zs: Vec<f64>,
        dropped: usize,
    },
}

/// Turn parsed rows plus a validated chart spec into series data.
///
/// Deterministic and side-effect free: the same rows and spec always produce
/// the same series.
pub fn shape_chart_data(rows: &[Row], spec: &NormalizedChartSpec) -> ChartResult<ChartSeries> {
    match spec.kind {
        ChartKind::Pie => shape_pie(rows, spec),
        ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => shape_xy(rows, spec),
        ChartKind::Bar3d | ChartKind::Line3d | ChartKind::Scatter3d => shape_xyz(rows, spec),
        ChartKind::Surface => Err(ChartError::UnsupportedKind(
            ChartKind::Surface.as_str().to_string(),
        )),
    }
}

fn shape_pie(rows: &[Row], spec: &NormalizedChartSpec) -> ChartResult<ChartSeries> {
    let column = required_field(spec, "dataColumn", spec.data_column.as_deref())?;

    let mut categories: IndexMap<String, u64> = IndexMap::new();
    for row in rows {
        let value = match row.get(column) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        *categories.entry(category_label(value)).or_insert(0) += 1;
    }

    if categories.is_empty() {
        return Err(ChartError::EmptySeries {
            column: column.to_string(),
        });
    }

    Ok(ChartSeries::Pie { categories })
}

fn shape_xy(rows: &[Row], spec: &NormalizedChartSpec) -> ChartResult<ChartSeries> {
    let x_axis = required_field(spec, "xAxis", spec.x_axis.as_deref())?;
    let y_axis = required_field(spec, "yAxis", spec.y_axis.as_deref())?;

    let labels: Vec<String> = rows
        .iter()
        .map(|row| row.get(x_axis).map(axis_label).unwrap_or_default())
        .collect();

    let mut dropped = 0;
    let values: Vec<f64> = rows
        .iter()
        .map(|row| numeric_or_zero(row.get(y_axis), &mut dropped))
        .collect();

    Ok(ChartSeries::Xy {
        labels,
        values,
        dropped,
    })
}

fn shape_xyz(rows: &[Row], spec: &NormalizedChartSpec) -> ChartResult<ChartSeries> {
    let x_axis = required_field(spec, "xAxis", spec.x_axis.as_deref())?;
    let y_axis = required_field(spec, "yAxis", spec.y_axis.as_deref())?;
    let z_axis = required_field(spec, "zAxis", spec.z_axis.as_deref())?;

    let mut dropped = 0;
    let mut xs = Vec::with_capacity(rows.len());
    let mut ys = Vec::with_capacity(rows.len());
    let mut zs = Vec::with_capacity(rows.len());

    // Rows are never filtered: a row whose coordinates all fail to parse
    // still contributes a (0, 0, 0) point.
    for row in rows {
        xs.push(numeric_or_zero(row.get(x_axis), &mut dropped));
        ys.push(numeric_or_zero(row.get(y_axis), &mut dropped));
        zs.push(numeric_or_zero(row.get(z_axis), &mut dropped));
    }

    Ok(ChartSeries::Xyz {
        xs,
        ys,
        zs,
        dropped,
    })
}

fn required_field<'a>(
    spec: &NormalizedChartSpec,
    field: &'static str,
    value: Option<&'a str>,
) -> ChartResult<&'a str> {
    value.ok_or_else(|| ChartError::MissingField {
        field,
        kind: spec.kind.as_str().to_string(),
    })
}

/// Stringify a pie category; values that stringify to nothing fall under a
/// shared "Unknown" bucket.
fn category_label(value: &Value) -> String {
    let label = axis_label(value);
    if label.is_empty() {
        "Unknown".to_string()
    } else {
        label
    }
}

fn axis_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_or_zero(value: Option<&Value>, dropped: &mut usize) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) => n,
        None => {
            *dropped += 1;
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::spec::{validate_chart_spec, ChartSpec};
    use crate::config::UploadConfig;
    use crate::ingest::parse_tabular_file;

    fn rows_from_csv(csv: &str) -> (Vec<Row>, Vec<String>) {
        let parsed =
            parse_tabular_file(csv.as_bytes(), "data.csv", &UploadConfig::default()).unwrap();
        (parsed.rows, parsed.columns)
    }

    fn validated(spec: ChartSpec, columns: &[String]) -> NormalizedChartSpec {
        validate_chart_spec(spec, columns).unwrap()
    }

    #[test]
    fn bar_chart_substitutes_zero_for_non_numeric_cells() {
        let (rows, columns) = rows_from_csv("name,score\nAda,90\nLin,\nKay,70\n");
        let spec = validated(
            ChartSpec {
                kind: "bar".to_string(),
                x_axis: Some("name".to_string()),
                y_axis: Some("score".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let series = shape_chart_data(&rows, &spec).unwrap();
        assert_eq!(
            series,
            ChartSeries::Xy {
                labels: vec!["Ada".to_string(), "Lin".to_string(), "Kay".to_string()],
                values: vec![90.0, 0.0, 70.0],
                dropped: 1,
            }
        );
    }

    #[test]
    fn xy_series_lengths_match_row_count() {
        let (rows, columns) = rows_from_csv("x,y\n1,N/A\n2,3\n3,\n");
        let spec = validated(
            ChartSpec {
                kind: "line".to_string(),
                x_axis: Some("x".to_string()),
                y_axis: Some("y".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let ChartSeries::Xy {
            labels,
            values,
            dropped,
        } = shape_chart_data(&rows, &spec).unwrap()
        else {
            panic!("expected xy series");
        };
        assert_eq!(labels.len(), rows.len());
        assert_eq!(values.len(), rows.len());
        assert_eq!(values, vec![0.0, 3.0, 0.0]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn pie_counts_in_first_seen_order() {
        let (rows, columns) = rows_from_csv("fruit\napple\nbanana\napple\ncherry\nbanana\napple\n");
        let spec = validated(
            ChartSpec {
                kind: "pie".to_string(),
                data_column: Some("fruit".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let ChartSeries::Pie { categories } = shape_chart_data(&rows, &spec).unwrap() else {
            panic!("expected pie series");
        };
        let entries: Vec<(&str, u64)> = categories
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            entries,
            vec![("apple", 3), ("banana", 2), ("cherry", 1)]
        );
        assert_eq!(categories.values().sum::<u64>(), rows.len() as u64);
    }

    #[test]
    fn pie_buckets_empty_values_as_unknown() {
        // Single-column CSVs drop blank records entirely, so the empty cell
        // needs a neighbour to survive parsing.
        let (rows, columns) = rows_from_csv("tag,n\nred,1\n,2\nred,3\n");
        let spec = validated(
            ChartSpec {
                kind: "pie".to_string(),
                data_column: Some("tag".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let ChartSeries::Pie { categories } = shape_chart_data(&rows, &spec).unwrap() else {
            panic!("expected pie series");
        };
        assert_eq!(categories.get("red"), Some(&2));
        assert_eq!(categories.get("Unknown"), Some(&1));
    }

    #[test]
    fn pie_with_no_values_is_an_empty_series() {
        // XLSX-style rows where the selected column is null throughout.
        let rows: Vec<Row> = (0..3)
            .map(|_| {
                let mut row = Row::new();
                row.insert("a".to_string(), Value::Null);
                row
            })
            .collect();
        let spec = validated(
            ChartSpec {
                kind: "pie".to_string(),
                data_column: Some("a".to_string()),
                ..ChartSpec::default()
            },
            &["a".to_string()],
        );

        let err = shape_chart_data(&rows, &spec).unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries { column } if column == "a"));
    }

    #[test]
    fn xyz_keeps_unparseable_rows_as_origin_points() {
        let (rows, columns) = rows_from_csv("x,y,z\n1,2,3\nfoo,bar,baz\n");
        let spec = validated(
            ChartSpec {
                kind: "scatter3d".to_string(),
                x_axis: Some("x".to_string()),
                y_axis: Some("y".to_string()),
                z_axis: Some("z".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let series = shape_chart_data(&rows, &spec).unwrap();
        assert_eq!(
            series,
            ChartSeries::Xyz {
                xs: vec![1.0, 0.0],
                ys: vec![2.0, 0.0],
                zs: vec![3.0, 0.0],
                dropped: 3,
            }
        );
    }

    #[test]
    fn numeric_labels_keep_their_display_form() {
        let mut row = Row::new();
        row.insert("year".to_string(), Value::from(2024));
        row.insert("score".to_string(), Value::from(88.5));
        let columns = vec!["year".to_string(), "score".to_string()];
        let spec = validated(
            ChartSpec {
                kind: "bar".to_string(),
                x_axis: Some("year".to_string()),
                y_axis: Some("score".to_string()),
                ..ChartSpec::default()
            },
            &columns,
        );

        let ChartSeries::Xy { labels, values, .. } =
            shape_chart_data(&[row], &spec).unwrap()
        else {
            panic!("expected xy series");
        };
        assert_eq!(labels, vec!["2024"]);
        assert_eq!(values, vec![88.5]);
    }
}
