use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{ChartError, ChartResult};

/// Default series color used when the client does not pick one.
pub const DEFAULT_COLOR: &str = "#4F46E5";

/// The closed set of recognized chart kinds.
///
/// `Surface` is declared for forward compatibility but has no renderer, so
/// validation rejects it before it can reach storage or shaping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Pie,
    Bar3d,
    Line3d,
    Scatter3d,
    Surface,
}

impl ChartKind {
    pub fn parse(tag: &str) -> ChartResult<Self> {
        match tag {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "scatter" => Ok(Self::Scatter),
            "pie" => Ok(Self::Pie),
            "bar3d" => Ok(Self::Bar3d),
            "line3d" => Ok(Self::Line3d),
            "scatter3d" => Ok(Self::Scatter3d),
            "surface" => Ok(Self::Surface),
            other => Err(ChartError::UnknownKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Bar3d => "bar3d",
            Self::Line3d => "line3d",
            Self::Scatter3d => "scatter3d",
            Self::Surface => "surface",
        }
    }

    /// Kinds that need a z axis on top of x and y.
    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            Self::Bar3d | Self::Line3d | Self::Scatter3d | Self::Surface
        )
    }
}

/// A candidate chart configuration as submitted by the client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: String,
    pub title: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub z_axis: Option<String>,
    pub data_column: Option<String>,
    pub color: Option<String>,
}

/// A validated chart configuration with defaults applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub z_axis: Option<String>,
    pub data_column: Option<String>,
    pub color: String,
}

/// Reject structurally invalid chart requests before they reach storage or
/// rendering. All rules must hold; the first failure wins.
pub fn validate_chart_spec(
    spec: ChartSpec,
    columns: &[String],
) -> ChartResult<NormalizedChartSpec> {
    let kind = ChartKind::parse(&spec.kind)?;

    if kind == ChartKind::Surface {
        return Err(ChartError::UnsupportedKind(kind.as_str().to_string()));
    }

    if kind == ChartKind::Pie {
        require_column(kind, "dataColumn", spec.data_column.as_deref(), columns)?;
    } else {
        require_column(kind, "xAxis", spec.x_axis.as_deref(), columns)?;
        require_column(kind, "yAxis", spec.y_axis.as_deref(), columns)?;
        if kind.is_3d() {
            require_column(kind, "zAxis", spec.z_axis.as_deref(), columns)?;
        }
    }

    Ok(NormalizedChartSpec {
        kind,
        title: spec
            .title
            .unwrap_or_else(|| format!("{} Chart", kind.as_str())),
        x_axis: spec.x_axis,
        y_axis: spec.y_axis,
        z_axis: spec.z_axis,
        data_column: spec.data_column,
        color: spec.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    })
}

fn require_column(
    kind: ChartKind,
    field: &'static str,
    value: Option<&str>,
    columns: &[String],
) -> ChartResult<()> {
    let Some(column) = value else {
        return Err(ChartError::MissingField {
            field,
            kind: kind.as_str().to_string(),
        });
    };

    if !columns.iter().any(|c| c == column) {
        return Err(ChartError::UnknownColumn {
            field,
            column: column.to_string(),
        });
    }

    Ok(())
}
