use std::num::NonZeroUsize;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{COLUMN_COUNT, CellPolicy};

// US Letter, landscape.
pub const PAGE_WIDTH: f32 = 792.0;
pub const PAGE_HEIGHT: f32 = 612.0;

pub const DEFAULT_ROWS_PER_PAGE: usize = 18;
pub const DEFAULT_COLUMN_RATIOS: [f32; COLUMN_COUNT] = [0.04, 0.10, 0.17, 0.11, 0.11, 0.25, 0.22];

/// The running header's subtitle sits 36pt below the page top; content must start below it.
pub const MIN_TOP_MARGIN: f32 = 44.0;

const RATIO_TOLERANCE: f32 = 1e-3;
const POINT_TOLERANCE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 60.0,
            bottom: 30.0,
            left: 40.0,
            right: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidths {
    /// Fractions of the content width; must sum to 1.
    Ratios([f32; COLUMN_COUNT]),
    /// Absolute widths in points; must sum to the content width.
    Points([f32; COLUMN_COUNT]),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSpec {
    pub widths: ColumnWidths,
    pub policies: [CellPolicy; COLUMN_COUNT],
    /// Scale widths proportionally to the content width instead of rejecting a mismatch.
    pub normalize: bool,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            widths: ColumnWidths::Ratios(DEFAULT_COLUMN_RATIOS),
            policies: [CellPolicy::Wrap; COLUMN_COUNT],
            normalize: false,
        }
    }
}

impl ColumnSpec {
    /// Column widths in points for a content area `available` points wide.
    pub fn resolve(&self, available: f32) -> Result<[f32; COLUMN_COUNT], Error> {
        let (raw, target, tolerance, unit) = match self.widths {
            ColumnWidths::Ratios(r) => (r, 1.0, RATIO_TOLERANCE, ""),
            ColumnWidths::Points(p) => (p, available, POINT_TOLERANCE, "pt"),
        };
        if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(Error::Layout(format!(
                "column widths must be positive, got {bad}"
            )));
        }
        let sum: f32 = raw.iter().sum();
        let scale = if (sum - target).abs() <= tolerance {
            target / sum
        } else if self.normalize {
            log::debug!("normalizing column widths: sum={sum:.3}{unit} target={target:.3}{unit}");
            target / sum
        } else {
            return Err(Error::Layout(format!(
                "column widths sum to {sum:.3}{unit}, expected {target:.3}{unit}"
            )));
        };
        let unit_to_pt = match self.widths {
            ColumnWidths::Ratios(_) => available,
            ColumnWidths::Points(_) => 1.0,
        };
        Ok(raw.map(|w| w * scale * unit_to_pt))
    }
}

/// Physical page plus margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn content_top(&self) -> f32 {
        self.height - self.margins.top
    }

    pub fn content_bottom(&self) -> f32 {
        self.margins.bottom
    }
}

/// Everything the layout stages need, checked once up front.
#[derive(Clone, Debug)]
pub struct ResolvedLayout {
    pub capacity: NonZeroUsize,
    pub page: PageGeometry,
    pub col_widths: [f32; COLUMN_COUNT],
    pub policies: [CellPolicy; COLUMN_COUNT],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub manifest_date: NaiveDate,
    pub file_name: Option<String>,
    pub rows_per_page: usize,
    pub columns: ColumnSpec,
    pub margins: Margins,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }
}

impl ManifestConfig {
    pub fn for_date(manifest_date: NaiveDate) -> Self {
        Self {
            manifest_date,
            file_name: None,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            columns: ColumnSpec::default(),
            margins: Margins::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Date as printed in the running header, e.g. `07/03/2025`.
    pub fn date_label(&self) -> String {
        self.manifest_date.format("%d/%m/%Y").to_string()
    }

    /// Suggested output file name, `Manifiesto_DD_MM_YYYY.pdf` unless overridden.
    pub fn file_name(&self) -> String {
        match &self.file_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("Manifiesto_{}.pdf", self.manifest_date.format("%d_%m_%Y")),
        }
    }

    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            margins: self.margins,
        }
    }

    pub fn validate(&self) -> Result<ResolvedLayout, Error> {
        let capacity = NonZeroUsize::new(self.rows_per_page).ok_or_else(|| {
            Error::Layout("rows per page must be at least 1".into())
        })?;

        let m = &self.margins;
        if [m.top, m.bottom, m.left, m.right]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::Layout(format!("margins must be non-negative, got {m:?}")));
        }
        if m.top < MIN_TOP_MARGIN {
            return Err(Error::Layout(format!(
                "top margin {:.1}pt leaves no room for the running header (minimum {MIN_TOP_MARGIN}pt)",
                m.top
            )));
        }
        let page = self.page_geometry();
        if page.content_width() <= 0.0 || page.content_top() <= page.content_bottom() {
            return Err(Error::Layout(format!(
                "margins {m:?} leave no content area on a {PAGE_WIDTH}x{PAGE_HEIGHT}pt page"
            )));
        }

        if self
            .columns
            .policies
            .iter()
            .any(|p| *p == CellPolicy::Truncate(0))
        {
            return Err(Error::Layout("truncation length must be at least 1".into()));
        }

        let col_widths = self.columns.resolve(page.content_width())?;

        Ok(ResolvedLayout {
            capacity,
            page,
            col_widths,
            policies: self.columns.policies,
        })
    }
}
