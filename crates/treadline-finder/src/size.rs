//! Tire size finder: Width → Ratio → Diameter over reference objects.
//!
//! Ratios carry an optional link to the width value they are offered for, and
//! diameters an optional link to the ratio value. Unlinked records apply to
//! every parent.

use std::collections::HashSet;

use treadline_core::{
    Diameter, ProductType, Ratio, ReferenceValue, SizeCatalog, SizeSelection, Width,
};

use crate::cascade::{Cascade, StageKey, Transition};
use crate::error::FinderError;

const LABELS: &[&str] = &["width", "ratio", "diameter"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeStage {
    Width = 1,
    Ratio = 2,
    Diameter = 3,
}

impl SizeStage {
    #[must_use]
    pub fn number(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_number(stage: usize) -> Option<Self> {
        match stage {
            1 => Some(SizeStage::Width),
            2 => Some(SizeStage::Ratio),
            3 => Some(SizeStage::Diameter),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        LABELS[self.number() - 1]
    }
}

#[derive(Debug, Clone)]
enum SizeValue {
    Width(Width),
    Ratio(Ratio),
    Diameter(Diameter),
}

impl StageKey for SizeValue {
    fn stage_key(&self) -> &str {
        match self {
            SizeValue::Width(w) => w.id.as_str(),
            SizeValue::Ratio(r) => r.id.as_str(),
            SizeValue::Diameter(d) => d.id.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SizeFinder {
    cascade: Cascade<SizeValue>,
    product_type: ProductType,
}

impl SizeFinder {
    #[must_use]
    pub fn new(product_type: ProductType) -> Self {
        Self {
            cascade: Cascade::new(LABELS),
            product_type,
        }
    }

    #[must_use]
    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    #[must_use]
    pub fn stage(&self) -> SizeStage {
        SizeStage::from_number(self.cascade.current_stage()).unwrap_or(SizeStage::Width)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cascade.is_complete()
    }

    #[must_use]
    pub fn width(&self) -> Option<&Width> {
        match self.cascade.value(SizeStage::Width.number()) {
            Some(SizeValue::Width(w)) => Some(w),
            _ => None,
        }
    }

    #[must_use]
    pub fn ratio(&self) -> Option<&Ratio> {
        match self.cascade.value(SizeStage::Ratio.number()) {
            Some(SizeValue::Ratio(r)) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn diameter(&self) -> Option<&Diameter> {
        match self.cascade.value(SizeStage::Diameter.number()) {
            Some(SizeValue::Diameter(d)) => Some(d),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Width is the first stage, so this only fails if the cascade is misbuilt.
    pub fn select_width(&mut self, width: Width) -> Result<Transition, FinderError> {
        self.cascade
            .select(SizeStage::Width.number(), SizeValue::Width(width))
    }

    /// # Errors
    ///
    /// [`FinderError::StageLocked`] before a width is chosen.
    pub fn select_ratio(&mut self, ratio: Ratio) -> Result<Transition, FinderError> {
        self.cascade
            .select(SizeStage::Ratio.number(), SizeValue::Ratio(ratio))
    }

    /// # Errors
    ///
    /// [`FinderError::StageLocked`] before a width and ratio are chosen.
    pub fn select_diameter(&mut self, diameter: Diameter) -> Result<Transition, FinderError> {
        self.cascade
            .select(SizeStage::Diameter.number(), SizeValue::Diameter(diameter))
    }

    /// Chooses the option at `stage` whose display value is `value`, looking
    /// it up in the options `catalog` currently offers for that stage.
    ///
    /// # Errors
    ///
    /// [`FinderError::UnknownOption`] when no offered option has that value,
    /// [`FinderError::StageLocked`] when an earlier stage is empty.
    pub fn choose(
        &mut self,
        catalog: &SizeCatalog,
        stage: SizeStage,
        value: &str,
    ) -> Result<Transition, FinderError> {
        self.cascade.ensure_reachable(stage.number())?;
        let unknown = || FinderError::UnknownOption {
            stage_name: stage.label(),
            value: value.to_owned(),
        };
        match stage {
            SizeStage::Width => {
                let width = find_value(&width_options(catalog), value).ok_or_else(unknown)?;
                self.select_width(width)
            }
            SizeStage::Ratio => {
                let offered = self
                    .width()
                    .map(|w| ratio_options(catalog, w))
                    .unwrap_or_default();
                let ratio = find_value(&offered, value).ok_or_else(unknown)?;
                self.select_ratio(ratio)
            }
            SizeStage::Diameter => {
                let offered = self
                    .ratio()
                    .map(|r| diameter_options(catalog, r))
                    .unwrap_or_default();
                let diameter = find_value(&offered, value).ok_or_else(unknown)?;
                self.select_diameter(diameter)
            }
        }
    }

    /// # Errors
    ///
    /// [`FinderError::StageLocked`] when an earlier stage is empty.
    pub fn go_to(&mut self, stage: SizeStage) -> Result<(), FinderError> {
        self.cascade.go_to(stage.number())
    }

    pub fn reset(&mut self) {
        self.cascade.reset();
    }

    /// # Errors
    ///
    /// [`FinderError::Incomplete`] until a diameter has been chosen.
    pub fn proceed(&self) -> Result<SizeSelection, FinderError> {
        self.cascade.proceed()?;
        match (self.width(), self.ratio(), self.diameter()) {
            (Some(width), Some(ratio), Some(diameter)) => Ok(SizeSelection {
                width: width.clone(),
                ratio: ratio.clone(),
                diameter: diameter.clone(),
                product_type: self.product_type,
            }),
            _ => Err(FinderError::Incomplete {
                missing: SizeStage::Diameter.label(),
            }),
        }
    }
}

fn find_value<T: ReferenceValue + Clone>(options: &[T], value: &str) -> Option<T> {
    options.iter().find(|o| o.value() == value).cloned()
}

fn distinct_by_value<T: ReferenceValue + Clone>(records: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .filter(|r| !r.value().trim().is_empty() && seen.insert(r.value().to_owned()))
        .collect()
}

#[must_use]
pub fn width_options(catalog: &SizeCatalog) -> Vec<Width> {
    distinct_by_value(catalog.widths.iter().cloned())
}

/// Ratios offered for `width`, matched on the width's value.
#[must_use]
pub fn ratio_options(catalog: &SizeCatalog, width: &Width) -> Vec<Ratio> {
    distinct_by_value(
        catalog
            .ratios
            .iter()
            .filter(|r| r.width.as_ref().is_none_or(|w| *w == width.width))
            .cloned(),
    )
}

/// Diameters offered for `ratio`, matched on the ratio's value.
#[must_use]
pub fn diameter_options(catalog: &SizeCatalog, ratio: &Ratio) -> Vec<Diameter> {
    distinct_by_value(
        catalog
            .diameters
            .iter()
            .filter(|d| d.ratio.as_ref().is_none_or(|r| *r == ratio.ratio))
            .cloned(),
    )
}
